// Wizard snapshot store
//
// Durable scratch space for in-progress proposals. The file-backed store is
// the production analog of the browser's local storage; the in-memory store
// keeps tests deterministic. A corrupt stored payload loads as `None` so a
// bad snapshot can never wedge the wizard.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::models::form::{DocumentUpload, ProposalFormData};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub current_step: u8,
    pub current_sub_step: u8,
    pub form_data: ProposalFormData,
    #[serde(default)]
    pub documents: HashMap<String, Vec<DocumentUpload>>,
}

pub trait SnapshotStore {
    fn save(&self, snapshot: &WizardSnapshot) -> anyhow::Result<()>;
    /// `None` when nothing is stored or the payload does not parse.
    fn load(&self) -> Option<WizardSnapshot>;
    fn clear(&self) -> anyhow::Result<()>;
}

pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn save(&self, snapshot: &WizardSnapshot) -> anyhow::Result<()> {
        let payload = serde_json::to_string(snapshot)?;
        fs::write(&self.path, payload)?;
        Ok(())
    }

    fn load(&self) -> Option<WizardSnapshot> {
        let payload = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&payload) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("discarding unreadable wizard snapshot: {}", e);
                None
            }
        }
    }

    fn clear(&self) -> anyhow::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Default)]
pub struct InMemorySnapshotStore {
    slot: Mutex<Option<String>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn save(&self, snapshot: &WizardSnapshot) -> anyhow::Result<()> {
        let payload = serde_json::to_string(snapshot)?;
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(payload);
        Ok(())
    }

    fn load(&self) -> Option<WizardSnapshot> {
        let guard = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .as_deref()
            .and_then(|payload| serde_json::from_str(payload).ok())
    }

    fn clear(&self) -> anyhow::Result<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> WizardSnapshot {
        let mut form = ProposalFormData::default();
        form.full_name = "Asha Rao".to_string();
        WizardSnapshot {
            current_step: 1,
            current_sub_step: 2,
            form_data: form,
            documents: HashMap::new(),
        }
    }

    #[test]
    fn file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("proposal-snapshot.json"));

        assert!(store.load().is_none());
        store.save(&snapshot()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.current_step, 1);
        assert_eq!(loaded.current_sub_step, 2);
        assert_eq!(loaded.form_data.full_name, "Asha Rao");
    }

    #[test]
    fn file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("proposal-snapshot.json"));

        store.save(&snapshot()).unwrap();
        store.clear().unwrap();
        assert!(store.load().is_none());
        // Clearing an already-empty store is not an error.
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proposal-snapshot.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileSnapshotStore::new(path);
        assert!(store.load().is_none());
    }

    #[test]
    fn in_memory_store_round_trips() {
        let store = InMemorySnapshotStore::new();
        assert!(store.load().is_none());
        store.save(&snapshot()).unwrap();
        assert_eq!(store.load().unwrap().form_data.full_name, "Asha Rao");
        store.clear().unwrap();
        assert!(store.load().is_none());
    }
}
