// Proposal wizard state machine
//
// Three steps, the first with three sub-steps:
//   Step 1: Personal -> Occupation -> Nominee
//   Step 2: Health
//   Step 3: Payment (terminal)
// `next()` validates the active step and refuses to move while errors remain;
// `prev()` always moves. Every mutation can be snapshotted for the store.

pub mod snapshot;
pub mod validation;

use anyhow::Context;
use serde_json::Value;
use std::collections::HashMap;

use crate::models::form::{DocumentUpload, ProposalFormData};
use self::snapshot::WizardSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Personal,
    Occupation,
    Nominee,
    Health,
    Payment,
}

impl WizardStep {
    pub fn step(&self) -> u8 {
        match self {
            WizardStep::Personal | WizardStep::Occupation | WizardStep::Nominee => 1,
            WizardStep::Health => 2,
            WizardStep::Payment => 3,
        }
    }

    pub fn sub_step(&self) -> u8 {
        match self {
            WizardStep::Personal => 1,
            WizardStep::Occupation => 2,
            WizardStep::Nominee => 3,
            WizardStep::Health | WizardStep::Payment => 1,
        }
    }

    /// Rebuild from stored (step, sub-step) numbers. Anything malformed
    /// lands back on the first screen.
    pub fn from_parts(step: u8, sub_step: u8) -> Self {
        match (step, sub_step) {
            (1, 1) => WizardStep::Personal,
            (1, 2) => WizardStep::Occupation,
            (1, 3) => WizardStep::Nominee,
            (2, _) => WizardStep::Health,
            (3, _) => WizardStep::Payment,
            _ => WizardStep::Personal,
        }
    }
}

/// Outcome of a `next()` attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Validation passed and the wizard moved to the next screen.
    Moved,
    /// Validation failed; the error map holds the field messages.
    Blocked,
    /// Validation passed on the terminal step; the proposal can be submitted.
    ReadyToSubmit,
}

#[derive(Debug, Clone)]
pub struct WizardState {
    step: WizardStep,
    form: ProposalFormData,
    documents: HashMap<String, Vec<DocumentUpload>>,
    errors: HashMap<String, String>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    /// A fresh proposal, starting at the first screen.
    pub fn new() -> Self {
        Self {
            step: WizardStep::Personal,
            form: ProposalFormData::default(),
            documents: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    /// Resume from a stored snapshot, e.g. when editing before verification.
    pub fn resume(snapshot: WizardSnapshot) -> Self {
        Self {
            step: WizardStep::from_parts(snapshot.current_step, snapshot.current_sub_step),
            form: snapshot.form_data,
            documents: snapshot.documents,
            errors: HashMap::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &ProposalFormData {
        &self.form
    }

    pub fn documents(&self) -> &HashMap<String, Vec<DocumentUpload>> {
        &self.documents
    }

    pub fn errors(&self) -> &HashMap<String, String> {
        &self.errors
    }

    /// Validate the active step and advance when clean.
    pub fn next(&mut self) -> Advance {
        self.errors = validation::validate_step(self.step, &self.form, &self.documents);
        if !self.errors.is_empty() {
            return Advance::Blocked;
        }

        match self.step {
            WizardStep::Personal => {
                self.step = WizardStep::Occupation;
                Advance::Moved
            }
            WizardStep::Occupation => {
                self.step = WizardStep::Nominee;
                Advance::Moved
            }
            WizardStep::Nominee => {
                self.step = WizardStep::Health;
                Advance::Moved
            }
            WizardStep::Health => {
                self.step = WizardStep::Payment;
                Advance::Moved
            }
            WizardStep::Payment => Advance::ReadyToSubmit,
        }
    }

    /// Move back one screen. Returns `false` when already at the first
    /// screen, where navigation leaves the wizard entirely.
    pub fn prev(&mut self) -> bool {
        self.step = match self.step {
            WizardStep::Personal => return false,
            WizardStep::Occupation => WizardStep::Personal,
            WizardStep::Nominee => WizardStep::Occupation,
            WizardStep::Health => WizardStep::Nominee,
            WizardStep::Payment => WizardStep::Health,
        };
        true
    }

    /// Merge one field's new value into the form and clear its stored error.
    /// Works at any step; `field` uses the serialized camelCase name.
    pub fn update_field(&mut self, field: &str, value: Value) -> anyhow::Result<()> {
        let mut form_value =
            serde_json::to_value(&self.form).context("failed to serialize form data")?;

        let obj = form_value
            .as_object_mut()
            .context("form data did not serialize to an object")?;
        if !obj.contains_key(field) {
            anyhow::bail!("unknown form field: {}", field);
        }
        obj.insert(field.to_string(), value);

        self.form = serde_json::from_value(form_value)
            .with_context(|| format!("invalid value for form field {}", field))?;
        self.errors.remove(field);
        Ok(())
    }

    /// Record an uploaded file under a document category.
    pub fn record_document(&mut self, category: &str, file: DocumentUpload) {
        self.documents
            .entry(category.to_string())
            .or_default()
            .push(file);
        self.errors.remove(category);
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            current_step: self.step.step(),
            current_sub_step: self.step.sub_step(),
            form_data: self.form.clone(),
            documents: self.documents.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(name: &str) -> DocumentUpload {
        DocumentUpload {
            file_name: name.to_string(),
            file_size: 1024,
            file_type: "application/pdf".to_string(),
            document_subtype: None,
        }
    }

    fn fill_personal(w: &mut WizardState) {
        w.update_field("fullName", json!("Asha Rao")).unwrap();
        w.update_field("emailId", json!("asha@example.com")).unwrap();
        w.update_field("mobileNumber", json!("9812345678")).unwrap();
        w.update_field("highestEducation", json!("Graduate")).unwrap();
        w.update_field("existingPolicy", json!("No")).unwrap();
    }

    fn fill_occupation(w: &mut WizardState) {
        w.update_field("occupation", json!("Salaried")).unwrap();
        w.update_field("organizationName", json!("Acme & Co."))
            .unwrap();
        w.update_field("organizationType", json!("Private")).unwrap();
        w.update_field("annualIncome", json!(1_200_000)).unwrap();
        w.update_field("engagedInSpecifiedIndustries", json!(false))
            .unwrap();
    }

    fn fill_nominee(w: &mut WizardState) {
        w.update_field("relationshipWithNominee", json!("Spouse"))
            .unwrap();
        w.update_field("nomineeFirstName", json!("Ravi")).unwrap();
        w.update_field("nomineeLastName", json!("Rao")).unwrap();
        w.update_field("nomineeDateOfBirth", json!("1990-01-20"))
            .unwrap();
    }

    fn fill_health(w: &mut WizardState) {
        w.update_field("weightKg", json!(68.5)).unwrap();
        w.update_field("heightFeet", json!(5)).unwrap();
        w.update_field("heightInches", json!(7)).unwrap();
    }

    #[test]
    fn starts_at_personal() {
        let w = WizardState::new();
        assert_eq!(w.step(), WizardStep::Personal);
        assert_eq!(w.step().step(), 1);
        assert_eq!(w.step().sub_step(), 1);
    }

    #[test]
    fn empty_personal_step_blocks_with_field_errors() {
        let mut w = WizardState::new();
        assert_eq!(w.next(), Advance::Blocked);
        assert_eq!(w.step(), WizardStep::Personal);
        assert!(w.errors().contains_key("fullName"));
        assert!(w.errors().contains_key("emailId"));
        assert!(w.errors().contains_key("mobileNumber"));
    }

    #[test]
    fn walks_the_full_happy_path() {
        let mut w = WizardState::new();
        fill_personal(&mut w);
        assert_eq!(w.next(), Advance::Moved);
        assert_eq!(w.step(), WizardStep::Occupation);

        fill_occupation(&mut w);
        assert_eq!(w.next(), Advance::Moved);
        assert_eq!(w.step(), WizardStep::Nominee);

        fill_nominee(&mut w);
        assert_eq!(w.next(), Advance::Moved);
        assert_eq!(w.step(), WizardStep::Health);

        fill_health(&mut w);
        assert_eq!(w.next(), Advance::Moved);
        assert_eq!(w.step(), WizardStep::Payment);

        w.update_field("declarationAccepted", json!(true)).unwrap();
        w.record_document("pan_card", doc("pan.pdf"));
        w.record_document("address_proof", doc("aadhaar.pdf"));
        assert_eq!(w.next(), Advance::ReadyToSubmit);
        assert_eq!(w.step(), WizardStep::Payment);
    }

    #[test]
    fn prev_crosses_step_boundaries() {
        let mut w = WizardState::new();
        fill_personal(&mut w);
        fill_occupation(&mut w);
        fill_nominee(&mut w);
        fill_health(&mut w);
        while w.step() != WizardStep::Payment {
            assert_eq!(w.next(), Advance::Moved);
        }

        assert!(w.prev());
        assert_eq!(w.step(), WizardStep::Health);
        assert!(w.prev());
        assert_eq!(w.step(), WizardStep::Nominee);
        assert!(w.prev());
        assert_eq!(w.step(), WizardStep::Occupation);
        assert!(w.prev());
        assert_eq!(w.step(), WizardStep::Personal);
        assert!(!w.prev());
    }

    #[test]
    fn update_field_clears_that_fields_error() {
        let mut w = WizardState::new();
        assert_eq!(w.next(), Advance::Blocked);
        assert!(w.errors().contains_key("fullName"));

        w.update_field("fullName", json!("Asha Rao")).unwrap();
        assert!(!w.errors().contains_key("fullName"));
        // Other errors are untouched until revalidation.
        assert!(w.errors().contains_key("emailId"));
    }

    #[test]
    fn update_field_rejects_unknown_names() {
        let mut w = WizardState::new();
        assert!(w.update_field("notAField", json!("x")).is_err());
    }

    #[test]
    fn snapshot_round_trip_preserves_position_and_data() {
        let mut w = WizardState::new();
        fill_personal(&mut w);
        assert_eq!(w.next(), Advance::Moved);
        w.record_document("pan_card", doc("pan.pdf"));

        let snap = w.snapshot();
        assert_eq!(snap.current_step, 1);
        assert_eq!(snap.current_sub_step, 2);

        let restored = WizardState::resume(snap);
        assert_eq!(restored.step(), WizardStep::Occupation);
        assert_eq!(restored.form().full_name, "Asha Rao");
        assert_eq!(restored.documents()["pan_card"].len(), 1);
    }

    #[test]
    fn malformed_snapshot_position_falls_back_to_start() {
        assert_eq!(WizardStep::from_parts(9, 9), WizardStep::Personal);
        assert_eq!(WizardStep::from_parts(1, 7), WizardStep::Personal);
        assert_eq!(WizardStep::from_parts(0, 0), WizardStep::Personal);
    }
}
