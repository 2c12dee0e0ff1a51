// Administrative operations.

use log::{info, warn};

use crate::database::migrations;
use crate::models::responses::{ApiResponse, MigrateResponse};
use crate::models::state::AppState;

/// Apply pending schema migrations.
pub async fn run_migrations(state: &AppState) -> ApiResponse<MigrateResponse> {
    let Some(pool) = state.pool() else {
        return ApiResponse::fail("Database not configured");
    };

    match migrations::apply_all_pending(pool).await {
        Ok(applied) => {
            info!(
                "[PHASE: DATABASE] [STEP: migrate] applied {} migration(s)",
                applied.len()
            );
            ApiResponse::ok_with_message(
                MigrateResponse { applied },
                "Proposal form tables created successfully",
            )
        }
        Err(e) => {
            warn!("[PHASE: DATABASE] [STEP: migrate] migration failed: {:#}", e);
            ApiResponse::fail("Failed to create proposal form tables")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[tokio::test]
    async fn migrations_require_a_database() {
        let state = AppState::without_persistence(AppConfig::default()).unwrap();
        let response = run_migrations(&state).await;
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Database not configured"));
    }
}
