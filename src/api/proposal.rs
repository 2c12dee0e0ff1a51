// Proposal operations: submit, fetch, update.

use log::{info, warn};
use uuid::Uuid;

use crate::database::proposal_db::{ProposalDb, ProposalRecord};
use crate::database::StoreError;
use crate::models::requests::{ProposalSubmitRequest, ProposalUpdateRequest};
use crate::models::responses::{ApiResponse, ProposalSubmitResponse};
use crate::models::state::AppState;

/// Persist a completed proposal. Without a configured database this returns
/// a tagged mock success so front-end flows keep working in demo setups.
pub async fn submit_proposal(
    state: &AppState,
    request: ProposalSubmitRequest,
) -> ApiResponse<ProposalSubmitResponse> {
    let session_uuid = Uuid::new_v4();
    let session_id = format!("proposal_{}", session_uuid);

    let Some(pool) = state.pool() else {
        info!("[PHASE: PROPOSAL] [STEP: submit] database not configured, returning mock response");
        return ApiResponse::ok_with_message(
            ProposalSubmitResponse {
                session_id,
                proposal_id: (session_uuid.as_u128() % 10_000) as i64,
                mock: true,
            },
            "Proposal form submitted successfully (mock response - database not configured)",
        );
    };

    let db = ProposalDb::new(pool.clone());
    match db
        .create(
            &session_id,
            request.quote_data.as_ref(),
            &request.form_data,
            &request.uploaded_documents,
        )
        .await
    {
        Ok(proposal_id) => {
            info!(
                "[PHASE: PROPOSAL] [STEP: submit] created proposal {} for session {}",
                proposal_id, session_id
            );
            ApiResponse::ok_with_message(
                ProposalSubmitResponse {
                    session_id,
                    proposal_id,
                    mock: false,
                },
                "Proposal form submitted successfully",
            )
        }
        Err(e) => {
            warn!("[PHASE: PROPOSAL] [STEP: submit] create failed: {}", e);
            ApiResponse::fail("Failed to create proposal form")
        }
    }
}

pub async fn get_proposal(state: &AppState, session_id: &str) -> ApiResponse<ProposalRecord> {
    if session_id.trim().is_empty() {
        return ApiResponse::fail("Session ID is required");
    }
    let Some(pool) = state.pool() else {
        return ApiResponse::fail("Database not configured");
    };

    match ProposalDb::new(pool.clone()).read(session_id).await {
        Ok(record) => ApiResponse::ok(record),
        Err(StoreError::NotFound) => ApiResponse::fail("Proposal form not found"),
        Err(e) => {
            warn!("[PHASE: PROPOSAL] [STEP: read] fetch failed: {}", e);
            ApiResponse::fail("Failed to fetch proposal form")
        }
    }
}

pub async fn update_proposal(
    state: &AppState,
    request: ProposalUpdateRequest,
) -> ApiResponse<()> {
    if request.session_id.trim().is_empty() {
        return ApiResponse::fail("Session ID is required");
    }
    let Some(pool) = state.pool() else {
        return ApiResponse::fail("Database not configured");
    };

    let db = ProposalDb::new(pool.clone());
    match db
        .update(
            &request.session_id,
            &request.form_data,
            request.uploaded_documents.as_ref(),
        )
        .await
    {
        Ok(()) => ApiResponse::ok_with_message((), "Proposal form updated successfully"),
        Err(StoreError::NotFound) => ApiResponse::fail("Proposal form not found"),
        Err(e) => {
            warn!("[PHASE: PROPOSAL] [STEP: update] update failed: {}", e);
            ApiResponse::fail("Failed to update proposal form")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::form::ProposalFormData;
    use std::collections::HashMap;

    fn state() -> AppState {
        AppState::without_persistence(AppConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn submit_without_persistence_is_tagged_mock() {
        let response = submit_proposal(
            &state(),
            ProposalSubmitRequest {
                form_data: ProposalFormData::default(),
                quote_data: None,
                uploaded_documents: HashMap::new(),
            },
        )
        .await;

        assert!(response.success);
        let data = response.data.unwrap();
        assert!(data.mock);
        assert!(data.session_id.starts_with("proposal_"));
        assert!(data.proposal_id < 10_000);
        assert!(response.message.unwrap().contains("mock response"));
    }

    #[tokio::test]
    async fn get_without_persistence_reports_unavailable() {
        let response = get_proposal(&state(), "proposal_abc").await;
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Database not configured"));
    }

    #[tokio::test]
    async fn get_rejects_empty_session_id() {
        let response = get_proposal(&state(), "").await;
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Session ID is required"));
    }

    #[tokio::test]
    async fn update_without_persistence_reports_unavailable() {
        let response = update_proposal(
            &state(),
            ProposalUpdateRequest {
                session_id: "proposal_abc".to_string(),
                form_data: ProposalFormData::default(),
                uploaded_documents: None,
            },
        )
        .await;
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Database not configured"));
    }
}
