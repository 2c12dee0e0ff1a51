// Quote operations: acquisition and session retrieval.

use chrono::Utc;
use log::{info, warn};

use crate::database::quote_cache::QuoteCache;
use crate::models::requests::QuoteGenerateRequest;
use crate::models::responses::ApiResponse;
use crate::models::state::AppState;
use crate::quotes::normalizer::{normalize, QuoteBundle, QuoteSummary, QuoteTracking, RawQuote};
use crate::quotes::provider::CustomerProfile;
use crate::quotes::AcquisitionError;

/// Acquire fresh quotes for an applicant, cache the bundle best-effort, and
/// return it. Cache failures never fail the operation.
pub async fn generate_quotes(
    state: &AppState,
    request: QuoteGenerateRequest,
) -> ApiResponse<QuoteBundle> {
    let cover = request.cover.unwrap_or(0);
    let dob = request.dob.unwrap_or_default();
    let pincode = request.pincode.unwrap_or_default();
    if cover <= 0 || dob.trim().is_empty() || pincode.trim().is_empty() {
        return ApiResponse::fail("Missing required fields");
    }

    let profile = CustomerProfile {
        name: request.name,
        phone: request.phone,
        cover,
        dob,
        pincode,
    };

    let bundle = match state.provider().get_quotes(&profile).await {
        Ok(bundle) => bundle,
        Err(AcquisitionError::NoQuotesAvailable) => {
            return ApiResponse::fail("No quotes available from any insurer");
        }
        Err(e) => {
            warn!("[PHASE: QUOTES] [STEP: acquire] acquisition failed: {}", e);
            return ApiResponse::fail("Unable to fetch quotes");
        }
    };

    store_bundle(state, &bundle).await;

    let message = format!(
        "Generated quotes for {}y old, ₹{}Cr cover",
        bundle.tracking.customer_age, bundle.tracking.cover_in_crores
    );
    ApiResponse::ok_with_message(bundle, message)
}

/// Write the bundle to the session cache when a database is available.
async fn store_bundle(state: &AppState, bundle: &QuoteBundle) {
    let Some(pool) = state.pool() else {
        info!("[PHASE: QUOTES] [STEP: cache] no database configured; skipping quote storage");
        return;
    };

    let payload = match serde_json::to_value(bundle) {
        Ok(v) => v,
        Err(e) => {
            warn!("[PHASE: QUOTES] [STEP: cache] bundle serialization failed: {}", e);
            return;
        }
    };

    match QuoteCache::new(pool.clone())
        .put(&bundle.session_id, &payload)
        .await
    {
        Ok(()) => info!(
            "[PHASE: QUOTES] [STEP: cache] stored bundle for session {}",
            bundle.session_id
        ),
        Err(e) => warn!(
            "[PHASE: QUOTES] [STEP: cache] failed to store bundle for session {}: {}",
            bundle.session_id, e
        ),
    }
}

/// Look up a session's cached bundle; reloads degrade to a mock bundle when
/// persistence is absent or the entry is missing or expired.
pub async fn get_session_quotes(state: &AppState, session_id: &str) -> ApiResponse<QuoteBundle> {
    if session_id.trim().is_empty() {
        return ApiResponse::fail("Session ID is required");
    }

    if let Some(pool) = state.pool() {
        match QuoteCache::new(pool.clone()).get(session_id).await {
            Ok(Some(payload)) => match serde_json::from_value::<QuoteBundle>(payload) {
                Ok(bundle) => return ApiResponse::ok(bundle),
                Err(e) => warn!(
                    "[PHASE: QUOTES] [STEP: session] stored bundle for {} is unreadable: {}",
                    session_id, e
                ),
            },
            Ok(None) => info!(
                "[PHASE: QUOTES] [STEP: session] no cached bundle for {}",
                session_id
            ),
            Err(e) => warn!(
                "[PHASE: QUOTES] [STEP: session] cache lookup failed for {}: {}",
                session_id, e
            ),
        }
    }

    ApiResponse::ok(mock_bundle(session_id))
}

/// The documented fallback bundle, built through the normalizer so its
/// savings and recommendation annotations stay consistent.
fn mock_bundle(session_id: &str) -> QuoteBundle {
    let raw = vec![
        RawQuote {
            id: 1,
            plan_name: "iProtect Smart".to_string(),
            premium: 18291,
            policy_term: "36".to_string(),
            payment_term: "36".to_string(),
            payment_frequency: "Yearly".to_string(),
            company_name: "ICICI Prudential Life Insurance".to_string(),
            company_logo: "ICICI".to_string(),
            brochure: String::new(),
            base_premium: 18291,
            gst: 0,
        },
        RawQuote {
            id: 2,
            plan_name: "HDFC Life Click to Protect Life".to_string(),
            premium: 21690,
            policy_term: "36".to_string(),
            payment_term: "36".to_string(),
            payment_frequency: "Yearly".to_string(),
            company_name: "HDFC Life Insurance".to_string(),
            company_logo: "HDFC".to_string(),
            brochure: String::new(),
            base_premium: 21690,
            gst: 0,
        },
    ];
    let cover_amount = 1_000_000;

    // Two non-empty quotes, so normalization always succeeds.
    let (quotes, summary) = normalize(raw, cover_amount).unwrap_or_else(|_| {
        (
            Vec::new(),
            QuoteSummary {
                total_quotes: 0,
                cover_amount,
                best_premium: 0,
                max_savings: 0,
                insurers_count: 0,
            },
        )
    });

    QuoteBundle {
        session_id: session_id.to_string(),
        summary,
        tracking: QuoteTracking {
            request_id: session_id.trim_start_matches("track_").to_string(),
            customer_age: 30,
            cover_in_crores: 0,
            pincode: "400001".to_string(),
            provider_quote_id: Some("mock_quote_id".to_string()),
            timestamp: Utc::now(),
            quotes_count: quotes.len(),
        },
        quotes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn state() -> AppState {
        AppState::without_persistence(AppConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn generate_quotes_rejects_missing_fields() {
        let response = generate_quotes(
            &state(),
            QuoteGenerateRequest {
                name: None,
                phone: None,
                cover: Some(10_000_000),
                dob: None,
                pincode: Some("400001".to_string()),
            },
        )
        .await;

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Missing required fields"));
    }

    #[tokio::test]
    async fn session_lookup_without_persistence_returns_mock() {
        let response = get_session_quotes(&state(), "track_req_abc123").await;
        assert!(response.success);

        let bundle = response.data.unwrap();
        assert_eq!(bundle.session_id, "track_req_abc123");
        assert_eq!(bundle.tracking.request_id, "req_abc123");
        assert_eq!(bundle.summary.total_quotes, 2);
    }

    #[tokio::test]
    async fn session_lookup_rejects_empty_session() {
        let response = get_session_quotes(&state(), "  ").await;
        assert!(!response.success);
    }

    #[test]
    fn mock_bundle_ranks_cheaper_quote_first() {
        let bundle = mock_bundle("track_x");
        assert_eq!(bundle.quotes[0].quote.premium, 18291);
        assert!(bundle.quotes[0].is_recommended);
        assert_eq!(bundle.quotes[0].savings, 0);
        assert_eq!(bundle.quotes[1].quote.premium, 21690);
        assert_eq!(bundle.quotes[1].savings, 3399);
        assert_eq!(bundle.summary.best_premium, 18291);
        assert_eq!(bundle.summary.max_savings, 3399);
    }
}
