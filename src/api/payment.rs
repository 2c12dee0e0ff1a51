// Payment initiation
// Builds the provider's proposal-creation payload from the accumulated form
// and selected quote, then extracts the insurer's payment redirect URL.

use log::warn;
use serde_json::{json, Value};

use crate::models::form::ProposalFormData;
use crate::models::requests::{PaymentCreateRequest, QuoteContext};
use crate::models::responses::{ApiResponse, PaymentCreateResponse};
use crate::models::state::AppState;
use crate::utils::dates::to_provider_date;

pub async fn create_payment(
    state: &AppState,
    request: PaymentCreateRequest,
) -> ApiResponse<PaymentCreateResponse> {
    let Some(quote_plan_id) = request
        .quote_data
        .quote_plan_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
    else {
        return ApiResponse::fail("Missing quote plan id");
    };

    let payload = build_payment_payload(&request.form_data, &request.quote_data, quote_plan_id);

    let body = match state.provider().create_proposal(&payload).await {
        Ok(body) => body,
        Err(e) => {
            warn!("[PHASE: PAYMENT] [STEP: create] proposal creation failed: {}", e);
            return ApiResponse::fail("Payment initiation failed");
        }
    };

    match body["insurerSpecificData"]["proposalUrl"].as_str() {
        Some(url) if !url.is_empty() => ApiResponse::ok(PaymentCreateResponse {
            payment_url: url.to_string(),
        }),
        _ => ApiResponse::fail("Payment URL not found in provider response"),
    }
}

fn field(id: &str, parent: &str, value: impl Into<Value>) -> Value {
    json!({
        "id": id,
        "parentProperty": parent,
        "value": value.into(),
    })
}

/// The provider's flat proposal field list: proposer identity and contact
/// details mirrored onto the insured member, with fixed demographic defaults
/// for what the intake flow does not collect.
fn build_payment_payload(
    form: &ProposalFormData,
    quote: &QuoteContext,
    quote_plan_id: &str,
) -> Value {
    let dob = quote
        .dob
        .as_deref()
        .map(to_provider_date)
        .unwrap_or_default();
    let marital_status = if form.marital_status.trim().is_empty() {
        "married".to_string()
    } else {
        form.marital_status.to_lowercase()
    };
    let location = if form.city.trim().is_empty() {
        "mumbai".to_string()
    } else {
        form.city.to_lowercase()
    };

    let fields = vec![
        field("proposerFullName", "proposerDetails", form.full_name.as_str()),
        field("proposerEmail", "proposerDetails", form.email_id.as_str()),
        field("dob", "proposerDetails", dob.as_str()),
        field("gender", "proposerDetails", "Male"),
        field(
            "proposerPhoneNumber",
            "proposerDetails",
            form.mobile_number.as_str(),
        ),
        field(
            "proposerMaritalStatus",
            "proposerDetails",
            marital_status.as_str(),
        ),
        field("location", "proposerDetails", location.as_str()),
        field("proposerNri", "insuredMember", "NO"),
        field("sameAsProposerDetail", "proposerDetails", true),
        field("fullNameMember", "insuredMember", form.full_name.as_str()),
        field("emailMember", "insuredMember", form.email_id.as_str()),
        field("insurerDob", "insuredMember", dob.as_str()),
        field("insurerGender", "insuredMember", "Male"),
        field("phoneMember", "insuredMember", form.mobile_number.as_str()),
        field(
            "maritalStatusMember",
            "insuredMember",
            marital_status.as_str(),
        ),
        field("insurerNri", "insuredMember", "NO"),
    ];

    json!({
        "fields": fields,
        "pageStep": "2",
        "ignoreMicroserviceCalls": true,
        "quotePlanId": quote_plan_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::state::AppState;

    fn form() -> ProposalFormData {
        let mut f = ProposalFormData::default();
        f.full_name = "Asha Rao".to_string();
        f.email_id = "asha@example.com".to_string();
        f.mobile_number = "9812345678".to_string();
        f.marital_status = "Single".to_string();
        f.city = "Pune".to_string();
        f
    }

    fn quote() -> QuoteContext {
        QuoteContext {
            id: Some(1),
            plan_name: "iProtect Smart".to_string(),
            company_name: "ICICI Prudential".to_string(),
            premium: 18291,
            coverage_amount: 10_000_000,
            dob: Some("1992-04-15".to_string()),
            quote_plan_id: Some("6153659".to_string()),
        }
    }

    fn field_value<'a>(payload: &'a Value, id: &str) -> &'a Value {
        &payload["fields"]
            .as_array()
            .unwrap()
            .iter()
            .find(|f| f["id"] == id)
            .unwrap_or_else(|| panic!("missing field {}", id))["value"]
    }

    #[test]
    fn payload_mirrors_proposer_onto_insured_member() {
        let payload = build_payment_payload(&form(), &quote(), "6153659");

        assert_eq!(field_value(&payload, "proposerFullName"), "Asha Rao");
        assert_eq!(field_value(&payload, "fullNameMember"), "Asha Rao");
        assert_eq!(field_value(&payload, "proposerPhoneNumber"), "9812345678");
        assert_eq!(field_value(&payload, "phoneMember"), "9812345678");
        assert_eq!(field_value(&payload, "dob"), "15/04/1992");
        assert_eq!(field_value(&payload, "insurerDob"), "15/04/1992");
        assert_eq!(field_value(&payload, "proposerMaritalStatus"), "single");
        assert_eq!(field_value(&payload, "location"), "pune");

        assert_eq!(payload["pageStep"], "2");
        assert_eq!(payload["ignoreMicroserviceCalls"], true);
        assert_eq!(payload["quotePlanId"], "6153659");
    }

    #[test]
    fn payload_falls_back_to_default_demographics() {
        let mut f = form();
        f.marital_status = String::new();
        f.city = String::new();
        let payload = build_payment_payload(&f, &quote(), "6153659");
        assert_eq!(field_value(&payload, "proposerMaritalStatus"), "married");
        assert_eq!(field_value(&payload, "location"), "mumbai");
    }

    #[tokio::test]
    async fn create_payment_requires_quote_plan_id() {
        let state = AppState::without_persistence(AppConfig::default()).unwrap();
        let mut q = quote();
        q.quote_plan_id = None;
        let response = create_payment(
            &state,
            PaymentCreateRequest {
                form_data: form(),
                quote_data: q,
            },
        )
        .await;
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Missing quote plan id"));
    }
}
