// API request models
// Payloads the presentation layer hands to the operation facade.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::form::{DocumentUpload, ProposalFormData};

/// The quote the applicant selected, carried from the comparison screen into
/// proposal submission and payment.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteContext {
    pub id: Option<i64>,
    pub plan_name: String,
    pub company_name: String,
    /// Whole rupees.
    pub premium: i64,
    /// Whole rupees.
    pub coverage_amount: i64,
    pub dob: Option<String>,
    /// Upstream plan identifier, required for payment initiation.
    pub quote_plan_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteGenerateRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    /// Cover amount in whole rupees.
    pub cover: Option<i64>,
    /// `YYYY-MM-DD`.
    pub dob: Option<String>,
    pub pincode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSubmitRequest {
    pub form_data: ProposalFormData,
    #[serde(default)]
    pub quote_data: Option<QuoteContext>,
    /// Category key ("pan_card", "address_proof", ...) to recorded files.
    #[serde(default)]
    pub uploaded_documents: HashMap<String, Vec<DocumentUpload>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalUpdateRequest {
    pub session_id: String,
    pub form_data: ProposalFormData,
    /// `None` leaves the stored document set untouched; `Some` replaces it
    /// wholesale.
    #[serde(default)]
    pub uploaded_documents: Option<HashMap<String, Vec<DocumentUpload>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCreateRequest {
    pub form_data: ProposalFormData,
    pub quote_data: QuoteContext,
}
