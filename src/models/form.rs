// Proposal form data
// One flat struct accumulated across the wizard steps; serialized camelCase
// so snapshots and API payloads share the front-end field names.

use serde::{Deserialize, Serialize};

/// A file recorded against a document category (identity proof, address
/// proof, ...). Only metadata is tracked here; blob storage is external.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpload {
    pub file_name: String,
    pub file_size: i64,
    pub file_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_subtype: Option<String>,
}

/// Everything the wizard collects. Fields default to "" / `false` / `0`
/// except `permanent_address_same_as_communication` and
/// `electronic_document_preference`, which default to `true`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProposalFormData {
    // Personal
    pub full_name: String,
    pub preferred_identity_proof: String,
    pub preferred_age_proof: String,
    pub preferred_address_proof: String,
    pub politically_exposed_person: bool,
    pub criminal_offense_record: bool,
    pub marital_status: String,
    pub highest_education: String,
    pub country_code: String,
    pub mobile_number: String,
    pub email_id: String,
    pub pan_number: String,
    pub address_line_1: String,
    pub address_line_2: String,
    pub address_line_3: String,
    pub landmark: String,
    pub pin_code: String,
    pub city: String,
    pub state: String,
    pub permanent_address_same_as_communication: bool,
    pub e_insurance_account_exists: bool,
    /// Wizard-only: "Yes"/"No" answer, not persisted to a detail table.
    pub existing_policy: String,

    // Occupation
    pub occupation: String,
    /// Tri-state: `None` means the applicant has not answered yet, and the
    /// occupation step will not let them past without an explicit answer.
    pub engaged_in_specified_industries: Option<bool>,
    pub organization_name: String,
    pub organization_type: String,
    /// Whole rupees.
    pub annual_income: i64,

    // Nominee
    pub relationship_with_nominee: String,
    pub nominee_first_name: String,
    pub nominee_last_name: String,
    pub nominee_date_of_birth: String,
    pub nominee_additional_details: String,
    /// Wizard-only, optional but shape-checked when present.
    pub nominee_contact_number: String,
    pub nominee_email: String,

    // Health
    pub weight_kg: f64,
    pub height_feet: i32,
    pub height_inches: i32,
    pub tobacco_consumption: bool,
    pub alcohol_consumption_last_year: bool,
    pub narcotics_consumption: bool,
    pub hazardous_occupation: bool,
    pub armed_forces_employment: bool,
    pub hospitalization_history: bool,
    pub hypertension: bool,
    pub heart_disease: bool,
    pub heart_surgery: bool,
    pub diabetes: bool,
    pub respiratory_disorders: bool,
    pub nervous_disorders: bool,
    pub gastrointestinal_disorders: bool,
    pub liver_disorders: bool,
    pub genitourinary_disorders: bool,
    pub cancer_history: bool,
    pub hiv_infection: bool,
    pub blood_disorders: bool,
    pub psychiatric_illness: bool,
    pub other_disorders: bool,
    pub congenital_defects: bool,
    pub family_history_disorders: bool,
    pub medical_treatment_last_two_years: bool,
    pub weight_change_last_six_months: bool,

    // Declarations
    pub declaration_accepted: bool,
    pub electronic_document_preference: bool,
    pub iib_authorization: bool,
    pub iib_quick_filling: bool,
}

impl Default for ProposalFormData {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            preferred_identity_proof: String::new(),
            preferred_age_proof: String::new(),
            preferred_address_proof: String::new(),
            politically_exposed_person: false,
            criminal_offense_record: false,
            marital_status: String::new(),
            highest_education: String::new(),
            country_code: "91".to_string(),
            mobile_number: String::new(),
            email_id: String::new(),
            pan_number: String::new(),
            address_line_1: String::new(),
            address_line_2: String::new(),
            address_line_3: String::new(),
            landmark: String::new(),
            pin_code: String::new(),
            city: String::new(),
            state: String::new(),
            permanent_address_same_as_communication: true,
            e_insurance_account_exists: false,
            existing_policy: String::new(),
            occupation: String::new(),
            engaged_in_specified_industries: None,
            organization_name: String::new(),
            organization_type: String::new(),
            annual_income: 0,
            relationship_with_nominee: String::new(),
            nominee_first_name: String::new(),
            nominee_last_name: String::new(),
            nominee_date_of_birth: String::new(),
            nominee_additional_details: String::new(),
            nominee_contact_number: String::new(),
            nominee_email: String::new(),
            weight_kg: 0.0,
            height_feet: 0,
            height_inches: 0,
            tobacco_consumption: false,
            alcohol_consumption_last_year: false,
            narcotics_consumption: false,
            hazardous_occupation: false,
            armed_forces_employment: false,
            hospitalization_history: false,
            hypertension: false,
            heart_disease: false,
            heart_surgery: false,
            diabetes: false,
            respiratory_disorders: false,
            nervous_disorders: false,
            gastrointestinal_disorders: false,
            liver_disorders: false,
            genitourinary_disorders: false,
            cancer_history: false,
            hiv_infection: false,
            blood_disorders: false,
            psychiatric_illness: false,
            other_disorders: false,
            congenital_defects: false,
            family_history_disorders: false,
            medical_treatment_last_two_years: false,
            weight_change_last_six_months: false,
            declaration_accepted: false,
            electronic_document_preference: true,
            iib_authorization: false,
            iib_quick_filling: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let form = ProposalFormData::default();
        assert!(form.permanent_address_same_as_communication);
        assert!(form.electronic_document_preference);
        assert_eq!(form.country_code, "91");
        assert!(!form.declaration_accepted);
        assert_eq!(form.annual_income, 0);
        assert!(form.engaged_in_specified_industries.is_none());
    }

    #[test]
    fn serializes_camel_case() {
        let v = serde_json::to_value(ProposalFormData::default()).unwrap();
        assert!(v.get("fullName").is_some());
        assert!(v.get("addressLine1").is_some());
        assert!(v.get("permanentAddressSameAsCommunication").is_some());
        assert!(v.get("full_name").is_none());
    }

    #[test]
    fn partial_payload_fills_defaults() {
        let form: ProposalFormData =
            serde_json::from_value(serde_json::json!({ "fullName": "Asha Rao" })).unwrap();
        assert_eq!(form.full_name, "Asha Rao");
        assert!(form.permanent_address_same_as_communication);
    }
}
