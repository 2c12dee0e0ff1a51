// Per-step form validation
// Returns a field-name -> message map; an empty map means the step is clean.
// Field keys use the serialized camelCase names so the presentation layer can
// attach messages directly to inputs.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

use super::WizardStep;
use crate::models::form::{DocumentUpload, ProposalFormData};

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z\s]+$").unwrap())
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn mobile_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[6-9]\d{9}$").unwrap())
}

fn organization_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9\s&.,-]+$").unwrap())
}

pub fn validate_step(
    step: WizardStep,
    form: &ProposalFormData,
    documents: &HashMap<String, Vec<DocumentUpload>>,
) -> HashMap<String, String> {
    match step {
        WizardStep::Personal => validate_personal(form),
        WizardStep::Occupation => validate_occupation(form),
        WizardStep::Nominee => validate_nominee(form),
        WizardStep::Health => validate_health(form),
        WizardStep::Payment => validate_payment(form, documents),
    }
}

pub fn validate_personal(form: &ProposalFormData) -> HashMap<String, String> {
    let mut errors = HashMap::new();

    let full_name = form.full_name.trim();
    if full_name.is_empty() {
        errors.insert("fullName".into(), "Full name is required".into());
    } else if !name_re().is_match(full_name) {
        errors.insert(
            "fullName".into(),
            "Name should only contain letters and spaces".into(),
        );
    }

    let email = form.email_id.trim();
    if email.is_empty() {
        errors.insert("emailId".into(), "Email is required".into());
    } else if !email_re().is_match(email) {
        errors.insert(
            "emailId".into(),
            "Please enter a valid email address".into(),
        );
    }

    let mobile = form.mobile_number.trim();
    if mobile.is_empty() {
        errors.insert("mobileNumber".into(), "Mobile number is required".into());
    } else if !mobile_re().is_match(mobile) {
        errors.insert(
            "mobileNumber".into(),
            "Please enter a valid 10-digit mobile number starting with 6, 7, 8, or 9".into(),
        );
    }

    if form.highest_education.trim().is_empty() {
        errors.insert("highestEducation".into(), "Education is required".into());
    }

    if form.existing_policy.trim().is_empty() {
        errors.insert(
            "existingPolicy".into(),
            "Please select if you have an existing policy".into(),
        );
    }

    errors
}

pub fn validate_occupation(form: &ProposalFormData) -> HashMap<String, String> {
    let mut errors = HashMap::new();

    if form.occupation.trim().is_empty() {
        errors.insert("occupation".into(), "Occupation is required".into());
    }

    let organization = form.organization_name.trim();
    if organization.is_empty() {
        errors.insert(
            "organizationName".into(),
            "Organization name is required".into(),
        );
    } else if !organization_re().is_match(organization) {
        errors.insert(
            "organizationName".into(),
            "Organization name should only contain letters, numbers, spaces, and common punctuation"
                .into(),
        );
    }

    if form.organization_type.trim().is_empty() {
        errors.insert(
            "organizationType".into(),
            "Organization type is required".into(),
        );
    }

    if form.annual_income <= 0 {
        errors.insert("annualIncome".into(), "Annual income is required".into());
    }

    if form.engaged_in_specified_industries.is_none() {
        errors.insert(
            "engagedInSpecifiedIndustries".into(),
            "Please select if you work in high-risk industries".into(),
        );
    }

    errors
}

pub fn validate_nominee(form: &ProposalFormData) -> HashMap<String, String> {
    let mut errors = HashMap::new();

    if form.relationship_with_nominee.trim().is_empty() {
        errors.insert(
            "relationshipWithNominee".into(),
            "Relationship is required".into(),
        );
    }

    let first = form.nominee_first_name.trim();
    if first.is_empty() {
        errors.insert(
            "nomineeFirstName".into(),
            "Nominee first name is required".into(),
        );
    } else if !name_re().is_match(first) {
        errors.insert(
            "nomineeFirstName".into(),
            "Name should only contain letters and spaces".into(),
        );
    }

    let last = form.nominee_last_name.trim();
    if last.is_empty() {
        errors.insert(
            "nomineeLastName".into(),
            "Nominee last name is required".into(),
        );
    } else if !name_re().is_match(last) {
        errors.insert(
            "nomineeLastName".into(),
            "Name should only contain letters and spaces".into(),
        );
    }

    if form.nominee_date_of_birth.trim().is_empty() {
        errors.insert(
            "nomineeDateOfBirth".into(),
            "Nominee date of birth is required".into(),
        );
    }

    // Contact details are optional but shape-checked when present.
    let contact = form.nominee_contact_number.trim();
    if !contact.is_empty() && !mobile_re().is_match(contact) {
        errors.insert(
            "nomineeContactNumber".into(),
            "Please enter a valid 10-digit mobile number starting with 6, 7, 8, or 9".into(),
        );
    }

    let email = form.nominee_email.trim();
    if !email.is_empty() && !email_re().is_match(email) {
        errors.insert(
            "nomineeEmail".into(),
            "Please enter a valid email address".into(),
        );
    }

    errors
}

pub fn validate_health(form: &ProposalFormData) -> HashMap<String, String> {
    let mut errors = HashMap::new();

    if form.weight_kg <= 0.0 {
        errors.insert("weightKg".into(), "Weight is required".into());
    }
    if form.height_feet <= 0 {
        errors.insert("heightFeet".into(), "Height (feet) is required".into());
    }
    if form.height_inches < 0 {
        errors.insert("heightInches".into(), "Height (inches) is required".into());
    }

    errors
}

pub fn validate_payment(
    form: &ProposalFormData,
    documents: &HashMap<String, Vec<DocumentUpload>>,
) -> HashMap<String, String> {
    let mut errors = HashMap::new();

    if !form.declaration_accepted {
        errors.insert(
            "declarationAccepted".into(),
            "You must accept the declaration".into(),
        );
    }

    if documents.get("pan_card").map_or(true, |d| d.is_empty()) {
        errors.insert("pan_card".into(), "PAN Card document is required".into());
    }
    if documents.get("address_proof").map_or(true, |d| d.is_empty()) {
        errors.insert(
            "address_proof".into(),
            "Address Proof document is required".into(),
        );
    }

    errors
}
