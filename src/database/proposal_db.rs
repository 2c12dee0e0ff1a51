// Proposal persistence gateway
//
// Parent row in proposal_forms plus one row per detail table and 0..N
// document rows. Create and update each run inside a single transaction so a
// half-written proposal can never land.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, Pool, Postgres};
use std::collections::HashMap;

use super::StoreError;
use crate::models::form::{DocumentUpload, ProposalFormData};
use crate::models::requests::QuoteContext;
use crate::utils::dates::parse_dob;

/// Flattened read model: the parent LEFT JOINed with the first row of each
/// detail table, so detail columns are optional.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRecord {
    pub id: i64,
    pub session_id: String,
    pub quote_id: Option<i64>,
    pub plan_name: Option<String>,
    pub company_name: Option<String>,
    pub premium_amount: Option<i64>,
    pub coverage_amount: Option<i64>,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub full_name: Option<String>,
    pub mobile_number: Option<String>,
    pub email_id: Option<String>,
    pub pan_number: Option<String>,
    pub address_line_1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pin_code: Option<String>,
    pub occupation: Option<String>,
    pub organization_name: Option<String>,
    pub annual_income: Option<i64>,
    pub relationship_with_nominee: Option<String>,
    pub nominee_first_name: Option<String>,
    pub nominee_last_name: Option<String>,
    pub weight_kg: Option<f64>,
    pub height_feet: Option<i32>,
    pub height_inches: Option<i32>,
    pub declaration_accepted: Option<bool>,
    pub electronic_document_preference: Option<bool>,
}

pub struct ProposalDb {
    pool: Pool<Postgres>,
}

impl ProposalDb {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert the whole proposal in one transaction and return the new id.
    pub async fn create(
        &self,
        session_id: &str,
        quote: Option<&QuoteContext>,
        form: &ProposalFormData,
        documents: &HashMap<String, Vec<DocumentUpload>>,
    ) -> Result<i64, StoreError> {
        let mut tx = self.pool.begin().await?;

        let (proposal_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO proposal_forms
                (session_id, quote_id, plan_name, company_name, premium_amount, coverage_amount, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'draft')
            RETURNING id
            "#,
        )
        .bind(session_id)
        .bind(quote.and_then(|q| q.id))
        .bind(quote.map(|q| q.plan_name.as_str()).unwrap_or(""))
        .bind(quote.map(|q| q.company_name.as_str()).unwrap_or(""))
        .bind(quote.map(|q| q.premium).unwrap_or(0))
        .bind(quote.map(|q| q.coverage_amount).unwrap_or(0))
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO proposal_personal_details (
                proposal_form_id, full_name, preferred_identity_proof, preferred_age_proof,
                preferred_address_proof, politically_exposed_person, criminal_offense_record,
                marital_status, highest_education, country_code, mobile_number, email_id,
                pan_number, address_line_1, address_line_2, address_line_3, landmark,
                pin_code, city, state, permanent_address_same_as_communication,
                e_insurance_account_exists
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                      $16, $17, $18, $19, $20, $21, $22)
            "#,
        )
        .bind(proposal_id)
        .bind(&form.full_name)
        .bind(&form.preferred_identity_proof)
        .bind(&form.preferred_age_proof)
        .bind(&form.preferred_address_proof)
        .bind(form.politically_exposed_person)
        .bind(form.criminal_offense_record)
        .bind(&form.marital_status)
        .bind(&form.highest_education)
        .bind(&form.country_code)
        .bind(&form.mobile_number)
        .bind(&form.email_id)
        .bind(&form.pan_number)
        .bind(&form.address_line_1)
        .bind(&form.address_line_2)
        .bind(&form.address_line_3)
        .bind(&form.landmark)
        .bind(&form.pin_code)
        .bind(&form.city)
        .bind(&form.state)
        .bind(form.permanent_address_same_as_communication)
        .bind(form.e_insurance_account_exists)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO proposal_occupation_details (
                proposal_form_id, occupation, engaged_in_specified_industries,
                organization_name, organization_type, annual_income
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(proposal_id)
        .bind(&form.occupation)
        .bind(form.engaged_in_specified_industries.unwrap_or(false))
        .bind(&form.organization_name)
        .bind(&form.organization_type)
        .bind(form.annual_income)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO proposal_nominee_details (
                proposal_form_id, relationship_with_nominee, nominee_first_name,
                nominee_last_name, nominee_date_of_birth, nominee_additional_details
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(proposal_id)
        .bind(&form.relationship_with_nominee)
        .bind(&form.nominee_first_name)
        .bind(&form.nominee_last_name)
        .bind(nominee_dob(form))
        .bind(&form.nominee_additional_details)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO proposal_health_details (
                proposal_form_id, weight_kg, height_feet, height_inches,
                tobacco_consumption, alcohol_consumption_last_year, narcotics_consumption,
                hazardous_occupation, armed_forces_employment, hospitalization_history,
                hypertension, heart_disease, heart_surgery, diabetes,
                respiratory_disorders, nervous_disorders, gastrointestinal_disorders,
                liver_disorders, genitourinary_disorders, cancer_history, hiv_infection,
                blood_disorders, psychiatric_illness, other_disorders, congenital_defects,
                family_history_disorders, medical_treatment_last_two_years,
                weight_change_last_six_months
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                      $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28)
            "#,
        )
        .bind(proposal_id)
        .bind(form.weight_kg)
        .bind(form.height_feet)
        .bind(form.height_inches)
        .bind(form.tobacco_consumption)
        .bind(form.alcohol_consumption_last_year)
        .bind(form.narcotics_consumption)
        .bind(form.hazardous_occupation)
        .bind(form.armed_forces_employment)
        .bind(form.hospitalization_history)
        .bind(form.hypertension)
        .bind(form.heart_disease)
        .bind(form.heart_surgery)
        .bind(form.diabetes)
        .bind(form.respiratory_disorders)
        .bind(form.nervous_disorders)
        .bind(form.gastrointestinal_disorders)
        .bind(form.liver_disorders)
        .bind(form.genitourinary_disorders)
        .bind(form.cancer_history)
        .bind(form.hiv_infection)
        .bind(form.blood_disorders)
        .bind(form.psychiatric_illness)
        .bind(form.other_disorders)
        .bind(form.congenital_defects)
        .bind(form.family_history_disorders)
        .bind(form.medical_treatment_last_two_years)
        .bind(form.weight_change_last_six_months)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO proposal_declarations (
                proposal_form_id, declaration_accepted, electronic_document_preference,
                iib_authorization, iib_quick_filling
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(proposal_id)
        .bind(form.declaration_accepted)
        .bind(form.electronic_document_preference)
        .bind(form.iib_authorization)
        .bind(form.iib_quick_filling)
        .execute(&mut *tx)
        .await?;

        insert_documents(&mut tx, proposal_id, documents).await?;

        tx.commit().await?;
        Ok(proposal_id)
    }

    /// Fetch the flattened proposal for a session.
    pub async fn read(&self, session_id: &str) -> Result<ProposalRecord, StoreError> {
        let record: Option<ProposalRecord> = sqlx::query_as(
            r#"
            SELECT
                pf.id, pf.session_id, pf.quote_id, pf.plan_name, pf.company_name,
                pf.premium_amount, pf.coverage_amount, pf.status, pf.created_at, pf.updated_at,
                pd.full_name, pd.mobile_number, pd.email_id, pd.pan_number,
                pd.address_line_1, pd.city, pd.state, pd.pin_code,
                od.occupation, od.organization_name, od.annual_income,
                nd.relationship_with_nominee, nd.nominee_first_name, nd.nominee_last_name,
                hd.weight_kg, hd.height_feet, hd.height_inches,
                dc.declaration_accepted, dc.electronic_document_preference
            FROM proposal_forms pf
            LEFT JOIN proposal_personal_details pd ON pf.id = pd.proposal_form_id
            LEFT JOIN proposal_occupation_details od ON pf.id = od.proposal_form_id
            LEFT JOIN proposal_nominee_details nd ON pf.id = nd.proposal_form_id
            LEFT JOIN proposal_health_details hd ON pf.id = hd.proposal_form_id
            LEFT JOIN proposal_declarations dc ON pf.id = dc.proposal_form_id
            WHERE pf.session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        record.ok_or(StoreError::NotFound)
    }

    /// Update every detail row in place; replace the document set wholesale
    /// when one is supplied. All inside one transaction.
    pub async fn update(
        &self,
        session_id: &str,
        form: &ProposalFormData,
        documents: Option<&HashMap<String, Vec<DocumentUpload>>>,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let proposal_id: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM proposal_forms WHERE session_id = $1")
                .bind(session_id)
                .fetch_optional(&mut *tx)
                .await?;
        let (proposal_id,) = proposal_id.ok_or(StoreError::NotFound)?;

        sqlx::query("UPDATE proposal_forms SET updated_at = CURRENT_TIMESTAMP WHERE id = $1")
            .bind(proposal_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            UPDATE proposal_personal_details SET
                full_name = $2, preferred_identity_proof = $3, preferred_age_proof = $4,
                preferred_address_proof = $5, politically_exposed_person = $6,
                criminal_offense_record = $7, marital_status = $8, highest_education = $9,
                mobile_number = $10, email_id = $11, pan_number = $12, address_line_1 = $13,
                address_line_2 = $14, address_line_3 = $15, landmark = $16, pin_code = $17,
                city = $18, state = $19, permanent_address_same_as_communication = $20,
                e_insurance_account_exists = $21, updated_at = CURRENT_TIMESTAMP
            WHERE proposal_form_id = $1
            "#,
        )
        .bind(proposal_id)
        .bind(&form.full_name)
        .bind(&form.preferred_identity_proof)
        .bind(&form.preferred_age_proof)
        .bind(&form.preferred_address_proof)
        .bind(form.politically_exposed_person)
        .bind(form.criminal_offense_record)
        .bind(&form.marital_status)
        .bind(&form.highest_education)
        .bind(&form.mobile_number)
        .bind(&form.email_id)
        .bind(&form.pan_number)
        .bind(&form.address_line_1)
        .bind(&form.address_line_2)
        .bind(&form.address_line_3)
        .bind(&form.landmark)
        .bind(&form.pin_code)
        .bind(&form.city)
        .bind(&form.state)
        .bind(form.permanent_address_same_as_communication)
        .bind(form.e_insurance_account_exists)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE proposal_occupation_details SET
                occupation = $2, engaged_in_specified_industries = $3,
                organization_name = $4, organization_type = $5, annual_income = $6,
                updated_at = CURRENT_TIMESTAMP
            WHERE proposal_form_id = $1
            "#,
        )
        .bind(proposal_id)
        .bind(&form.occupation)
        .bind(form.engaged_in_specified_industries.unwrap_or(false))
        .bind(&form.organization_name)
        .bind(&form.organization_type)
        .bind(form.annual_income)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE proposal_nominee_details SET
                relationship_with_nominee = $2, nominee_first_name = $3,
                nominee_last_name = $4, nominee_date_of_birth = $5,
                nominee_additional_details = $6, updated_at = CURRENT_TIMESTAMP
            WHERE proposal_form_id = $1
            "#,
        )
        .bind(proposal_id)
        .bind(&form.relationship_with_nominee)
        .bind(&form.nominee_first_name)
        .bind(&form.nominee_last_name)
        .bind(nominee_dob(form))
        .bind(&form.nominee_additional_details)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE proposal_health_details SET
                weight_kg = $2, height_feet = $3, height_inches = $4,
                tobacco_consumption = $5, alcohol_consumption_last_year = $6,
                narcotics_consumption = $7, hazardous_occupation = $8,
                armed_forces_employment = $9, hospitalization_history = $10,
                hypertension = $11, heart_disease = $12, heart_surgery = $13,
                diabetes = $14, respiratory_disorders = $15, nervous_disorders = $16,
                gastrointestinal_disorders = $17, liver_disorders = $18,
                genitourinary_disorders = $19, cancer_history = $20, hiv_infection = $21,
                blood_disorders = $22, psychiatric_illness = $23, other_disorders = $24,
                congenital_defects = $25, family_history_disorders = $26,
                medical_treatment_last_two_years = $27, weight_change_last_six_months = $28,
                updated_at = CURRENT_TIMESTAMP
            WHERE proposal_form_id = $1
            "#,
        )
        .bind(proposal_id)
        .bind(form.weight_kg)
        .bind(form.height_feet)
        .bind(form.height_inches)
        .bind(form.tobacco_consumption)
        .bind(form.alcohol_consumption_last_year)
        .bind(form.narcotics_consumption)
        .bind(form.hazardous_occupation)
        .bind(form.armed_forces_employment)
        .bind(form.hospitalization_history)
        .bind(form.hypertension)
        .bind(form.heart_disease)
        .bind(form.heart_surgery)
        .bind(form.diabetes)
        .bind(form.respiratory_disorders)
        .bind(form.nervous_disorders)
        .bind(form.gastrointestinal_disorders)
        .bind(form.liver_disorders)
        .bind(form.genitourinary_disorders)
        .bind(form.cancer_history)
        .bind(form.hiv_infection)
        .bind(form.blood_disorders)
        .bind(form.psychiatric_illness)
        .bind(form.other_disorders)
        .bind(form.congenital_defects)
        .bind(form.family_history_disorders)
        .bind(form.medical_treatment_last_two_years)
        .bind(form.weight_change_last_six_months)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE proposal_declarations SET
                declaration_accepted = $2, electronic_document_preference = $3,
                iib_authorization = $4, iib_quick_filling = $5,
                updated_at = CURRENT_TIMESTAMP
            WHERE proposal_form_id = $1
            "#,
        )
        .bind(proposal_id)
        .bind(form.declaration_accepted)
        .bind(form.electronic_document_preference)
        .bind(form.iib_authorization)
        .bind(form.iib_quick_filling)
        .execute(&mut *tx)
        .await?;

        if let Some(documents) = documents {
            sqlx::query("DELETE FROM proposal_documents WHERE proposal_form_id = $1")
                .bind(proposal_id)
                .execute(&mut *tx)
                .await?;
            insert_documents(&mut tx, proposal_id, documents).await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

async fn insert_documents(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    proposal_id: i64,
    documents: &HashMap<String, Vec<DocumentUpload>>,
) -> Result<(), StoreError> {
    for (document_type, files) in documents {
        for file in files {
            sqlx::query(
                r#"
                INSERT INTO proposal_documents (
                    proposal_form_id, document_type, document_subtype,
                    file_name, file_size, file_type, upload_status
                ) VALUES ($1, $2, $3, $4, $5, $6, 'uploaded')
                "#,
            )
            .bind(proposal_id)
            .bind(document_type)
            .bind(&file.document_subtype)
            .bind(&file.file_name)
            .bind(file.file_size)
            .bind(&file.file_type)
            .execute(&mut **tx)
            .await?;
        }
    }
    Ok(())
}

/// Nominee date of birth as a DATE column value; unparseable or empty
/// strings store as NULL.
fn nominee_dob(form: &ProposalFormData) -> Option<NaiveDate> {
    parse_dob(&form.nominee_date_of_birth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominee_dob_accepts_both_date_forms() {
        let mut form = ProposalFormData::default();
        assert!(nominee_dob(&form).is_none());

        form.nominee_date_of_birth = "1990-01-20".to_string();
        assert_eq!(
            nominee_dob(&form),
            NaiveDate::from_ymd_opt(1990, 1, 20)
        );

        form.nominee_date_of_birth = "20/01/1990".to_string();
        assert_eq!(
            nominee_dob(&form),
            NaiveDate::from_ymd_opt(1990, 1, 20)
        );

        form.nominee_date_of_birth = "garbage".to_string();
        assert!(nominee_dob(&form).is_none());
    }
}
