// Migration runner
// Embedded, ordered schema migrations with a tracking table. Each pending
// migration runs inside its own transaction and is recorded on success, so a
// failure leaves earlier migrations applied and the failed one untouched.

use anyhow::{Context, Result};
use log::info;
use sqlx::{Pool, Postgres};
use std::collections::HashSet;

struct Migration {
    name: &'static str,
    sql: &'static str,
}

/// Ordered schema history. Append only; never edit an applied entry.
const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "0001_proposal_forms",
        sql: r#"
            CREATE TABLE IF NOT EXISTS proposal_forms (
                id BIGSERIAL PRIMARY KEY,
                session_id VARCHAR(100) UNIQUE NOT NULL,
                quote_id BIGINT,
                plan_name VARCHAR(200),
                company_name VARCHAR(200),
                premium_amount BIGINT,
                coverage_amount BIGINT,
                status VARCHAR(50) DEFAULT 'draft',
                created_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_proposal_forms_session_id ON proposal_forms(session_id);
            CREATE INDEX IF NOT EXISTS idx_proposal_forms_status ON proposal_forms(status);
        "#,
    },
    Migration {
        name: "0002_proposal_detail_tables",
        sql: r#"
            CREATE TABLE IF NOT EXISTS proposal_personal_details (
                id BIGSERIAL PRIMARY KEY,
                proposal_form_id BIGINT UNIQUE REFERENCES proposal_forms(id) ON DELETE CASCADE,
                full_name VARCHAR(200) NOT NULL,
                preferred_identity_proof VARCHAR(100),
                preferred_age_proof VARCHAR(100),
                preferred_address_proof VARCHAR(100),
                politically_exposed_person BOOLEAN DEFAULT FALSE,
                criminal_offense_record BOOLEAN DEFAULT FALSE,
                marital_status VARCHAR(50),
                highest_education VARCHAR(100),
                country_code VARCHAR(10) DEFAULT '91',
                mobile_number VARCHAR(20),
                email_id VARCHAR(255),
                pan_number VARCHAR(20),
                address_line_1 TEXT,
                address_line_2 TEXT,
                address_line_3 TEXT,
                landmark TEXT,
                pin_code VARCHAR(10),
                city VARCHAR(100),
                state VARCHAR(100),
                permanent_address_same_as_communication BOOLEAN DEFAULT TRUE,
                e_insurance_account_exists BOOLEAN DEFAULT FALSE,
                created_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS proposal_occupation_details (
                id BIGSERIAL PRIMARY KEY,
                proposal_form_id BIGINT UNIQUE REFERENCES proposal_forms(id) ON DELETE CASCADE,
                occupation VARCHAR(100),
                engaged_in_specified_industries BOOLEAN DEFAULT FALSE,
                organization_name VARCHAR(200),
                organization_type VARCHAR(100),
                annual_income BIGINT,
                created_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS proposal_nominee_details (
                id BIGSERIAL PRIMARY KEY,
                proposal_form_id BIGINT UNIQUE REFERENCES proposal_forms(id) ON DELETE CASCADE,
                relationship_with_nominee VARCHAR(100),
                nominee_first_name VARCHAR(100),
                nominee_last_name VARCHAR(100),
                nominee_date_of_birth DATE,
                nominee_additional_details TEXT,
                created_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS proposal_health_details (
                id BIGSERIAL PRIMARY KEY,
                proposal_form_id BIGINT UNIQUE REFERENCES proposal_forms(id) ON DELETE CASCADE,
                weight_kg DOUBLE PRECISION,
                height_feet INTEGER,
                height_inches INTEGER,
                tobacco_consumption BOOLEAN DEFAULT FALSE,
                alcohol_consumption_last_year BOOLEAN DEFAULT FALSE,
                narcotics_consumption BOOLEAN DEFAULT FALSE,
                hazardous_occupation BOOLEAN DEFAULT FALSE,
                armed_forces_employment BOOLEAN DEFAULT FALSE,
                hospitalization_history BOOLEAN DEFAULT FALSE,
                hypertension BOOLEAN DEFAULT FALSE,
                heart_disease BOOLEAN DEFAULT FALSE,
                heart_surgery BOOLEAN DEFAULT FALSE,
                diabetes BOOLEAN DEFAULT FALSE,
                respiratory_disorders BOOLEAN DEFAULT FALSE,
                nervous_disorders BOOLEAN DEFAULT FALSE,
                gastrointestinal_disorders BOOLEAN DEFAULT FALSE,
                liver_disorders BOOLEAN DEFAULT FALSE,
                genitourinary_disorders BOOLEAN DEFAULT FALSE,
                cancer_history BOOLEAN DEFAULT FALSE,
                hiv_infection BOOLEAN DEFAULT FALSE,
                blood_disorders BOOLEAN DEFAULT FALSE,
                psychiatric_illness BOOLEAN DEFAULT FALSE,
                other_disorders BOOLEAN DEFAULT FALSE,
                congenital_defects BOOLEAN DEFAULT FALSE,
                family_history_disorders BOOLEAN DEFAULT FALSE,
                medical_treatment_last_two_years BOOLEAN DEFAULT FALSE,
                weight_change_last_six_months BOOLEAN DEFAULT FALSE,
                created_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS proposal_declarations (
                id BIGSERIAL PRIMARY KEY,
                proposal_form_id BIGINT UNIQUE REFERENCES proposal_forms(id) ON DELETE CASCADE,
                declaration_accepted BOOLEAN DEFAULT FALSE,
                electronic_document_preference BOOLEAN DEFAULT TRUE,
                iib_authorization BOOLEAN DEFAULT FALSE,
                iib_quick_filling BOOLEAN DEFAULT FALSE,
                created_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_proposal_personal_details_proposal_id ON proposal_personal_details(proposal_form_id);
            CREATE INDEX IF NOT EXISTS idx_proposal_occupation_details_proposal_id ON proposal_occupation_details(proposal_form_id);
            CREATE INDEX IF NOT EXISTS idx_proposal_nominee_details_proposal_id ON proposal_nominee_details(proposal_form_id);
            CREATE INDEX IF NOT EXISTS idx_proposal_health_details_proposal_id ON proposal_health_details(proposal_form_id);
            CREATE INDEX IF NOT EXISTS idx_proposal_declarations_proposal_id ON proposal_declarations(proposal_form_id);
        "#,
    },
    Migration {
        name: "0003_proposal_documents",
        sql: r#"
            CREATE TABLE IF NOT EXISTS proposal_documents (
                id BIGSERIAL PRIMARY KEY,
                proposal_form_id BIGINT REFERENCES proposal_forms(id) ON DELETE CASCADE,
                document_type VARCHAR(100),
                document_subtype VARCHAR(100),
                file_name VARCHAR(255),
                file_size BIGINT,
                file_type VARCHAR(50),
                upload_status VARCHAR(50) DEFAULT 'pending',
                created_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_proposal_documents_proposal_id ON proposal_documents(proposal_form_id);
        "#,
    },
    Migration {
        name: "0004_quotes_storage",
        sql: r#"
            CREATE TABLE IF NOT EXISTS quotes_storage (
                id BIGSERIAL PRIMARY KEY,
                session_id VARCHAR(100) UNIQUE NOT NULL,
                quote_data JSONB NOT NULL,
                created_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP,
                expires_at TIMESTAMPTZ DEFAULT (CURRENT_TIMESTAMP + INTERVAL '24 hours')
            );
            CREATE INDEX IF NOT EXISTS idx_quotes_storage_session_id ON quotes_storage(session_id);
            CREATE INDEX IF NOT EXISTS idx_quotes_storage_expires_at ON quotes_storage(expires_at);
        "#,
    },
];

async fn ensure_tracking_table(pool: &Pool<Postgres>) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS applied_migrations (
            migration_name VARCHAR(200) PRIMARY KEY,
            applied_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await
    .context("failed to create migration tracking table")?;
    Ok(())
}

pub async fn applied_migrations(pool: &Pool<Postgres>) -> Result<HashSet<String>> {
    ensure_tracking_table(pool).await?;
    let rows: Vec<(String,)> = sqlx::query_as("SELECT migration_name FROM applied_migrations")
        .fetch_all(pool)
        .await
        .context("failed to read applied migrations")?;
    Ok(rows.into_iter().map(|(name,)| name).collect())
}

/// Apply all pending migrations in order. Returns the names applied this run.
pub async fn apply_all_pending(pool: &Pool<Postgres>) -> Result<Vec<String>> {
    let applied = applied_migrations(pool).await?;
    let mut applied_now = Vec::new();

    for migration in MIGRATIONS {
        if applied.contains(migration.name) {
            continue;
        }

        info!(
            "[PHASE: DATABASE] [STEP: migrate] applying {}",
            migration.name
        );

        let mut tx = pool.begin().await.context("failed to begin transaction")?;
        sqlx::raw_sql(migration.sql)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration {} failed", migration.name))?;
        sqlx::query("INSERT INTO applied_migrations (migration_name) VALUES ($1)")
            .bind(migration.name)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to record migration {}", migration.name))?;
        tx.commit().await.context("failed to commit migration")?;

        applied_now.push(migration.name.to_string());
    }

    Ok(applied_now)
}
