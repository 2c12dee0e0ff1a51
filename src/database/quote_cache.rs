// Session-scoped quote cache
// Stores the full ranked bundle as JSONB keyed by session id. Writes reset
// the 24-hour expiry; reads only return unexpired entries.

use serde_json::Value;
use sqlx::{Pool, Postgres};

use super::StoreError;

pub struct QuoteCache {
    pool: Pool<Postgres>,
}

impl QuoteCache {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Upsert the bundle for a session and push the expiry out 24 hours.
    pub async fn put(&self, session_id: &str, bundle: &Value) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO quotes_storage (session_id, quote_data)
            VALUES ($1, $2)
            ON CONFLICT (session_id)
            DO UPDATE SET
                quote_data = EXCLUDED.quote_data,
                expires_at = CURRENT_TIMESTAMP + INTERVAL '24 hours'
            "#,
        )
        .bind(session_id)
        .bind(bundle)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// The stored bundle, or `None` when absent or expired.
    pub async fn get(&self, session_id: &str) -> Result<Option<Value>, StoreError> {
        let row: Option<(Value,)> = sqlx::query_as(
            r#"
            SELECT quote_data FROM quotes_storage
            WHERE session_id = $1 AND expires_at > CURRENT_TIMESTAMP
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(bundle,)| bundle))
    }
}
