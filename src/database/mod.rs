// Persistence layer: connection handling, embedded migrations, the proposal
// gateway, and the session-scoped quote cache.

pub mod connection;
pub mod migrations;
pub mod proposal_db;
pub mod quote_cache;

use thiserror::Error;

/// Failure modes of the persistence gateways. `NotFound` is a business
/// outcome the facade phrases for the caller; everything else is a fault.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("persistence is not configured")]
    Unavailable,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
