// Quote acquisition and normalization

pub mod normalizer;
pub mod provider;

use thiserror::Error;

/// Failure modes of a quote acquisition round-trip. `NoQuotesAvailable` is a
/// business outcome, kept distinct from transport and auth failures so the
/// facade can phrase it differently.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("provider rejected the service credentials")]
    AuthRejected,
    #[error("provider request timed out")]
    Timeout,
    #[error("provider transport failure: {0}")]
    Transport(String),
    #[error("no quotes available from any insurer")]
    NoQuotesAvailable,
    #[error("malformed provider response: {0}")]
    BadResponse(String),
}
