//! Client error types.

use calgrid_core::{RecurrenceError, TimeError, TracingError};
use calgrid_providers::ProviderError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Input could not be read or parsed.
    #[error("invalid input: {0}")]
    Input(String),

    /// Provider mapping error.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Time conversion error.
    #[error("time error: {0}")]
    Time(#[from] TimeError),

    /// Recurrence validation error.
    #[error("invalid recurrence: {0}")]
    Recurrence(#[from] RecurrenceError),

    /// Tracing setup error.
    #[error(transparent)]
    Tracing(#[from] TracingError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
