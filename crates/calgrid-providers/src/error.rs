//! Error types for provider payload mapping.
//!
//! Mapping errors carry a [`ProviderErrorCode`] for classification, the
//! provider that raised them, and the underlying cause when there is one.

use std::fmt;

use calgrid_core::{ProviderId, TimeError};
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// The payload does not have the expected shape.
    InvalidPayload,
    /// A required field is absent.
    MissingField,
    /// A boundary could not be parsed or violates the event invariants.
    InvalidTime,
    /// A time zone name resolves to no known zone.
    UnknownTimeZone,
    /// The provider cannot express the requested value.
    Unsupported,
    /// Unexpected state.
    InternalError,
}

impl ProviderErrorCode {
    /// Returns true if the error comes from one bad event, so a batch can
    /// skip it and carry on.
    pub fn is_per_event(&self) -> bool {
        !matches!(self, Self::InternalError)
    }

    /// Returns a snake_case name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidPayload => "invalid_payload",
            Self::MissingField => "missing_field",
            Self::InvalidTime => "invalid_time",
            Self::UnknownTimeZone => "unknown_time_zone",
            Self::Unsupported => "unsupported",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error raised while mapping between provider payloads and events.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    /// Provider that raised the error, if known.
    provider: Option<ProviderId>,
    /// Id of the event being mapped, if known.
    event_id: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider: None,
            event_id: None,
            source: None,
        }
    }

    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidPayload, message)
    }

    /// Creates a missing field error naming the field.
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ProviderErrorCode::MissingField,
            format!("missing field '{}'", field),
        )
    }

    pub fn invalid_time(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidTime, message)
    }

    /// Creates an unknown time zone error naming the zone.
    pub fn unknown_time_zone(name: &str) -> Self {
        Self::new(
            ProviderErrorCode::UnknownTimeZone,
            format!("unknown time zone '{}'", name),
        )
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Unsupported, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InternalError, message)
    }

    /// Sets the provider for this error.
    pub fn with_provider(mut self, provider: ProviderId) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Sets the event id for this error, keeping an existing one.
    pub fn with_event_id(mut self, id: impl Into<String>) -> Self {
        if self.event_id.is_none() {
            self.event_id = Some(id.into());
        }
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn provider(&self) -> Option<ProviderId> {
        self.provider
    }

    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(provider) = self.provider {
            write!(f, "[{}] ", provider)?;
        }
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(ref id) = self.event_id {
            write!(f, " (event {})", id)?;
        }
        Ok(())
    }
}

impl From<TimeError> for ProviderError {
    fn from(err: TimeError) -> Self {
        let code = match err {
            TimeError::UnknownTimeZone(_) => ProviderErrorCode::UnknownTimeZone,
            _ => ProviderErrorCode::InvalidTime,
        };
        Self::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_payload(err.to_string()).with_source(err)
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
