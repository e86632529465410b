//! The mapper contract and the provider tagged union.
//!
//! Each provider implements [`EventMapper`] for its own payload types.
//! Payloads of either provider travel together as [`ProviderEvent`], tagged
//! by `providerId`, and are dispatched on that tag rather than by probing
//! fields.

use calgrid_core::{CalendarEvent, EventKey, ProviderId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, ProviderResult};
use crate::google::{GoogleEvent, GoogleEventWrite, GoogleMapper};
use crate::microsoft::{MicrosoftEvent, MicrosoftEventWrite, MicrosoftMapper};

/// Where the events being mapped live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingContext {
    pub account_id: String,
    pub calendar_id: String,
}

impl MappingContext {
    pub fn new(account_id: impl Into<String>, calendar_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            calendar_id: calendar_id.into(),
        }
    }

    /// Layout key for an event id in this calendar.
    pub fn key(&self, id: impl Into<String>) -> EventKey {
        EventKey::new(&self.account_id, &self.calendar_id, id)
    }
}

/// Converts between one provider's payloads and [`CalendarEvent`].
pub trait EventMapper {
    /// Event as read from the provider.
    type Payload: DeserializeOwned;
    /// Event as written back to the provider.
    type WritePayload: Serialize;

    /// The provider this mapper speaks for.
    fn provider_id(&self) -> ProviderId;

    /// Maps a provider payload into the internal model.
    fn normalize(&self, ctx: &MappingContext, payload: &Self::Payload) -> ProviderResult<CalendarEvent>;

    /// Maps an internal event back into a provider write payload.
    fn denormalize(&self, event: &CalendarEvent) -> ProviderResult<Self::WritePayload>;

    /// Returns true for payloads that describe a cancelled event.
    fn is_cancelled(&self, payload: &Self::Payload) -> bool;

    /// Parses and normalizes a raw JSON payload.
    fn normalize_json(&self, ctx: &MappingContext, value: serde_json::Value) -> ProviderResult<CalendarEvent> {
        let payload: Self::Payload =
            serde_json::from_value(value).map_err(|e| ProviderError::from(e).with_provider(self.provider_id()))?;
        self.normalize(ctx, &payload)
    }
}

/// A provider payload tagged with its provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "providerId", rename_all = "lowercase")]
pub enum ProviderEvent {
    Google(GoogleEvent),
    Microsoft(MicrosoftEvent),
}

impl ProviderEvent {
    /// Tags a raw JSON payload with `provider` and parses it.
    pub fn from_json(provider: ProviderId, value: serde_json::Value) -> ProviderResult<Self> {
        let event = match provider {
            ProviderId::Google => Self::Google(serde_json::from_value(value)?),
            ProviderId::Microsoft => Self::Microsoft(serde_json::from_value(value)?),
        };
        Ok(event)
    }

    pub fn provider_id(&self) -> ProviderId {
        match self {
            Self::Google(_) => ProviderId::Google,
            Self::Microsoft(_) => ProviderId::Microsoft,
        }
    }

    /// Provider-side id, if the payload carries one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Google(e) => e.id.as_deref(),
            Self::Microsoft(e) => e.id.as_deref(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Google(e) => GoogleMapper.is_cancelled(e),
            Self::Microsoft(e) => MicrosoftMapper.is_cancelled(e),
        }
    }

    /// Normalizes with the mapper for this payload's provider.
    pub fn normalize(&self, ctx: &MappingContext) -> ProviderResult<CalendarEvent> {
        let result = match self {
            Self::Google(e) => GoogleMapper.normalize(ctx, e),
            Self::Microsoft(e) => MicrosoftMapper.normalize(ctx, e),
        };
        result.map_err(|err| {
            let err = err.with_provider(self.provider_id());
            match self.id() {
                Some(id) => err.with_event_id(id),
                None => err,
            }
        })
    }
}

/// A write payload tagged with its provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "providerId", rename_all = "lowercase")]
pub enum ProviderWrite {
    Google(GoogleEventWrite),
    Microsoft(MicrosoftEventWrite),
}

/// Denormalizes with the mapper matching the event's `provider_id`.
pub fn denormalize_event(event: &CalendarEvent) -> ProviderResult<ProviderWrite> {
    let result = match event.provider_id {
        ProviderId::Google => GoogleMapper.denormalize(event).map(ProviderWrite::Google),
        ProviderId::Microsoft => MicrosoftMapper.denormalize(event).map(ProviderWrite::Microsoft),
    };
    result.map_err(|err| err.with_provider(event.provider_id).with_event_id(&event.id))
}
