//! Provider payload mapping for calgrid.
//!
//! This crate converts between provider event payloads and the
//! [`calgrid_core::CalendarEvent`] model:
//!
//! - [`EventMapper`] - the contract each provider implements
//! - [`ProviderEvent`] - payloads of either provider, tagged by `providerId`
//! - [`normalize_events`] - batch normalization that skips bad events
//! - [`ProviderError`] - error types for mapping failures
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐
//! │  Google JSON    │    │  Graph JSON      │
//! └────────┬────────┘    └────────┬─────────┘
//!          │                      │
//!          ▼                      ▼
//! ┌─────────────────┐    ┌──────────────────┐
//! │  GoogleMapper   │    │ MicrosoftMapper  │
//! └────────┬────────┘    └────────┬─────────┘
//!          │                      │
//!          │     EventMapper      │
//!          └──────────┬───────────┘
//!                     │
//!                     ▼ normalize / denormalize
//!              ┌───────────────┐
//!              │ CalendarEvent │
//!              └───────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use calgrid_core::ProviderId;
//! use calgrid_providers::{MappingContext, ProviderEvent, normalize_events};
//!
//! let payload = serde_json::json!({
//!     "id": "abc",
//!     "summary": "Standup",
//!     "start": {"dateTime": "2025-03-03T09:00:00Z"},
//!     "end": {"dateTime": "2025-03-03T09:15:00Z"}
//! });
//! let page = vec![ProviderEvent::from_json(ProviderId::Google, payload).unwrap()];
//! let events = normalize_events(&MappingContext::new("me", "primary"), &page);
//! assert_eq!(events[0].title, "Standup");
//! ```

pub mod error;
pub mod google;
pub mod microsoft;
pub mod normalize;
pub mod provider;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use google::GoogleMapper;
pub use microsoft::MicrosoftMapper;
pub use normalize::{normalize_events, try_normalize_events};
pub use provider::{EventMapper, MappingContext, ProviderEvent, ProviderWrite, denormalize_event};
