//! Batch normalization of provider payloads.
//!
//! A sync returns a page of payloads from one calendar. [`normalize_events`]
//! turns the page into [`CalendarEvent`]s, dropping cancelled entries and
//! skipping any single event that fails to map, so one bad payload never
//! hides the rest of the calendar. [`try_normalize_events`] is the strict
//! form and stops at the first failure.

use calgrid_core::CalendarEvent;
use tracing::{debug, warn};

use crate::error::ProviderResult;
use crate::provider::{MappingContext, ProviderEvent};

/// Normalizes a page of payloads, keeping input order.
///
/// Cancelled payloads are dropped. Payloads that fail with a per-event
/// error are logged and skipped.
pub fn normalize_events(ctx: &MappingContext, payloads: &[ProviderEvent]) -> Vec<CalendarEvent> {
    let mut events = Vec::with_capacity(payloads.len());
    let mut skipped = 0usize;

    for payload in payloads {
        if payload.is_cancelled() {
            debug!(id = ?payload.id(), "dropping cancelled event");
            continue;
        }
        match payload.normalize(ctx) {
            Ok(event) => events.push(event),
            Err(err) => {
                skipped += 1;
                warn!(
                    provider = %payload.provider_id(),
                    id = ?payload.id(),
                    code = %err.code(),
                    error = %err,
                    "skipping event that failed to normalize"
                );
            }
        }
    }

    debug!(
        account = %ctx.account_id,
        calendar = %ctx.calendar_id,
        normalized = events.len(),
        skipped,
        "normalized events"
    );
    events
}

/// Normalizes a page of payloads, failing on the first error.
///
/// Cancelled payloads are still dropped.
pub fn try_normalize_events(
    ctx: &MappingContext,
    payloads: &[ProviderEvent],
) -> ProviderResult<Vec<CalendarEvent>> {
    payloads
        .iter()
        .filter(|p| !p.is_cancelled())
        .map(|p| p.normalize(ctx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use calgrid_core::ProviderId;
    use serde_json::json;

    fn ctx() -> MappingContext {
        MappingContext::new("acc", "cal")
    }

    fn google(value: serde_json::Value) -> ProviderEvent {
        ProviderEvent::from_json(ProviderId::Google, value).unwrap()
    }

    fn microsoft(value: serde_json::Value) -> ProviderEvent {
        ProviderEvent::from_json(ProviderId::Microsoft, value).unwrap()
    }

    fn page() -> Vec<ProviderEvent> {
        vec![
            google(json!({
                "id": "g1",
                "summary": "Standup",
                "start": {"dateTime": "2025-03-03T09:00:00Z"},
                "end": {"dateTime": "2025-03-03T09:15:00Z"}
            })),
            google(json!({"id": "g2", "status": "cancelled"})),
            google(json!({
                "id": "g3",
                "summary": "Broken",
                "start": {"date": "2025-03-03"},
                "end": {"dateTime": "2025-03-03T10:00:00Z"}
            })),
            microsoft(json!({
                "id": "m1",
                "subject": "Review",
                "start": {"dateTime": "2025-03-03T10:00:00", "timeZone": "UTC"},
                "end": {"dateTime": "2025-03-03T11:00:00", "timeZone": "UTC"}
            })),
            microsoft(json!({
                "id": "m2",
                "isCancelled": true,
                "start": {"dateTime": "2025-03-03T10:00:00", "timeZone": "UTC"},
                "end": {"dateTime": "2025-03-03T11:00:00", "timeZone": "UTC"}
            })),
        ]
    }

    mod lenient {
        use super::*;

        #[test]
        fn skips_cancelled_and_broken_events() {
            let events = normalize_events(&ctx(), &page());
            let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
            assert_eq!(ids, vec!["g1", "m1"]);
            assert_eq!(events[0].provider_id, ProviderId::Google);
            assert_eq!(events[1].provider_id, ProviderId::Microsoft);
        }

        #[test]
        fn empty_page() {
            assert!(normalize_events(&ctx(), &[]).is_empty());
        }
    }

    mod strict {
        use super::*;

        #[test]
        fn fails_on_first_error() {
            let err = try_normalize_events(&ctx(), &page()).unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::InvalidTime);
            assert_eq!(err.provider(), Some(ProviderId::Google));
            assert_eq!(err.event_id(), Some("g3"));
        }

        #[test]
        fn succeeds_without_broken_events() {
            let mut page = page();
            page.remove(2);
            let events = try_normalize_events(&ctx(), &page).unwrap();
            assert_eq!(events.len(), 2);
        }
    }

    mod tagged {
        use super::*;

        #[test]
        fn dispatches_on_provider_tag() {
            let payloads: Vec<ProviderEvent> = serde_json::from_value(json!([
                {
                    "providerId": "google",
                    "id": "g1",
                    "start": {"date": "2025-03-03"},
                    "end": {"date": "2025-03-04"}
                },
                {
                    "providerId": "microsoft",
                    "id": "m1",
                    "isAllDay": true,
                    "start": {"dateTime": "2025-03-03T00:00:00.0000000", "timeZone": "UTC"},
                    "end": {"dateTime": "2025-03-04T00:00:00.0000000", "timeZone": "UTC"}
                }
            ]))
            .unwrap();

            assert_eq!(payloads[0].provider_id(), ProviderId::Google);
            assert_eq!(payloads[1].provider_id(), ProviderId::Microsoft);

            let events = try_normalize_events(&ctx(), &payloads).unwrap();
            assert!(events.iter().all(|e| e.all_day));
            assert_eq!(events[0].start, events[1].start);
        }

        #[test]
        fn unknown_provider_tag_is_rejected() {
            let result: Result<ProviderEvent, _> =
                serde_json::from_value(json!({"providerId": "caldav", "id": "x"}));
            assert!(result.is_err());
        }
    }
}
