//! `calgrid normalize`: provider payloads to calendar events.

use std::io::Write;

use calgrid_core::{CalendarEvent, ProviderId};
use calgrid_providers::{MappingContext, ProviderEvent, normalize_events, try_normalize_events};
use tracing::{info, warn};

use super::{parse_many, write_json};
use crate::error::ClientResult;

/// Normalizes every payload in `input` and returns the events.
///
/// Payloads that do not parse are skipped with a warning unless `strict`
/// is set, matching how events that fail to normalize are handled.
pub fn normalize(
    provider: ProviderId,
    ctx: &MappingContext,
    strict: bool,
    input: &str,
) -> ClientResult<Vec<CalendarEvent>> {
    let values: Vec<serde_json::Value> = parse_many(input)?;
    let total = values.len();

    let mut payloads = Vec::with_capacity(total);
    for (index, value) in values.into_iter().enumerate() {
        match ProviderEvent::from_json(provider, value) {
            Ok(payload) => payloads.push(payload),
            Err(err) if strict => return Err(err.with_provider(provider).into()),
            Err(err) => warn!(%provider, index, error = %err, "skipping unparseable payload"),
        }
    }

    let events = if strict {
        try_normalize_events(ctx, &payloads)?
    } else {
        normalize_events(ctx, &payloads)
    };
    info!(%provider, total, normalized = events.len(), "normalize finished");
    Ok(events)
}

/// Runs the command, writing the events as a JSON array.
pub fn run<W: Write>(
    provider: ProviderId,
    ctx: &MappingContext,
    strict: bool,
    input: &str,
    out: &mut W,
) -> ClientResult<()> {
    let events = normalize(provider, ctx, strict, input)?;
    write_json(out, &events)
}
