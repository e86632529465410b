//! `calgrid denormalize`: calendar events to provider write payloads.

use std::io::Write;

use calgrid_core::CalendarEvent;
use calgrid_providers::{ProviderWrite, denormalize_event};

use super::{parse_many, write_json};
use crate::error::ClientResult;

/// Converts every event in `input` with the mapper for its provider.
pub fn denormalize(input: &str) -> ClientResult<Vec<ProviderWrite>> {
    let events: Vec<CalendarEvent> = parse_many(input)?;
    events
        .iter()
        .map(|event| denormalize_event(event).map_err(Into::into))
        .collect()
}

pub fn run<W: Write>(input: &str, out: &mut W) -> ClientResult<()> {
    write_json(out, &denormalize(input)?)
}
