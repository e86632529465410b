//! `calgrid snap`: pointer offset to a snapped time of day.

use std::io::Write;

use calgrid_core::drag::time_at;
use calgrid_core::{minutes_from_offset, round_down, round_half_expand, snap_minutes};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::write_json;
use crate::error::{ClientError, ClientResult};

/// Where an offset lands in a day column under each rounding rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapReport {
    /// Unsnapped minutes since midnight.
    pub minutes: f64,
    /// Quarter-hour threshold snap.
    pub snapped: u32,
    /// Floor to the snap step, as used for a drag start.
    pub round_down: u32,
    /// Nearest snap step, as used for a drag end.
    pub round_half_expand: u32,
    /// Snapped time as `HH:MM`; `24:00` is the end of the day.
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<NaiveDateTime>,
}

/// Snaps `offset` within a column of `height` pixels.
pub fn snap(offset: f64, height: f64, date: Option<NaiveDate>) -> ClientResult<SnapReport> {
    let minutes = minutes_from_offset(offset, height).ok_or_else(|| {
        ClientError::Input(format!(
            "cannot place offset {} in a column of height {}",
            offset, height
        ))
    })?;
    let snapped = snap_minutes(minutes);
    Ok(SnapReport {
        minutes,
        snapped,
        round_down: round_down(minutes),
        round_half_expand: round_half_expand(minutes),
        time: format!("{:02}:{:02}", snapped / 60, snapped % 60),
        date_time: date.and_then(|d| time_at(d, snapped)),
    })
}

pub fn run<W: Write>(offset: f64, height: f64, date: Option<NaiveDate>, out: &mut W) -> ClientResult<()> {
    write_json(out, &snap(offset, height, date)?)
}
