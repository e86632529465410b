//! Calendar display settings shared by layout and drag helpers.

use chrono::{Duration, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::drag::SNAP_STEP;
use crate::layout::visible_lanes_for_height;

/// Height of one event row in pixels.
pub const EVENT_HEIGHT_PX: u32 = 24;
/// Vertical gap between event rows in pixels.
pub const EVENT_GAP_PX: u32 = 4;
/// Height of a week-view cell in pixels.
pub const WEEK_CELL_HEIGHT_PX: u32 = 64;
/// Minimum number of lanes shown before overflow kicks in.
pub const MIN_VISIBLE_LANES: usize = 10;
/// Duration of a newly created timed event.
pub const DEFAULT_EVENT_DURATION_MINUTES: u32 = 60;

/// User-facing calendar settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// Zone used to place instants on the rendering timeline.
    pub default_time_zone: Tz,
    /// First column of a week view.
    pub week_starts_on: Weekday,
    pub event_height_px: u32,
    pub event_gap_px: u32,
    pub week_cell_height_px: u32,
    pub min_visible_lanes: usize,
    pub default_event_duration_minutes: u32,
    /// When false, week and month views hide Saturday and Sunday.
    pub show_weekends: bool,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            default_time_zone: Tz::UTC,
            week_starts_on: Weekday::Sun,
            event_height_px: EVENT_HEIGHT_PX,
            event_gap_px: EVENT_GAP_PX,
            week_cell_height_px: WEEK_CELL_HEIGHT_PX,
            min_visible_lanes: MIN_VISIBLE_LANES,
            default_event_duration_minutes: DEFAULT_EVENT_DURATION_MINUTES,
            show_weekends: true,
        }
    }
}

impl CalendarSettings {
    /// Default event duration rounded half-up to the 15-minute snap step.
    ///
    /// Never shorter than one step.
    pub fn snapped_default_duration(&self) -> Duration {
        let steps = self.default_event_duration_minutes.saturating_add(SNAP_STEP / 2) / SNAP_STEP;
        Duration::minutes(i64::from(steps.max(1)) * i64::from(SNAP_STEP))
    }

    /// Lanes that fit in a container of the given height, at least
    /// `min_visible_lanes`.
    pub fn visible_lanes(&self, container_px: u32) -> usize {
        visible_lanes_for_height(
            container_px,
            self.event_height_px,
            self.event_gap_px,
            self.min_visible_lanes,
        )
    }

    /// Lanes that fit in one week-view cell, without a minimum.
    pub fn week_cell_lanes(&self) -> usize {
        visible_lanes_for_height(
            self.week_cell_height_px,
            self.event_height_px,
            self.event_gap_px,
            0,
        )
    }
}
