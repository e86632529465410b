//! `calgrid layout`: lane layouts for week rows, month cells and columns.

use std::io::Write;

use calgrid_core::{
    CalendarEvent, CalendarSettings, EventKey, LaneLayout, WeekWindow, day_cell_layout,
    timed_column_layout, week_row_layout,
};
use chrono::{NaiveDate, Weekday};
use chrono_tz::Tz;
use tracing::debug;

use super::{parse_many, write_json};
use crate::cli::LayoutView;
use crate::error::ClientResult;

/// What to lay out, with the file argument already read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutRequest {
    /// The week containing `date`.
    Week { date: NaiveDate, days: u32 },
    Day { date: NaiveDate },
    Columns { date: NaiveDate },
}

/// Display options shared by every view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub time_zone: Tz,
    pub visible_lanes: usize,
    pub week_starts_on: Weekday,
    pub show_weekends: bool,
}

impl LayoutOptions {
    /// Fills unset options from the settings. The lane budget defaults to
    /// what fits in one week-view cell, but never fewer than the configured
    /// minimum.
    pub fn resolve(settings: &CalendarSettings, tz: Option<Tz>, lanes: Option<usize>) -> Self {
        Self {
            time_zone: tz.unwrap_or(settings.default_time_zone),
            visible_lanes: lanes.unwrap_or_else(|| settings.visible_lanes(settings.week_cell_height_px)),
            week_starts_on: settings.week_starts_on,
            show_weekends: settings.show_weekends,
        }
    }

    /// Week window containing `date`, with the configured first weekday.
    pub fn week(&self, date: NaiveDate, days: u32) -> WeekWindow {
        WeekWindow::containing(date, self.week_starts_on, days).with_weekends(self.show_weekends)
    }

    fn hides(&self, day: NaiveDate) -> bool {
        !self.week(day, 7).is_visible(day)
    }
}

impl LayoutRequest {
    /// Splits a parsed view into the request and its shared arguments.
    pub fn from_view(view: &LayoutView) -> (Self, &crate::cli::LayoutArgs) {
        match view {
            LayoutView::Week { date, days, common } => (
                Self::Week {
                    date: *date,
                    days: *days,
                },
                common,
            ),
            LayoutView::Day { date, common } => (Self::Day { date: *date }, common),
            LayoutView::Columns { date, common } => (Self::Columns { date: *date }, common),
        }
    }
}

/// Computes the layout for the events in `input`.
pub fn layout(
    request: LayoutRequest,
    options: LayoutOptions,
    input: &str,
) -> ClientResult<LaneLayout<EventKey>> {
    let events: Vec<CalendarEvent> = parse_many(input)?;
    let tz = options.time_zone;
    debug!(?request, %tz, events = events.len(), "computing layout");

    let layout = match request {
        LayoutRequest::Week { date, days } => {
            week_row_layout(&events, &options.week(date, days), tz, options.visible_lanes)
        }
        LayoutRequest::Day { date } if options.hides(date) => {
            debug!(%date, "weekend cell hidden");
            LaneLayout::empty(options.visible_lanes)
        }
        LayoutRequest::Day { date } => day_cell_layout(&events, date, tz, options.visible_lanes),
        LayoutRequest::Columns { date } if options.hides(date) => {
            debug!(%date, "weekend column hidden");
            LaneLayout::empty(usize::MAX)
        }
        LayoutRequest::Columns { date } => timed_column_layout(&events, date, tz),
    };
    Ok(layout)
}

pub fn run<W: Write>(
    request: LayoutRequest,
    options: LayoutOptions,
    input: &str,
    out: &mut W,
) -> ClientResult<()> {
    write_json(out, &layout(request, options, input)?)
}
