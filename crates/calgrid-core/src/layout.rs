//! Lane layout for overlapping events.
//!
//! Events are placed on the wall clock of an explicit display zone and
//! packed greedily into the lowest free lane. Lanes at or beyond the visible
//! budget are reported as overflow, counted per day, so a view can render
//! "+N more". Layouts are plain data and are recomputed from their input on
//! every call.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::event::{CalendarEvent, EventKey};

/// A half-open wall-clock interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Span {
    /// Creates a span, swapping the bounds if they are reversed.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// Span covering whole days `[first, first + days)`.
    ///
    /// Returns `None` when the last day is past the representable range.
    pub fn days(first: NaiveDate, days: u32) -> Option<Self> {
        let last = first.checked_add_days(Days::new(u64::from(days)))?;
        Some(Self::new(
            first.and_time(NaiveTime::MIN),
            last.and_time(NaiveTime::MIN),
        ))
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Day the span starts on.
    pub fn start_day(&self) -> NaiveDate {
        self.start.date()
    }

    /// Half-open overlap test; touching spans do not overlap.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Intersection with `window`, or `None` when they do not meet.
    ///
    /// A zero-length span inside the window is kept.
    pub fn clip(&self, window: &Span) -> Option<Span> {
        let start = self.start.max(window.start);
        let end = self.end.min(window.end);
        if start < end || (start == end && self.start == self.end && window.start <= start && start < window.end) {
            Some(Span { start, end })
        } else {
            None
        }
    }

    /// Widens the span to the resolution of `granularity`.
    ///
    /// Day granularity floors the start to midnight and ceils the end to the
    /// next midnight. A zero-length span still covers its start day. Returns
    /// `None` when that midnight falls after `NaiveDate::MAX`.
    pub fn widen(&self, granularity: Granularity) -> Option<Span> {
        match granularity {
            Granularity::Time => Some(*self),
            Granularity::Day => {
                let first = self.start.date();
                let mut last = self.end.date();
                if self.ends_inside_day() {
                    last = last.max(first).succ_opt()?;
                }
                Some(Span {
                    start: first.and_time(NaiveTime::MIN),
                    end: last.and_time(NaiveTime::MIN),
                })
            }
        }
    }

    /// Number of calendar days the span touches at day granularity.
    pub fn day_count(&self) -> i64 {
        let first = self.start.date();
        let last = self.end.date();
        if self.ends_inside_day() {
            (last.max(first) - first).num_days() + 1
        } else {
            (last - first).num_days()
        }
    }

    /// True when the end day itself is covered: the end is past midnight, or
    /// the span is empty at midnight.
    fn ends_inside_day(&self) -> bool {
        let last = self.end.date();
        last.and_time(NaiveTime::MIN) < self.end || last <= self.start.date()
    }
}

/// Resolution at which spans are packed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Whole days; used for all-day rows and month cells.
    #[default]
    Day,
    /// Exact wall-clock time; used for timed columns.
    Time,
}

/// An item to be packed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneItem<K> {
    pub key: K,
    pub span: Span,
}

impl<K> LaneItem<K> {
    pub fn new(key: K, span: Span) -> Self {
        Self { key, span }
    }
}

/// An item with its assigned lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement<K> {
    pub key: K,
    pub lane: usize,
    pub span: Span,
}

/// Result of packing a set of items into lanes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneLayout<K> {
    /// Items within the visible budget, in processing order.
    pub placements: Vec<Placement<K>>,
    /// Items beyond the visible budget, in processing order.
    pub overflow: Vec<Placement<K>>,
    /// Lanes used, including overflow lanes.
    pub lane_count: usize,
    /// Visible lane budget the layout was computed with.
    pub visible_lane_limit: usize,
    /// Overflow count keyed by the start day of each overflowed span.
    pub overflow_by_day: BTreeMap<NaiveDate, usize>,
}

impl<K> Default for LaneLayout<K> {
    fn default() -> Self {
        Self {
            placements: Vec::new(),
            overflow: Vec::new(),
            lane_count: 0,
            visible_lane_limit: 0,
            overflow_by_day: BTreeMap::new(),
        }
    }
}

impl<K> LaneLayout<K> {
    /// A layout with nothing placed.
    pub fn empty(visible_lanes: usize) -> Self {
        Self {
            visible_lane_limit: visible_lanes,
            ..Self::default()
        }
    }
}

impl<K: PartialEq + Clone> LaneLayout<K> {
    /// Lane assigned to `key`, visible or not.
    pub fn lane_of(&self, key: &K) -> Option<usize> {
        self.placements
            .iter()
            .chain(self.overflow.iter())
            .find(|p| &p.key == key)
            .map(|p| p.lane)
    }

    /// Returns true if `key` was pushed into overflow.
    pub fn is_overflow(&self, key: &K) -> bool {
        self.overflow.iter().any(|p| &p.key == key)
    }

    /// Visible items grouped by lane, top lane first.
    pub fn visible_lanes(&self) -> Vec<Vec<K>> {
        let rows = self.lane_count.min(self.visible_lane_limit);
        let mut lanes = vec![Vec::new(); rows];
        for p in &self.placements {
            if let Some(lane) = lanes.get_mut(p.lane) {
                lane.push(p.key.clone());
            }
        }
        lanes
    }

    /// Number of overflowed items starting on `day`.
    pub fn overflow_on(&self, day: NaiveDate) -> usize {
        self.overflow_by_day.get(&day).copied().unwrap_or(0)
    }

    /// Rows a view should reserve: the visible lanes in use, but at
    /// least `min`.
    pub fn reserved_lanes(&self, min: usize) -> usize {
        self.lane_count.min(self.visible_lane_limit).max(min)
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty() && self.overflow.is_empty()
    }
}

/// Packs items into the lowest free lane.
///
/// Items are processed by start ascending, then duration descending, then
/// key ascending. Each takes the first lane whose last end is at or before
/// its start. Items landing on lane `visible_lanes` or higher are overflow.
pub fn pack_lanes<K: Ord + Clone>(mut items: Vec<LaneItem<K>>, visible_lanes: usize) -> LaneLayout<K> {
    items.sort_by(|a, b| {
        a.span
            .start
            .cmp(&b.span.start)
            .then_with(|| b.span.duration().cmp(&a.span.duration()))
            .then_with(|| a.key.cmp(&b.key))
    });

    let mut lane_ends: Vec<NaiveDateTime> = Vec::new();
    let mut layout = LaneLayout::empty(visible_lanes);

    for item in items {
        let lane = match lane_ends.iter().position(|end| *end <= item.span.start) {
            Some(lane) => {
                lane_ends[lane] = item.span.end;
                lane
            }
            None => {
                lane_ends.push(item.span.end);
                lane_ends.len() - 1
            }
        };

        let placement = Placement {
            key: item.key,
            lane,
            span: item.span,
        };
        if lane >= visible_lanes {
            *layout
                .overflow_by_day
                .entry(placement.span.start_day())
                .or_insert(0) += 1;
            layout.overflow.push(placement);
        } else {
            layout.placements.push(placement);
        }
    }

    layout.lane_count = lane_ends.len();
    debug!(
        placed = layout.placements.len(),
        overflow = layout.overflow.len(),
        lanes = layout.lane_count,
        "packed lanes"
    );
    layout
}

/// Wall-clock span of an event in the display zone.
pub fn span_of(event: &CalendarEvent, tz: Tz) -> Span {
    Span::new(event.start.local_in(tz), event.end.local_in(tz))
}

/// Returns true for events a week view renders in the all-day row.
pub fn is_all_day_row_event(event: &CalendarEvent, tz: Tz) -> bool {
    event.all_day || span_of(event, tz).day_count() > 1
}

pub fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

/// Most recent `first` weekday on or before `day`.
///
/// Clamps to `NaiveDate::MIN` at the start of the calendar.
pub fn week_start_of(day: NaiveDate, first: Weekday) -> NaiveDate {
    let back = (7 + day.weekday().num_days_from_monday() - first.num_days_from_monday()) % 7;
    day.checked_sub_days(Days::new(u64::from(back)))
        .unwrap_or(NaiveDate::MIN)
}

/// The run of days shown by a week view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub days: u32,
    /// When false, Saturday and Sunday columns are hidden.
    pub show_weekends: bool,
}

impl WeekWindow {
    pub fn new(start: NaiveDate, days: u32) -> Self {
        Self {
            start,
            days,
            show_weekends: true,
        }
    }

    /// The window of `days` days starting on the `first` weekday of the
    /// week that contains `day`.
    pub fn containing(day: NaiveDate, first: Weekday, days: u32) -> Self {
        Self::new(week_start_of(day, first), days)
    }

    pub fn with_weekends(mut self, show_weekends: bool) -> Self {
        self.show_weekends = show_weekends;
        self
    }

    /// Wall-clock span of the window, if representable.
    pub fn span(&self) -> Option<Span> {
        Span::days(self.start, self.days)
    }

    /// Returns true if `day` has a column in this window.
    pub fn is_visible(&self, day: NaiveDate) -> bool {
        let in_range = self
            .span()
            .is_some_and(|w| w.start.date() <= day && day.and_time(NaiveTime::MIN) < w.end);
        in_range && (self.show_weekends || !is_weekend(day.weekday()))
    }

    /// Returns true if `span` touches at least one visible column.
    fn shows(&self, span: &Span) -> bool {
        if self.show_weekends {
            return true;
        }
        // Any three consecutive days include a weekday.
        span.start
            .date()
            .iter_days()
            .take_while(|d| d.and_time(NaiveTime::MIN) < span.end)
            .take(3)
            .any(|d| !is_weekend(d.weekday()))
    }
}

/// Layout of the all-day row of a week (or any run of `days` days).
///
/// Takes all-day and multi-day events that meet the window, clips them to
/// it and packs them at day granularity.
pub fn week_all_day_layout(
    events: &[CalendarEvent],
    week_start: NaiveDate,
    days: u32,
    tz: Tz,
    visible_lanes: usize,
) -> LaneLayout<EventKey> {
    week_row_layout(events, &WeekWindow::new(week_start, days), tz, visible_lanes)
}

/// Layout of the all-day row of `window`.
///
/// Same as [`week_all_day_layout`], but when the window hides weekends,
/// events that fall only on Saturday or Sunday are left out.
pub fn week_row_layout(
    events: &[CalendarEvent],
    window: &WeekWindow,
    tz: Tz,
    visible_lanes: usize,
) -> LaneLayout<EventKey> {
    let Some(span) = window.span() else {
        debug!(start = %window.start, days = window.days, "week window out of range");
        return LaneLayout::empty(visible_lanes);
    };
    let items = events
        .iter()
        .filter(|e| is_all_day_row_event(e, tz))
        .filter_map(|e| {
            let widened = span_of(e, tz).widen(Granularity::Day)?;
            widened
                .clip(&span)
                .filter(|clipped| window.shows(clipped))
                .map(|clipped| LaneItem::new(e.key(), clipped))
        })
        .collect();

    debug!(
        start = %window.start,
        days = window.days,
        show_weekends = window.show_weekends,
        "week all-day layout"
    );
    pack_lanes(items, visible_lanes)
}

/// Layout of a single month-view cell.
///
/// Takes every event that occurs on `day` and packs it at day granularity;
/// the overflow count for `day` drives the "+N more" label.
pub fn day_cell_layout(
    events: &[CalendarEvent],
    day: NaiveDate,
    tz: Tz,
    visible_lanes: usize,
) -> LaneLayout<EventKey> {
    let Some(window) = Span::days(day, 1) else {
        debug!(%day, "day cell out of range");
        return LaneLayout::empty(visible_lanes);
    };
    let items = events
        .iter()
        .filter_map(|e| {
            let span = span_of(e, tz).widen(Granularity::Day)?;
            span.clip(&window).map(|clipped| LaneItem::new(e.key(), clipped))
        })
        .collect();

    debug!(%day, "day cell layout");
    pack_lanes(items, visible_lanes)
}

/// Layout of a timed column for one day.
///
/// Takes timed events that do not cross into another day, clips them to
/// `day` and packs them at exact time. Nothing overflows; `lane_count` is
/// the column divisor.
pub fn timed_column_layout(events: &[CalendarEvent], day: NaiveDate, tz: Tz) -> LaneLayout<EventKey> {
    let Some(window) = Span::days(day, 1) else {
        debug!(%day, "timed column out of range");
        return LaneLayout::empty(usize::MAX);
    };
    let items = events
        .iter()
        .filter(|e| !is_all_day_row_event(e, tz))
        .filter_map(|e| {
            span_of(e, tz)
                .clip(&window)
                .map(|clipped| LaneItem::new(e.key(), clipped))
        })
        .collect();

    debug!(%day, "timed column layout");
    pack_lanes(items, usize::MAX)
}

/// Number of lanes that fit in `container_px`, at least `min_lanes`.
///
/// Each lane takes `event_px` plus `gap_px`; the last lane needs no gap.
pub fn visible_lanes_for_height(container_px: u32, event_px: u32, gap_px: u32, min_lanes: usize) -> usize {
    let row = event_px.saturating_add(gap_px);
    if row == 0 {
        return min_lanes;
    }
    let fit = container_px.saturating_add(gap_px) / row;
    (fit as usize).max(min_lanes)
}
