//! Drag snapping and the drag-to-create controller.
//!
//! A day column maps its height linearly onto 1440 minutes. Pointer offsets
//! are converted to minutes and snapped to 15-minute steps. The controller
//! keeps all per-drag state in an explicit [`DragPhase`]; callers feed it
//! pointer events and get back a [`DragAction`] to apply.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::event::{CalendarEvent, DraftEvent, SelectedEvent};
use crate::time::{EventTime, TimeError, TimeResult, ZonedDateTime};

/// Minutes in a day column.
pub const MINUTES_PER_DAY: u32 = 1440;
/// Snap step in minutes.
pub const SNAP_STEP: u32 = 15;

/// Converts a pointer offset within a column into minutes since midnight.
///
/// Returns `None` when the column height is not positive or either value is
/// not finite. The result is clamped to `[0, 1440]`.
pub fn minutes_from_offset(offset: f64, column_height: f64) -> Option<f64> {
    if !offset.is_finite() || !column_height.is_finite() || column_height <= 0.0 {
        return None;
    }
    let minutes = offset / column_height * f64::from(MINUTES_PER_DAY);
    Some(minutes.clamp(0.0, f64::from(MINUTES_PER_DAY)))
}

/// Converts minutes back into an offset within a column.
pub fn offset_from_minutes(minutes: f64, column_height: f64) -> f64 {
    minutes / f64::from(MINUTES_PER_DAY) * column_height
}

/// Snaps minutes to the nearest quarter hour by fractional-hour threshold.
///
/// Below .125 of the hour snaps to :00, below .375 to :15, below .625 to
/// :30, below .875 to :45, and anything later to the next hour.
pub fn snap_minutes(minutes: f64) -> u32 {
    let minutes = clamp_minutes(minutes);
    let hours = (minutes / 60.0).floor();
    let fraction = (minutes - hours * 60.0) / 60.0;
    let quarter = if fraction < 0.125 {
        0
    } else if fraction < 0.375 {
        15
    } else if fraction < 0.625 {
        30
    } else if fraction < 0.875 {
        45
    } else {
        60
    };
    (hours as u32 * 60 + quarter).min(MINUTES_PER_DAY)
}

/// Snaps a fractional hour position (e.g. `9.6`) to minutes since midnight.
pub fn snap_hour_position(hours: f64) -> u32 {
    snap_minutes(hours * 60.0)
}

/// Floors minutes to the snap step.
pub fn round_down(minutes: f64) -> u32 {
    let step = f64::from(SNAP_STEP);
    ((clamp_minutes(minutes) / step).floor() * step) as u32
}

/// Rounds minutes to the nearest snap step, halves away from zero.
pub fn round_half_expand(minutes: f64) -> u32 {
    let step = f64::from(SNAP_STEP);
    let rounded = ((clamp_minutes(minutes) / step).round() * step) as u32;
    rounded.min(MINUTES_PER_DAY)
}

/// Wall-clock time `minutes` after midnight of `date`.
///
/// 1440 lands on midnight of the following day.
pub fn time_at(date: NaiveDate, minutes: u32) -> Option<NaiveDateTime> {
    date.and_time(NaiveTime::MIN)
        .checked_add_signed(Duration::minutes(i64::from(minutes)))
}

fn clamp_minutes(minutes: f64) -> f64 {
    if minutes.is_nan() {
        return 0.0;
    }
    minutes.clamp(0.0, f64::from(MINUTES_PER_DAY))
}

/// The column a drag happens in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragColumn {
    pub date: NaiveDate,
    pub time_zone: Tz,
    /// Rendered height in pixels.
    pub height: f64,
}

impl DragColumn {
    pub fn new(date: NaiveDate, time_zone: Tz, height: f64) -> Self {
        Self {
            date,
            time_zone,
            height,
        }
    }

    fn minutes(&self, offset: Option<f64>) -> Option<f64> {
        offset.and_then(|o| minutes_from_offset(o, self.height))
    }
}

/// Rectangle of the drag preview, in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragPreview {
    pub start_minutes: f64,
    pub duration_minutes: f64,
}

impl DragPreview {
    /// Top offset and height in pixels for a column of `column_height`.
    pub fn to_offsets(&self, column_height: f64) -> (f64, f64) {
        (
            offset_from_minutes(self.start_minutes, column_height),
            offset_from_minutes(self.duration_minutes, column_height),
        )
    }
}

/// Where the controller is in a drag.
#[derive(Debug, Clone, PartialEq)]
pub enum DragPhase {
    Idle,
    /// Pointer is down; both values are minutes since midnight.
    Dragging { initial: f64, current: f64 },
    /// Escape was pressed; the next pointer-up is swallowed.
    Cancelled,
    /// A draft was created and its preview stays until it is saved or
    /// dismissed.
    Previewing { draft_id: String, preview: DragPreview },
}

/// What the caller should do after a controller step.
#[derive(Debug, Clone, PartialEq)]
pub enum DragAction {
    None,
    CreateDraft(DraftEvent),
    Unselect,
}

/// Drag-to-create controller for one day column.
#[derive(Debug, Clone)]
pub struct DragToCreate {
    column: DragColumn,
    phase: DragPhase,
}

impl DragToCreate {
    pub fn new(column: DragColumn) -> Self {
        Self {
            column,
            phase: DragPhase::Idle,
        }
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn column(&self) -> &DragColumn {
        &self.column
    }

    /// Updates the column geometry, e.g. after a resize.
    pub fn set_column(&mut self, column: DragColumn) {
        self.column = column;
    }

    /// Current preview rectangle, if any.
    pub fn preview(&self) -> Option<DragPreview> {
        match &self.phase {
            DragPhase::Dragging { initial, current } => Some(preview_between(*initial, *current)),
            DragPhase::Previewing { preview, .. } => Some(*preview),
            _ => None,
        }
    }

    /// Pointer down.
    pub fn start(&mut self, offset: Option<f64>, escape_held: bool) -> Option<DragPreview> {
        if escape_held {
            debug!("drag start with escape held, cancelling");
            self.phase = DragPhase::Cancelled;
            return None;
        }
        let Some(minutes) = self.column.minutes(offset) else {
            debug!("drag start without pointer data");
            self.phase = DragPhase::Idle;
            return None;
        };
        self.phase = DragPhase::Dragging {
            initial: minutes,
            current: minutes,
        };
        self.preview()
    }

    /// Pointer move. Ignored unless a drag is active.
    pub fn drag_to(&mut self, offset: Option<f64>) -> Option<DragPreview> {
        let minutes = self.column.minutes(offset)?;
        match &mut self.phase {
            DragPhase::Dragging { current, .. } => {
                *current = minutes;
            }
            _ => return None,
        }
        self.preview()
    }

    /// Pointer up.
    pub fn end(&mut self, offset: Option<f64>) -> DragAction {
        let phase = std::mem::replace(&mut self.phase, DragPhase::Idle);
        let initial = match phase {
            DragPhase::Dragging { initial, .. } => initial,
            DragPhase::Cancelled => {
                debug!("drag end after cancel");
                return DragAction::None;
            }
            other => {
                self.phase = other;
                return DragAction::None;
            }
        };

        let Some(current) = self.column.minutes(offset) else {
            debug!("drag end without pointer data");
            return DragAction::None;
        };

        let start_minutes = round_down(initial.min(current));
        let end_minutes = round_half_expand(initial.max(current));
        if end_minutes <= start_minutes {
            debug!(start_minutes, end_minutes, "drag collapsed to zero length");
            return DragAction::None;
        }

        let draft = match self.draft_between(start_minutes, end_minutes) {
            Some(draft) => draft,
            None => {
                debug!(start_minutes, end_minutes, "drag outside representable dates");
                return DragAction::None;
            }
        };

        debug!(draft_id = %draft.id, start_minutes, end_minutes, "drag created draft");
        self.phase = DragPhase::Previewing {
            draft_id: draft.id.clone(),
            preview: DragPreview {
                start_minutes: f64::from(start_minutes),
                duration_minutes: f64::from(end_minutes - start_minutes),
            },
        };
        DragAction::CreateDraft(draft)
    }

    /// Escape key.
    pub fn escape(&mut self) -> DragAction {
        match self.phase {
            DragPhase::Dragging { .. } => {
                debug!("drag cancelled");
                self.phase = DragPhase::Cancelled;
                DragAction::None
            }
            DragPhase::Previewing { .. } => {
                self.phase = DragPhase::Idle;
                DragAction::Unselect
            }
            _ => DragAction::None,
        }
    }

    /// Reacts to a selection change.
    ///
    /// Returns true when a saved event with the draft's id shows up, which
    /// ends the preview.
    pub fn observe_selection(&mut self, selected: Option<&SelectedEvent>) -> bool {
        let DragPhase::Previewing { draft_id, .. } = &self.phase else {
            return false;
        };
        let saved = matches!(selected, Some(SelectedEvent::Saved(event)) if &event.id == draft_id);
        if saved {
            self.phase = DragPhase::Idle;
        }
        saved
    }

    /// Drops all drag state.
    pub fn reset(&mut self) {
        self.phase = DragPhase::Idle;
    }

    fn draft_between(&self, start_minutes: u32, end_minutes: u32) -> Option<DraftEvent> {
        let tz = self.column.time_zone;
        let start = time_at(self.column.date, start_minutes)?;
        let end = time_at(self.column.date, end_minutes)?;
        Some(DraftEvent::new(
            EventTime::Zoned(ZonedDateTime::from_local(start, tz)),
            EventTime::Zoned(ZonedDateTime::from_local(end, tz)),
        ))
    }
}

fn preview_between(initial: f64, current: f64) -> DragPreview {
    let snapped_initial = f64::from(round_down(initial));
    DragPreview {
        start_minutes: snapped_initial.min(current),
        duration_minutes: (current - snapped_initial).abs(),
    }
}

/// Moves an event to `target_date`, optionally at a time of day.
///
/// `hour_position` is a fractional hour from a timed column (e.g. `9.6`);
/// it is snapped to a quarter hour on the display zone's wall clock. With
/// no position the event keeps its wall-clock start time. Timed events keep
/// their own zone and duration. All-day events can only move by whole days.
///
/// Returns `Ok(None)` when the start does not change.
pub fn move_event(
    event: &CalendarEvent,
    target_date: NaiveDate,
    hour_position: Option<f64>,
    display_tz: Tz,
) -> TimeResult<Option<CalendarEvent>> {
    match (&event.start, &event.end) {
        (EventTime::Date(start), EventTime::Date(end)) => {
            if hour_position.is_some() {
                return Err(TimeError::PlainDateMove);
            }
            let delta = target_date.signed_duration_since(*start);
            if delta.is_zero() {
                return Ok(None);
            }
            let shift = |d: &NaiveDate| {
                d.checked_add_signed(delta)
                    .map(EventTime::Date)
                    .ok_or(TimeError::OutOfRange)
            };
            let mut moved = event.clone();
            moved.start = shift(start)?;
            moved.end = shift(end)?;
            Ok(Some(moved))
        }
        (EventTime::Date(_), _) | (_, EventTime::Date(_)) => Err(TimeError::MixedBoundaries {
            start: event.start.kind(),
            end: event.end.kind(),
        }),
        (start, end) => {
            let (Some(old_start), Some(old_end)) = (start.to_instant(), end.to_instant()) else {
                return Err(TimeError::OutOfRange);
            };
            let duration = old_end - old_start;

            let local = match hour_position {
                Some(hours) => time_at(target_date, snap_hour_position(hours)),
                None => Some(target_date.and_time(start.local_in(display_tz).time())),
            }
            .ok_or(TimeError::OutOfRange)?;
            let new_start = ZonedDateTime::from_local(local, display_tz).instant;

            if new_start == old_start {
                return Ok(None);
            }
            let new_end = new_start
                .checked_add_signed(duration)
                .ok_or(TimeError::OutOfRange)?;

            let mut moved = event.clone();
            moved.start = retarget(start, new_start);
            moved.end = retarget(end, new_end);
            debug!(id = %event.id, from = %event.start, to = %moved.start, "moved event");
            Ok(Some(moved))
        }
    }
}

fn retarget(original: &EventTime, instant: chrono::DateTime<chrono::Utc>) -> EventTime {
    match original {
        EventTime::Zoned(z) => EventTime::Zoned(ZonedDateTime::new(instant, z.time_zone)),
        _ => EventTime::Instant(instant),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKey, ProviderId};
    use chrono::{TimeZone, Utc};
    use chrono_tz::America::{Los_Angeles, New_York};
    use chrono_tz::Europe::Paris;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    /// A 1440px column, so one pixel is one minute.
    fn column() -> DragColumn {
        DragColumn::new(date(2025, 6, 2), New_York, 1440.0)
    }

    mod snapping {
        use super::*;

        #[test]
        fn offset_to_minutes() {
            assert_eq!(minutes_from_offset(300.0, 600.0), Some(720.0));
            assert_eq!(minutes_from_offset(-10.0, 600.0), Some(0.0));
            assert_eq!(minutes_from_offset(900.0, 600.0), Some(1440.0));
            assert_eq!(minutes_from_offset(10.0, 0.0), None);
            assert_eq!(minutes_from_offset(f64::NAN, 600.0), None);
            assert_eq!(minutes_from_offset(10.0, f64::INFINITY), None);
        }

        #[test]
        fn thresholds() {
            assert_eq!(snap_minutes(10.0 * 60.0 + 37.0), 10 * 60 + 30);
            assert_eq!(snap_minutes(10.0 * 60.0 + 53.0), 11 * 60);
            assert_eq!(snap_minutes(10.0 * 60.0 + 7.0), 10 * 60);
            assert_eq!(snap_minutes(10.0 * 60.0 + 7.5), 10 * 60 + 15);
            assert_eq!(snap_minutes(10.0 * 60.0 + 22.0), 10 * 60 + 15);
            assert_eq!(snap_minutes(10.0 * 60.0 + 44.0), 10 * 60 + 45);
            assert_eq!(snap_minutes(23.0 * 60.0 + 59.0), 1440);
            assert_eq!(snap_minutes(-5.0), 0);
        }

        #[test]
        fn offsets_snap_through_thresholds() {
            let m = minutes_from_offset(637.0, 1440.0).unwrap();
            assert_eq!(snap_minutes(m), 630);
            let m = minutes_from_offset(653.0, 1440.0).unwrap();
            assert_eq!(snap_minutes(m), 660);
        }

        #[test]
        fn hour_positions() {
            assert_eq!(snap_hour_position(9.6), 9 * 60 + 30);
            assert_eq!(snap_hour_position(9.9), 10 * 60);
            assert_eq!(snap_hour_position(0.0), 0);
        }

        #[test]
        fn rounding_modes() {
            assert_eq!(round_down(14.9), 0);
            assert_eq!(round_down(15.0), 15);
            assert_eq!(round_down(1440.0), 1440);
            assert_eq!(round_half_expand(7.4), 0);
            assert_eq!(round_half_expand(7.5), 15);
            assert_eq!(round_half_expand(1439.0), 1440);
            assert_eq!(round_half_expand(2000.0), 1440);
            assert_eq!(round_down(-3.0), 0);
        }

        #[test]
        fn end_of_day_rolls_over() {
            assert_eq!(
                time_at(date(2025, 6, 2), 1440),
                date(2025, 6, 3).and_hms_opt(0, 0, 0)
            );
        }
    }

    mod create {
        use super::*;

        #[test]
        fn drag_down_creates_draft() {
            let mut drag = DragToCreate::new(column());
            let preview = drag.start(Some(544.0), false).unwrap();
            assert_eq!(preview.start_minutes, 540.0);
            assert_eq!(preview.duration_minutes, 4.0);

            let preview = drag.drag_to(Some(600.0)).unwrap();
            assert_eq!(preview.start_minutes, 540.0);
            assert_eq!(preview.duration_minutes, 60.0);

            let DragAction::CreateDraft(draft) = drag.end(Some(652.0)) else {
                panic!("expected a draft");
            };
            // 09:04 floors to 09:00, 10:52 rounds to 10:45.
            assert!(!draft.all_day);
            assert_eq!(
                draft.start,
                EventTime::Zoned(ZonedDateTime::new(utc(2025, 6, 2, 13, 0), New_York))
            );
            assert_eq!(
                draft.end,
                EventTime::Zoned(ZonedDateTime::new(utc(2025, 6, 2, 14, 45), New_York))
            );
            assert!(matches!(
                drag.phase(),
                DragPhase::Previewing { draft_id, .. } if *draft_id == draft.id
            ));
        }

        #[test]
        fn drag_up_uses_raw_pointer_for_top() {
            let mut drag = DragToCreate::new(column());
            drag.start(Some(600.0), false);
            let preview = drag.drag_to(Some(550.0)).unwrap();
            assert_eq!(preview.start_minutes, 550.0);
            assert_eq!(preview.duration_minutes, 50.0);

            let DragAction::CreateDraft(draft) = drag.end(Some(550.0)) else {
                panic!("expected a draft");
            };
            assert_eq!(
                draft.start,
                EventTime::Zoned(ZonedDateTime::new(utc(2025, 6, 2, 13, 0), New_York))
            );
            assert_eq!(
                draft.end,
                EventTime::Zoned(ZonedDateTime::new(utc(2025, 6, 2, 14, 0), New_York))
            );
        }

        #[test]
        fn drag_to_bottom_ends_at_next_midnight() {
            let mut drag = DragToCreate::new(column());
            drag.start(Some(1380.0), false);
            let DragAction::CreateDraft(draft) = drag.end(Some(5000.0)) else {
                panic!("expected a draft");
            };
            assert_eq!(
                draft.end,
                EventTime::Zoned(ZonedDateTime::new(utc(2025, 6, 3, 4, 0), New_York))
            );
        }

        #[test]
        fn escape_during_drag_emits_nothing() {
            let mut drag = DragToCreate::new(column());
            drag.start(Some(540.0), false);
            drag.drag_to(Some(700.0));
            assert_eq!(drag.escape(), DragAction::None);
            assert_eq!(drag.phase(), &DragPhase::Cancelled);
            assert_eq!(drag.drag_to(Some(800.0)), None);
            assert_eq!(drag.preview(), None);
            assert_eq!(drag.end(Some(800.0)), DragAction::None);
            assert_eq!(drag.phase(), &DragPhase::Idle);
        }

        #[test]
        fn escape_held_at_start_cancels() {
            let mut drag = DragToCreate::new(column());
            assert_eq!(drag.start(Some(540.0), true), None);
            assert_eq!(drag.phase(), &DragPhase::Cancelled);
            assert_eq!(drag.end(Some(700.0)), DragAction::None);
            assert_eq!(drag.phase(), &DragPhase::Idle);
        }

        #[test]
        fn missing_pointer_data_resets() {
            let mut drag = DragToCreate::new(DragColumn::new(date(2025, 6, 2), New_York, 0.0));
            assert_eq!(drag.start(Some(540.0), false), None);
            assert_eq!(drag.phase(), &DragPhase::Idle);

            let mut drag = DragToCreate::new(column());
            drag.start(Some(540.0), false);
            assert_eq!(drag.end(None), DragAction::None);
            assert_eq!(drag.phase(), &DragPhase::Idle);
        }

        #[test]
        fn zero_length_drag_is_dropped() {
            let mut drag = DragToCreate::new(column());
            drag.start(Some(541.0), false);
            assert_eq!(drag.end(Some(545.0)), DragAction::None);
            assert_eq!(drag.phase(), &DragPhase::Idle);
        }

        #[test]
        fn escape_while_previewing_unselects() {
            let mut drag = DragToCreate::new(column());
            drag.start(Some(540.0), false);
            drag.end(Some(600.0));
            assert!(drag.preview().is_some());
            assert_eq!(drag.escape(), DragAction::Unselect);
            assert_eq!(drag.phase(), &DragPhase::Idle);
            assert_eq!(drag.preview(), None);
        }

        #[test]
        fn saving_the_draft_ends_preview() {
            let mut drag = DragToCreate::new(column());
            drag.start(Some(540.0), false);
            let DragAction::CreateDraft(draft) = drag.end(Some(600.0)) else {
                panic!("expected a draft");
            };

            let still_draft = SelectedEvent::Draft(draft.clone());
            assert!(!drag.observe_selection(Some(&still_draft)));
            assert!(!drag.observe_selection(None));

            let mut saved = draft
                .clone()
                .promote(ProviderId::Google, EventKey::new("a", "c", "other"));
            assert!(!drag.observe_selection(Some(&SelectedEvent::Saved(saved.clone()))));

            saved.id = draft.id.clone();
            assert!(drag.observe_selection(Some(&SelectedEvent::Saved(saved))));
            assert_eq!(drag.phase(), &DragPhase::Idle);
        }

        #[test]
        fn reset_clears_everything() {
            let mut drag = DragToCreate::new(column());
            drag.start(Some(540.0), false);
            drag.reset();
            assert_eq!(drag.phase(), &DragPhase::Idle);
            assert_eq!(drag.end(Some(600.0)), DragAction::None);
        }

        #[test]
        fn preview_offsets_scale_with_height() {
            let p = DragPreview {
                start_minutes: 720.0,
                duration_minutes: 60.0,
            };
            assert_eq!(p.to_offsets(720.0), (360.0, 30.0));
        }
    }

    mod moving {
        use super::*;

        fn event(start: EventTime, end: EventTime) -> CalendarEvent {
            CalendarEvent::new(
                ProviderId::Google,
                EventKey::new("a", "c", "e"),
                "Event",
                start,
                end,
            )
        }

        #[test]
        fn zoned_event_keeps_own_zone() {
            // 09:00 in Paris, displayed in New York.
            let e = event(
                EventTime::from_zoned(utc(2025, 6, 2, 7, 0), Paris),
                EventTime::from_zoned(utc(2025, 6, 2, 8, 30), Paris),
            );
            let moved = move_event(&e, date(2025, 6, 4), Some(10.6), New_York)
                .unwrap()
                .unwrap();
            // 10:30 New York is 14:30Z.
            assert_eq!(moved.start, EventTime::from_zoned(utc(2025, 6, 4, 14, 30), Paris));
            assert_eq!(moved.end, EventTime::from_zoned(utc(2025, 6, 4, 16, 0), Paris));
        }

        #[test]
        fn instant_stays_instant() {
            let e = event(
                EventTime::Instant(utc(2025, 6, 2, 16, 0)),
                EventTime::Instant(utc(2025, 6, 2, 16, 45)),
            );
            let moved = move_event(&e, date(2025, 6, 2), Some(8.0), Los_Angeles)
                .unwrap()
                .unwrap();
            assert_eq!(moved.start, EventTime::Instant(utc(2025, 6, 2, 15, 0)));
            assert_eq!(moved.end, EventTime::Instant(utc(2025, 6, 2, 15, 45)));
        }

        #[test]
        fn month_view_keeps_wall_time() {
            let e = event(
                EventTime::from_zoned(utc(2025, 6, 2, 13, 15), New_York),
                EventTime::from_zoned(utc(2025, 6, 2, 14, 15), New_York),
            );
            let moved = move_event(&e, date(2025, 6, 10), None, New_York)
                .unwrap()
                .unwrap();
            assert_eq!(
                moved.start,
                EventTime::from_zoned(utc(2025, 6, 10, 13, 15), New_York)
            );
        }

        #[test]
        fn unchanged_start_is_none() {
            let e = event(
                EventTime::from_zoned(utc(2025, 6, 2, 13, 0), New_York),
                EventTime::from_zoned(utc(2025, 6, 2, 14, 0), New_York),
            );
            assert_eq!(move_event(&e, date(2025, 6, 2), Some(9.0), New_York), Ok(None));
            assert_eq!(move_event(&e, date(2025, 6, 2), None, New_York), Ok(None));
        }

        #[test]
        fn all_day_shifts_by_days() {
            let e = event(
                EventTime::Date(date(2025, 6, 2)),
                EventTime::Date(date(2025, 6, 5)),
            );
            let moved = move_event(&e, date(2025, 6, 9), None, New_York)
                .unwrap()
                .unwrap();
            assert_eq!(moved.start, EventTime::Date(date(2025, 6, 9)));
            assert_eq!(moved.end, EventTime::Date(date(2025, 6, 12)));
            assert_eq!(move_event(&e, date(2025, 6, 2), None, New_York), Ok(None));
        }

        #[test]
        fn all_day_onto_time_slot_fails() {
            let e = event(
                EventTime::Date(date(2025, 6, 2)),
                EventTime::Date(date(2025, 6, 3)),
            );
            assert_eq!(
                move_event(&e, date(2025, 6, 2), Some(9.0), New_York),
                Err(TimeError::PlainDateMove)
            );
        }
    }
}
