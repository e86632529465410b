//! Core types: time, events, recurrence, lane layout, drag snapping

pub mod drag;
pub mod event;
pub mod layout;
pub mod recurrence;
pub mod settings;
pub mod time;
pub mod tracing;

pub use drag::{
    move_event, minutes_from_offset, round_down, round_half_expand, snap_minutes, DragAction,
    DragColumn, DragPhase, DragPreview, DragToCreate,
};
pub use event::{
    Attendee, AttendeeKind, AttendeeStatus, CalendarEvent, Conference, DraftEvent, EntryPoint,
    EntryPointType, EventKey, EventMetadata, ProviderId, SelectedEvent, TimeZoneName,
};
pub use layout::{
    day_cell_layout, is_weekend, pack_lanes, span_of, timed_column_layout,
    visible_lanes_for_height, week_all_day_layout, week_row_layout, week_start_of, Granularity,
    LaneItem, LaneLayout, Placement, Span, WeekWindow,
};
pub use recurrence::{recurrence_lines, Frequency, Recurrence, RecurrenceError, Weekday};
pub use settings::CalendarSettings;
pub use time::{EventTime, TimeError, TimeResult, ZonedDateTime};
pub use self::tracing::{init_tracing, TracingConfig, TracingError, TracingOutputFormat};
