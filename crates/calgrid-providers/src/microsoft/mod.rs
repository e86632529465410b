//! Microsoft Graph payload mapping.
//!
//! Graph sends boundaries as local wall time plus a zone name, which is a
//! Windows zone unless the caller asked for IANA names. All-day events are
//! flagged at the event level. Recurrence uses Graph's patterned form
//! rather than RRULE lines.

mod mapper;
pub mod recurrence;
pub mod timezones;
mod types;

pub use mapper::{MicrosoftMapper, parse_date_time, to_date_time};
pub use recurrence::{from_patterned, to_patterned};
pub use timezones::{iana_to_windows, is_utc, resolve_time_zone, windows_to_iana};
pub use types::{
    MicrosoftAttendee, MicrosoftDateTimeZone, MicrosoftEmailAddress, MicrosoftEvent,
    MicrosoftEventWrite, MicrosoftItemBody, MicrosoftLocation, MicrosoftOnlineMeeting,
    MicrosoftPhone, MicrosoftResponseStatus, PatternedRecurrence, RecurrencePattern,
    RecurrenceRange,
};
