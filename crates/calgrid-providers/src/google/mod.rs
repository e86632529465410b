//! Google Calendar payload mapping.
//!
//! Google sends all-day boundaries as `{date}` and timed ones as
//! `{dateTime, timeZone?}`, where `dateTime` carries an offset and
//! `timeZone` is an IANA name. Recurrence lines are carried through in
//! [`calgrid_core::EventMetadata::Google`] without being parsed.

mod mapper;
mod types;

pub use mapper::{GoogleMapper, parse_date_time, to_date_time};
pub use types::{
    GoogleAttendee, GoogleConferenceData, GoogleConferenceSolution, GoogleConferenceSolutionKey,
    GoogleEntryPoint, GoogleEvent, GoogleEventDateTime, GoogleEventWrite,
};
