//! Time types for calendar events.
//!
//! Providers describe event boundaries in three different shapes, and this
//! module keeps all three apart instead of collapsing them early:
//! - **Date**: a plain calendar date (all-day events)
//! - **Instant**: an absolute point in time with no zone attached
//! - **Zoned**: an absolute point in time plus the IANA zone it was expressed in
//!
//! Converting between shapes that would require inventing a time zone is an
//! error ([`TimeError::MissingTimeZone`]); the caller must say which zone to use.

use std::fmt;

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, SecondsFormat,
    TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while parsing or converting event boundaries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimeError {
    /// A conversion needed a time zone and none was supplied.
    #[error("cannot convert {value} to {target} without an explicit time zone")]
    MissingTimeZone { value: String, target: &'static str },

    /// The time zone identifier is not a known IANA zone.
    #[error("unknown time zone identifier: {0}")]
    UnknownTimeZone(String),

    /// A plain date string could not be parsed.
    #[error("invalid date '{value}': {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A date-time string could not be parsed.
    #[error("invalid date-time '{value}': {source}")]
    InvalidDateTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Start and end use incompatible boundary kinds.
    #[error("start is a {start} but end is a {end}")]
    MixedBoundaries { start: &'static str, end: &'static str },

    /// The `all_day` flag disagrees with the boundary kinds.
    #[error("all-day flag is {all_day} but boundaries are {kind} values")]
    AllDayMismatch { all_day: bool, kind: &'static str },

    /// The end boundary does not come after the start boundary.
    #[error("end {end} is not after start {start}")]
    EndNotAfterStart { start: String, end: String },

    /// An all-day event was dropped onto a time slot.
    #[error("cannot move an all-day event to a time of day")]
    PlainDateMove,

    /// Date arithmetic left the representable range.
    #[error("date arithmetic out of range")]
    OutOfRange,
}

/// Result type for time operations.
pub type TimeResult<T> = Result<T, TimeError>;

/// An absolute instant together with the zone it belongs to.
///
/// The zone is kept as the exact identifier it was parsed from, so
/// link names such as `US/Eastern` survive a round trip unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZonedDateTime {
    /// The instant, stored in UTC.
    pub instant: DateTime<Utc>,
    /// The IANA time zone.
    pub time_zone: Tz,
}

impl ZonedDateTime {
    /// Creates a zoned value from an instant and a zone.
    pub fn new(instant: DateTime<Utc>, time_zone: Tz) -> Self {
        Self { instant, time_zone }
    }

    /// Resolves a wall-clock time in `tz`.
    ///
    /// Ambiguous times (DST fold) resolve to the earlier instant. Times that
    /// fall into a DST gap are pushed forward by the length of the gap.
    pub fn from_local(naive: NaiveDateTime, tz: Tz) -> Self {
        let instant = match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => {
                let day_before = naive.checked_sub_signed(Duration::days(1)).unwrap_or(naive);
                let offset_before = tz.offset_from_utc_datetime(&day_before).fix().local_minus_utc();
                naive
                    .checked_sub_signed(Duration::seconds(i64::from(offset_before)))
                    .unwrap_or(naive)
                    .and_utc()
            }
        };
        Self::new(instant, tz)
    }

    /// Returns the IANA identifier of the zone.
    pub fn time_zone_id(&self) -> &'static str {
        self.time_zone.name()
    }

    /// Returns the value as a chrono datetime in its own zone.
    pub fn local(&self) -> DateTime<Tz> {
        self.instant.with_timezone(&self.time_zone)
    }

    /// Returns the wall-clock time in its own zone.
    pub fn naive_local(&self) -> NaiveDateTime {
        self.local().naive_local()
    }

    /// Returns the same instant viewed from another zone.
    pub fn with_time_zone(&self, tz: Tz) -> Self {
        Self::new(self.instant, tz)
    }
}

impl fmt::Display for ZonedDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]",
            self.local().to_rfc3339_opts(SecondsFormat::AutoSi, false),
            self.time_zone_id()
        )
    }
}

/// A start or end boundary of a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EventTime {
    /// A plain calendar date (all-day).
    Date(NaiveDate),
    /// An absolute instant without zone context.
    Instant(DateTime<Utc>),
    /// An absolute instant expressed in a specific zone.
    Zoned(ZonedDateTime),
}

impl EventTime {
    /// Creates an `EventTime::Date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::Date(date)
    }

    /// Creates an `EventTime::Instant`.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self::Instant(dt)
    }

    /// Creates an `EventTime::Zoned`.
    pub fn from_zoned(instant: DateTime<Utc>, tz: Tz) -> Self {
        Self::Zoned(ZonedDateTime::new(instant, tz))
    }

    /// Returns a short name for the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Date(_) => "date",
            Self::Instant(_) => "instant",
            Self::Zoned(_) => "zoned date-time",
        }
    }

    /// Returns `true` for a plain date.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// Returns the absolute instant, if this boundary has one.
    pub fn to_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(_) => None,
            Self::Instant(dt) => Some(*dt),
            Self::Zoned(z) => Some(z.instant),
        }
    }

    /// Returns the zone carried by this boundary, if any.
    pub fn time_zone(&self) -> Option<Tz> {
        match self {
            Self::Zoned(z) => Some(z.time_zone),
            _ => None,
        }
    }

    /// Places this boundary on the wall clock of a display zone.
    ///
    /// Plain dates land on midnight of that date regardless of `tz`.
    pub fn local_in(&self, tz: Tz) -> NaiveDateTime {
        match self {
            Self::Date(d) => d.and_time(NaiveTime::MIN),
            Self::Instant(dt) => dt.with_timezone(&tz).naive_local(),
            Self::Zoned(z) => z.instant.with_timezone(&tz).naive_local(),
        }
    }

    /// Converts to a zoned value.
    ///
    /// A zoned value keeps its own zone unless `tz` is given. Instants and
    /// dates require `tz`; without it this fails rather than guessing.
    pub fn to_zoned(&self, tz: Option<Tz>) -> TimeResult<ZonedDateTime> {
        match (self, tz) {
            (Self::Zoned(z), None) => Ok(*z),
            (Self::Zoned(z), Some(tz)) => Ok(z.with_time_zone(tz)),
            (Self::Instant(dt), Some(tz)) => Ok(ZonedDateTime::new(*dt, tz)),
            (Self::Date(d), Some(tz)) => Ok(ZonedDateTime::from_local(d.and_time(NaiveTime::MIN), tz)),
            (other, None) => Err(TimeError::MissingTimeZone {
                value: other.to_string(),
                target: "zoned date-time",
            }),
        }
    }

    /// Converts to a plain date.
    ///
    /// Zoned values use their own zone unless `tz` is given. Instants
    /// require `tz`.
    pub fn to_plain_date(&self, tz: Option<Tz>) -> TimeResult<NaiveDate> {
        match (self, tz) {
            (Self::Date(d), _) => Ok(*d),
            (Self::Zoned(z), None) => Ok(z.naive_local().date()),
            (Self::Zoned(z), Some(tz)) => Ok(z.instant.with_timezone(&tz).date_naive()),
            (Self::Instant(dt), Some(tz)) => Ok(dt.with_timezone(&tz).date_naive()),
            (Self::Instant(dt), None) => Err(TimeError::MissingTimeZone {
                value: format_instant(dt),
                target: "plain date",
            }),
        }
    }

    /// Shifts the boundary by a duration, keeping its kind.
    ///
    /// Plain dates move by whole days only; the remainder is dropped.
    pub fn checked_add(&self, duration: Duration) -> TimeResult<Self> {
        match self {
            Self::Date(d) => d
                .checked_add_signed(Duration::days(duration.num_days()))
                .map(Self::Date)
                .ok_or(TimeError::OutOfRange),
            Self::Instant(dt) => dt
                .checked_add_signed(duration)
                .map(Self::Instant)
                .ok_or(TimeError::OutOfRange),
            Self::Zoned(z) => z
                .instant
                .checked_add_signed(duration)
                .map(|instant| Self::Zoned(ZonedDateTime::new(instant, z.time_zone)))
                .ok_or(TimeError::OutOfRange),
        }
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Instant(dt) => write!(f, "{}", format_instant(dt)),
            Self::Zoned(z) => write!(f, "{}", z),
        }
    }
}

/// Formats an instant as RFC 3339 with a trailing `Z`.
pub fn format_instant(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_plain_date(value: &str) -> TimeResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|source| TimeError::InvalidDate {
        value: value.to_string(),
        source,
    })
}

/// Parses an RFC 3339 timestamp into UTC.
pub fn parse_instant(value: &str) -> TimeResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| TimeError::InvalidDateTime {
            value: value.to_string(),
            source,
        })
}

/// Parses an offset-less wall-clock timestamp, with optional fractional seconds.
pub fn parse_naive_datetime(value: &str) -> TimeResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").map_err(|source| {
        TimeError::InvalidDateTime {
            value: value.to_string(),
            source,
        }
    })
}

/// Parses an IANA time zone identifier.
pub fn parse_time_zone(value: &str) -> TimeResult<Tz> {
    value
        .trim()
        .parse::<Tz>()
        .map_err(|_| TimeError::UnknownTimeZone(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::New_York;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod event_time {
        use super::*;

        #[test]
        fn variants() {
            let d = EventTime::from_date(date(2025, 2, 5));
            assert!(d.is_all_day());
            assert_eq!(d.to_instant(), None);

            let i = EventTime::from_utc(utc(2025, 2, 5, 10, 0, 0));
            assert!(!i.is_all_day());
            assert_eq!(i.to_instant(), Some(utc(2025, 2, 5, 10, 0, 0)));
            assert_eq!(i.time_zone(), None);

            let z = EventTime::from_zoned(utc(2025, 2, 5, 15, 0, 0), New_York);
            assert_eq!(z.time_zone(), Some(New_York));
            assert_eq!(z.to_instant(), Some(utc(2025, 2, 5, 15, 0, 0)));
        }

        #[test]
        fn local_in_display_zone() {
            let i = EventTime::from_utc(utc(2025, 2, 5, 3, 30, 0));
            assert_eq!(
                i.local_in(New_York),
                date(2025, 2, 4).and_hms_opt(22, 30, 0).unwrap()
            );

            let d = EventTime::from_date(date(2025, 2, 5));
            assert_eq!(
                d.local_in(New_York),
                date(2025, 2, 5).and_hms_opt(0, 0, 0).unwrap()
            );
        }

        #[test]
        fn instant_needs_zone_for_demotion() {
            let i = EventTime::from_utc(utc(2025, 2, 5, 10, 0, 0));

            let err = i.to_zoned(None).unwrap_err();
            assert!(matches!(err, TimeError::MissingTimeZone { .. }));

            let err = i.to_plain_date(None).unwrap_err();
            assert!(matches!(
                err,
                TimeError::MissingTimeZone {
                    target: "plain date",
                    ..
                }
            ));

            let zoned = i.to_zoned(Some(New_York)).unwrap();
            assert_eq!(zoned.time_zone_id(), "America/New_York");
            assert_eq!(zoned.instant, utc(2025, 2, 5, 10, 0, 0));
        }

        #[test]
        fn zoned_uses_own_zone_for_date() {
            let z = EventTime::from_zoned(utc(2025, 2, 6, 2, 0, 0), New_York);
            assert_eq!(z.to_plain_date(None).unwrap(), date(2025, 2, 5));
            assert_eq!(z.to_plain_date(Some(chrono_tz::UTC)).unwrap(), date(2025, 2, 6));
        }

        #[test]
        fn date_to_zoned_is_local_midnight() {
            let d = EventTime::from_date(date(2025, 2, 5));
            let z = d.to_zoned(Some(New_York)).unwrap();
            assert_eq!(z.instant, utc(2025, 2, 5, 5, 0, 0));
            assert!(d.to_zoned(None).is_err());
        }

        #[test]
        fn checked_add_keeps_kind() {
            let d = EventTime::from_date(date(2025, 2, 5));
            assert_eq!(
                d.checked_add(Duration::days(2)).unwrap(),
                EventTime::from_date(date(2025, 2, 7))
            );

            let z = EventTime::from_zoned(utc(2025, 2, 5, 15, 0, 0), New_York);
            let moved = z.checked_add(Duration::minutes(90)).unwrap();
            assert_eq!(moved.time_zone(), Some(New_York));
            assert_eq!(moved.to_instant(), Some(utc(2025, 2, 5, 16, 30, 0)));
        }

        #[test]
        fn display() {
            assert_eq!(EventTime::from_date(date(2025, 2, 5)).to_string(), "2025-02-05");
            assert_eq!(
                EventTime::from_utc(utc(2025, 2, 5, 10, 0, 0)).to_string(),
                "2025-02-05T10:00:00Z"
            );
            assert_eq!(
                EventTime::from_zoned(utc(2025, 2, 5, 15, 0, 0), New_York).to_string(),
                "2025-02-05T10:00:00-05:00[America/New_York]"
            );
        }

        #[test]
        fn serde_roundtrip() {
            for et in [
                EventTime::from_date(date(2025, 2, 5)),
                EventTime::from_utc(utc(2025, 2, 5, 10, 30, 0)),
                EventTime::from_zoned(utc(2025, 2, 5, 10, 30, 0), New_York),
            ] {
                let json = serde_json::to_string(&et).unwrap();
                let parsed: EventTime = serde_json::from_str(&json).unwrap();
                assert_eq!(et, parsed);
            }
        }
    }

    mod zoned {
        use super::*;

        #[test]
        fn link_names_are_preserved() {
            let tz = parse_time_zone("US/Eastern").unwrap();
            let z = ZonedDateTime::new(utc(2025, 2, 5, 15, 0, 0), tz);
            assert_eq!(z.time_zone_id(), "US/Eastern");
        }

        #[test]
        fn from_local_single() {
            let naive = date(2025, 7, 1).and_hms_opt(9, 0, 0).unwrap();
            let z = ZonedDateTime::from_local(naive, New_York);
            assert_eq!(z.instant, utc(2025, 7, 1, 13, 0, 0));
            assert_eq!(z.naive_local(), naive);
        }

        #[test]
        fn from_local_gap_moves_forward() {
            // 2025-03-09 02:30 does not exist in New York.
            let naive = date(2025, 3, 9).and_hms_opt(2, 30, 0).unwrap();
            let z = ZonedDateTime::from_local(naive, New_York);
            assert_eq!(
                z.naive_local(),
                date(2025, 3, 9).and_hms_opt(3, 30, 0).unwrap()
            );
        }

        #[test]
        fn from_local_fold_takes_earliest() {
            // 2025-11-02 01:30 happens twice in New York.
            let naive = date(2025, 11, 2).and_hms_opt(1, 30, 0).unwrap();
            let z = ZonedDateTime::from_local(naive, New_York);
            assert_eq!(z.instant, utc(2025, 11, 2, 5, 30, 0));
        }
    }

    mod parsing {
        use super::*;

        #[test]
        fn plain_date() {
            assert_eq!(parse_plain_date("2025-02-05").unwrap(), date(2025, 2, 5));
            assert!(matches!(
                parse_plain_date("2025-13-05"),
                Err(TimeError::InvalidDate { .. })
            ));
        }

        #[test]
        fn instant_with_offset() {
            assert_eq!(
                parse_instant("2025-02-05T10:00:00-05:00").unwrap(),
                utc(2025, 2, 5, 15, 0, 0)
            );
            assert!(parse_instant("2025-02-05 10:00").is_err());
        }

        #[test]
        fn naive_with_fraction() {
            assert_eq!(
                parse_naive_datetime("2025-02-05T10:00:00.0000000").unwrap(),
                date(2025, 2, 5).and_hms_opt(10, 0, 0).unwrap()
            );
            assert_eq!(
                parse_naive_datetime("2025-02-05T10:00:00").unwrap(),
                date(2025, 2, 5).and_hms_opt(10, 0, 0).unwrap()
            );
        }

        #[test]
        fn time_zone() {
            assert_eq!(parse_time_zone("America/New_York").unwrap(), New_York);
            assert_eq!(
                parse_time_zone("Mars/Olympus_Mons").unwrap_err(),
                TimeError::UnknownTimeZone("Mars/Olympus_Mons".to_string())
            );
        }
    }
}
