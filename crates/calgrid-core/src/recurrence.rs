//! Recurrence descriptions and RRULE encoding.
//!
//! A [`Recurrence`] is the structured form editors produce. It is encoded
//! into a single `RRULE:` line for providers that speak RFC 5545 rules.
//! Incoming rule strings are never parsed here.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::EventTime;

/// Prefix of every encoded rule.
pub const RRULE_PREFIX: &str = "RRULE:";

/// How often a recurrence repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Returns the RRULE token for this frequency.
    pub fn as_rrule(&self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }
}

/// Day of the week, in RRULE two-letter form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "SU")]
    Sunday,
    #[serde(rename = "MO")]
    Monday,
    #[serde(rename = "TU")]
    Tuesday,
    #[serde(rename = "WE")]
    Wednesday,
    #[serde(rename = "TH")]
    Thursday,
    #[serde(rename = "FR")]
    Friday,
    #[serde(rename = "SA")]
    Saturday,
}

impl Weekday {
    /// Returns the two-letter RRULE code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sunday => "SU",
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
        }
    }

    /// Returns the lowercase English name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sunday => "sunday",
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Sun => Self::Sunday,
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Validation failures for a [`Recurrence`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecurrenceError {
    /// Interval must be at least 1.
    #[error("interval must be at least 1")]
    ZeroInterval,

    /// Count must be at least 1.
    #[error("count must be at least 1")]
    ZeroCount,

    /// `count` and `until` were both supplied.
    #[error("count and until cannot both be set")]
    CountWithUntil,

    /// A by-list value is outside its allowed range.
    #[error("{field} value {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: u16,
        min: u16,
        max: u16,
    },

    /// A set position is zero or beyond a year's worth of occurrences.
    #[error("by_set_pos value {0} is outside -366..=-1 or 1..=366")]
    SetPosOutOfRange(i16),
}

/// A structured recurrence description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Recurrence {
    pub frequency: Option<Frequency>,
    pub interval: Option<u32>,
    pub count: Option<u32>,
    pub until: Option<EventTime>,
    pub by_day: Vec<Weekday>,
    pub by_month: Vec<u16>,
    pub by_month_day: Vec<u16>,
    pub by_year_day: Vec<u16>,
    pub by_week_no: Vec<u16>,
    pub by_hour: Vec<u8>,
    pub by_minute: Vec<u8>,
    pub by_second: Vec<u8>,
    /// Picks the nth occurrence within each period; negative counts from
    /// the end (`-1` is the last).
    pub by_set_pos: Vec<i16>,
}

impl Recurrence {
    /// Creates a recurrence with the given frequency.
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency: Some(frequency),
            ..Default::default()
        }
    }

    /// Builder method to set the interval.
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Builder method to set the occurrence count.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Builder method to set the until boundary.
    pub fn with_until(mut self, until: EventTime) -> Self {
        self.until = Some(until);
        self
    }

    /// Builder method to set the by-day list.
    pub fn with_by_day(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.by_day = days.into_iter().collect();
        self
    }

    /// Builder method to set the by-month-day list.
    pub fn with_by_month_day(mut self, days: impl IntoIterator<Item = u16>) -> Self {
        self.by_month_day = days.into_iter().collect();
        self
    }

    /// Builder method to set the by-month list.
    pub fn with_by_month(mut self, months: impl IntoIterator<Item = u16>) -> Self {
        self.by_month = months.into_iter().collect();
        self
    }

    /// Builder method to set the by-set-position list.
    pub fn with_by_set_pos(mut self, positions: impl IntoIterator<Item = i16>) -> Self {
        self.by_set_pos = positions.into_iter().collect();
        self
    }

    /// Frequency with the daily default applied.
    pub fn effective_frequency(&self) -> Frequency {
        self.frequency.unwrap_or_default()
    }

    /// Interval with the default of 1 applied. Zero is treated as absent.
    pub fn effective_interval(&self) -> u32 {
        self.interval.filter(|i| *i > 0).unwrap_or(1)
    }

    /// Count, with zero treated as absent.
    pub fn effective_count(&self) -> Option<u32> {
        self.count.filter(|c| *c > 0)
    }

    /// Checks the recurrence against the bounds editors are expected to enforce.
    pub fn validate(&self) -> Result<(), RecurrenceError> {
        if self.interval == Some(0) {
            return Err(RecurrenceError::ZeroInterval);
        }
        if self.count == Some(0) {
            return Err(RecurrenceError::ZeroCount);
        }
        if self.count.is_some() && self.until.is_some() {
            return Err(RecurrenceError::CountWithUntil);
        }

        check_range("by_month", &self.by_month, 1, 12)?;
        check_range("by_month_day", &self.by_month_day, 1, 31)?;
        check_range("by_year_day", &self.by_year_day, 1, 366)?;
        check_range("by_week_no", &self.by_week_no, 1, 53)?;
        check_range_u8("by_hour", &self.by_hour, 0, 23)?;
        check_range_u8("by_minute", &self.by_minute, 0, 59)?;
        check_range_u8("by_second", &self.by_second, 0, 59)?;
        if let Some(&pos) = self
            .by_set_pos
            .iter()
            .find(|p| **p == 0 || p.unsigned_abs() > 366)
        {
            return Err(RecurrenceError::SetPosOutOfRange(pos));
        }
        Ok(())
    }

    /// Encodes the recurrence as a single `RRULE:` line.
    ///
    /// Parts appear in a fixed order; absent and empty fields are left out.
    /// Encoding is total: it never fails on missing optional fields, and
    /// `count` and `until` are both emitted if both are present.
    pub fn to_rrule(&self) -> String {
        let mut parts = vec![
            format!("FREQ={}", self.effective_frequency().as_rrule()),
            format!("INTERVAL={}", self.effective_interval()),
        ];

        if let Some(count) = self.effective_count() {
            parts.push(format!("COUNT={}", count));
        }
        if let Some(ref until) = self.until {
            parts.push(format!("UNTIL={}", format_until(until)));
        }

        push_list(&mut parts, "BYDAY", &self.by_day);
        push_list(&mut parts, "BYMONTH", &self.by_month);
        push_list(&mut parts, "BYMONTHDAY", &self.by_month_day);
        push_list(&mut parts, "BYYEARDAY", &self.by_year_day);
        push_list(&mut parts, "BYWEEKNO", &self.by_week_no);
        push_list(&mut parts, "BYHOUR", &self.by_hour);
        push_list(&mut parts, "BYMINUTE", &self.by_minute);
        push_list(&mut parts, "BYSECOND", &self.by_second);
        push_list(&mut parts, "BYSETPOS", &self.by_set_pos);

        format!("{}{}", RRULE_PREFIX, parts.join(";"))
    }
}

/// Returns the provider `recurrence` array: empty, or exactly one rule.
pub fn recurrence_lines(recurrence: Option<&Recurrence>) -> Vec<String> {
    recurrence.map(|r| vec![r.to_rrule()]).unwrap_or_default()
}

/// Formats an `UNTIL` value.
///
/// Plain dates become `YYYYMMDD`; anything with a time component becomes a
/// UTC `YYYYMMDDTHHMMSSZ` with sub-seconds dropped.
pub fn format_until(until: &EventTime) -> String {
    match until {
        EventTime::Date(d) => d.format("%Y%m%d").to_string(),
        EventTime::Instant(dt) => dt.format("%Y%m%dT%H%M%SZ").to_string(),
        EventTime::Zoned(z) => z
            .instant
            .with_timezone(&Utc)
            .format("%Y%m%dT%H%M%SZ")
            .to_string(),
    }
}

fn push_list<T: fmt::Display>(parts: &mut Vec<String>, name: &str, values: &[T]) {
    if values.is_empty() {
        return;
    }
    let joined = values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",");
    parts.push(format!("{}={}", name, joined));
}

fn check_range(
    field: &'static str,
    values: &[u16],
    min: u16,
    max: u16,
) -> Result<(), RecurrenceError> {
    match values.iter().find(|v| **v < min || **v > max) {
        Some(&value) => Err(RecurrenceError::OutOfRange {
            field,
            value,
            min,
            max,
        }),
        None => Ok(()),
    }
}

fn check_range_u8(
    field: &'static str,
    values: &[u8],
    min: u8,
    max: u8,
) -> Result<(), RecurrenceError> {
    let widened: Vec<u16> = values.iter().map(|v| u16::from(*v)).collect();
    check_range(field, &widened, u16::from(min), u16::from(max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use chrono_tz::Europe::Paris;

    #[test]
    fn weekly_with_days() {
        let r = Recurrence::new(Frequency::Weekly)
            .with_interval(2)
            .with_by_day([Weekday::Monday, Weekday::Wednesday]);
        assert_eq!(r.to_rrule(), "RRULE:FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE");
    }

    #[test]
    fn defaults_apply_when_absent() {
        let r = Recurrence::default();
        assert_eq!(r.to_rrule(), "RRULE:FREQ=DAILY;INTERVAL=1");
    }

    #[test]
    fn zero_interval_and_count_are_coerced() {
        let r = Recurrence {
            frequency: Some(Frequency::Monthly),
            interval: Some(0),
            count: Some(0),
            ..Default::default()
        };
        assert_eq!(r.to_rrule(), "RRULE:FREQ=MONTHLY;INTERVAL=1");
    }

    #[test]
    fn empty_lists_are_omitted() {
        let r = Recurrence {
            frequency: Some(Frequency::Weekly),
            by_day: Vec::new(),
            by_month: Vec::new(),
            ..Default::default()
        };
        let rule = r.to_rrule();
        assert!(!rule.contains("BYDAY"));
        assert!(!rule.ends_with(';'));
        assert!(!rule.contains(";;"));
    }

    #[test]
    fn field_order_is_fixed() {
        let r = Recurrence {
            frequency: Some(Frequency::Yearly),
            interval: Some(1),
            count: Some(5),
            by_second: vec![30],
            by_minute: vec![15],
            by_hour: vec![9],
            by_week_no: vec![20],
            by_year_day: vec![100],
            by_month_day: vec![1, 15],
            by_month: vec![3],
            by_day: vec![Weekday::Friday],
            ..Default::default()
        };
        assert_eq!(
            r.to_rrule(),
            "RRULE:FREQ=YEARLY;INTERVAL=1;COUNT=5;BYDAY=FR;BYMONTH=3;BYMONTHDAY=1,15;\
             BYYEARDAY=100;BYWEEKNO=20;BYHOUR=9;BYMINUTE=15;BYSECOND=30"
        );
    }

    mod until {
        use super::*;

        #[test]
        fn plain_date_is_compact() {
            let until = EventTime::from_date(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
            assert_eq!(format_until(&until), "20251231");

            let r = Recurrence::new(Frequency::Daily).with_until(until);
            assert_eq!(r.to_rrule(), "RRULE:FREQ=DAILY;INTERVAL=1;UNTIL=20251231");
        }

        #[test]
        fn instant_drops_subseconds() {
            let dt = Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 15).unwrap()
                + chrono::Duration::milliseconds(250);
            assert_eq!(format_until(&EventTime::from_utc(dt)), "20250601T083015Z");
        }

        #[test]
        fn zoned_is_converted_to_utc() {
            let instant = Utc.with_ymd_and_hms(2025, 6, 1, 22, 0, 0).unwrap();
            let until = EventTime::from_zoned(instant, Paris);
            assert_eq!(format_until(&until), "20250601T220000Z");
        }
    }

    #[test]
    fn set_position_comes_last() {
        let r = Recurrence::new(Frequency::Monthly)
            .with_by_day([Weekday::Wednesday])
            .with_by_set_pos([2]);
        assert_eq!(r.to_rrule(), "RRULE:FREQ=MONTHLY;INTERVAL=1;BYDAY=WE;BYSETPOS=2");

        let last = Recurrence::new(Frequency::Monthly)
            .with_by_day([Weekday::Friday])
            .with_by_set_pos([-1]);
        assert!(last.to_rrule().ends_with(";BYDAY=FR;BYSETPOS=-1"));
        assert_eq!(last.validate(), Ok(()));
    }

    #[test]
    fn count_and_until_are_both_encoded() {
        let r = Recurrence::new(Frequency::Daily)
            .with_count(3)
            .with_until(EventTime::from_date(
                NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            ));
        assert_eq!(
            r.to_rrule(),
            "RRULE:FREQ=DAILY;INTERVAL=1;COUNT=3;UNTIL=20250110"
        );
        assert_eq!(r.validate(), Err(RecurrenceError::CountWithUntil));
    }

    mod validation {
        use super::*;

        #[test]
        fn accepts_well_formed() {
            let r = Recurrence::new(Frequency::Monthly)
                .with_interval(1)
                .with_by_month_day([1, 31])
                .with_by_month([1, 12]);
            assert_eq!(r.validate(), Ok(()));
        }

        #[test]
        fn rejects_zero_interval() {
            let r = Recurrence::new(Frequency::Daily).with_interval(0);
            assert_eq!(r.validate(), Err(RecurrenceError::ZeroInterval));
        }

        #[test]
        fn rejects_out_of_range_lists() {
            let r = Recurrence::new(Frequency::Yearly).with_by_month([13]);
            assert_eq!(
                r.validate(),
                Err(RecurrenceError::OutOfRange {
                    field: "by_month",
                    value: 13,
                    min: 1,
                    max: 12
                })
            );

            let r = Recurrence {
                by_hour: vec![24],
                ..Default::default()
            };
            assert!(matches!(
                r.validate(),
                Err(RecurrenceError::OutOfRange {
                    field: "by_hour",
                    ..
                })
            ));

            let r = Recurrence::new(Frequency::Monthly).with_by_set_pos([0]);
            assert_eq!(r.validate(), Err(RecurrenceError::SetPosOutOfRange(0)));
            let r = Recurrence::new(Frequency::Monthly).with_by_set_pos([-367]);
            assert_eq!(r.validate(), Err(RecurrenceError::SetPosOutOfRange(-367)));
        }
    }

    #[test]
    fn lines_hold_at_most_one_rule() {
        assert!(recurrence_lines(None).is_empty());
        let r = Recurrence::new(Frequency::Weekly);
        assert_eq!(
            recurrence_lines(Some(&r)),
            vec!["RRULE:FREQ=WEEKLY;INTERVAL=1".to_string()]
        );
    }

    #[test]
    fn deserializes_camel_case() {
        let r: Recurrence = serde_json::from_str(
            r#"{"frequency":"weekly","interval":2,"byDay":["MO","WE"]}"#,
        )
        .unwrap();
        assert_eq!(r.to_rrule(), "RRULE:FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE");
    }
}
