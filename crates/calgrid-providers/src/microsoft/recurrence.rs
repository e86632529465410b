//! Graph patterned recurrence.
//!
//! Graph does not take RRULE strings. A [`Recurrence`] is mapped onto a
//! `{pattern, range}` pair instead; constraints Graph has no field for are
//! rejected as unsupported.

use calgrid_core::recurrence::{Frequency, Recurrence, Weekday};
use calgrid_core::time::parse_plain_date;
use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;

use super::types::{PatternedRecurrence, RecurrencePattern, RecurrenceRange};
use crate::error::{ProviderError, ProviderResult};

const INDEXES: [&str; 5] = ["first", "second", "third", "fourth", "last"];
/// Set positions matching [`INDEXES`].
const SET_POSITIONS: [i16; 5] = [1, 2, 3, 4, -1];

/// Maps a recurrence onto Graph's patterned form.
///
/// `start` is the local start date of the series and `time_zone` is the
/// Graph zone name for `recurrenceTimeZone`. Defaults missing from the
/// recurrence (day of week, day of month, month, relative index) are taken
/// from `start`. A single `by_set_pos` of 1..=4 or -1 selects the relative
/// index.
pub fn to_patterned(
    recurrence: &Recurrence,
    start: NaiveDate,
    time_zone: Option<&str>,
    tz: Tz,
) -> ProviderResult<PatternedRecurrence> {
    reject_unsupported(recurrence)?;

    let interval = recurrence.effective_interval();
    let days_of_week = |days: &[Weekday]| -> Vec<String> {
        if days.is_empty() {
            vec![Weekday::from(start.weekday()).name().to_string()]
        } else {
            days.iter().map(|d| d.name().to_string()).collect()
        }
    };

    let pattern = match recurrence.effective_frequency() {
        Frequency::Daily => RecurrencePattern {
            kind: "daily".into(),
            interval,
            ..Default::default()
        },
        Frequency::Weekly => RecurrencePattern {
            kind: "weekly".into(),
            interval,
            days_of_week: days_of_week(&recurrence.by_day),
            first_day_of_week: Some("sunday".into()),
            ..Default::default()
        },
        Frequency::Monthly if !recurrence.by_day.is_empty() => RecurrencePattern {
            kind: "relativeMonthly".into(),
            interval,
            days_of_week: days_of_week(&recurrence.by_day),
            index: Some(relative_index(recurrence, start)?.into()),
            ..Default::default()
        },
        Frequency::Monthly => RecurrencePattern {
            kind: "absoluteMonthly".into(),
            interval,
            day_of_month: Some(single("by_month_day", &recurrence.by_month_day)?.unwrap_or(start.day() as u16)),
            ..Default::default()
        },
        Frequency::Yearly if !recurrence.by_day.is_empty() => RecurrencePattern {
            kind: "relativeYearly".into(),
            interval,
            days_of_week: days_of_week(&recurrence.by_day),
            index: Some(relative_index(recurrence, start)?.into()),
            month: Some(single("by_month", &recurrence.by_month)?.unwrap_or(start.month() as u16)),
            ..Default::default()
        },
        Frequency::Yearly => RecurrencePattern {
            kind: "absoluteYearly".into(),
            interval,
            day_of_month: Some(single("by_month_day", &recurrence.by_month_day)?.unwrap_or(start.day() as u16)),
            month: Some(single("by_month", &recurrence.by_month)?.unwrap_or(start.month() as u16)),
            ..Default::default()
        },
    };

    let start_date = start.format("%Y-%m-%d").to_string();
    let recurrence_time_zone = time_zone.map(str::to_string);
    let range = match (recurrence.effective_count(), &recurrence.until) {
        (Some(_), Some(_)) => {
            return Err(ProviderError::unsupported(
                "recurrence range cannot have both a count and an end date",
            ));
        }
        (Some(count), None) => RecurrenceRange {
            kind: "numbered".into(),
            start_date,
            number_of_occurrences: Some(count),
            recurrence_time_zone,
            ..Default::default()
        },
        (None, Some(until)) => RecurrenceRange {
            kind: "endDate".into(),
            start_date,
            end_date: Some(until.to_plain_date(Some(tz))?.format("%Y-%m-%d").to_string()),
            recurrence_time_zone,
            ..Default::default()
        },
        (None, None) => RecurrenceRange {
            kind: "noEnd".into(),
            start_date,
            recurrence_time_zone,
            ..Default::default()
        },
    };

    Ok(PatternedRecurrence { pattern, range })
}

/// Maps Graph's patterned form back into a [`Recurrence`].
///
/// The `index` of relative patterns becomes a single `by_set_pos`.
pub fn from_patterned(patterned: &PatternedRecurrence) -> ProviderResult<Recurrence> {
    let pattern = &patterned.pattern;
    let by_day = pattern
        .days_of_week
        .iter()
        .map(|d| parse_weekday(d))
        .collect::<ProviderResult<Vec<_>>>()?;

    let mut recurrence = match pattern.kind.as_str() {
        "daily" => Recurrence::new(Frequency::Daily),
        "weekly" => Recurrence::new(Frequency::Weekly).with_by_day(by_day),
        "absoluteMonthly" => {
            Recurrence::new(Frequency::Monthly).with_by_month_day(pattern.day_of_month)
        }
        "relativeMonthly" => Recurrence::new(Frequency::Monthly)
            .with_by_day(by_day)
            .with_by_set_pos(parse_index(pattern.index.as_deref())?),
        "absoluteYearly" => Recurrence::new(Frequency::Yearly)
            .with_by_month(pattern.month)
            .with_by_month_day(pattern.day_of_month),
        "relativeYearly" => Recurrence::new(Frequency::Yearly)
            .with_by_month(pattern.month)
            .with_by_day(by_day)
            .with_by_set_pos(parse_index(pattern.index.as_deref())?),
        other => {
            return Err(ProviderError::invalid_payload(format!(
                "unknown recurrence pattern type '{}'",
                other
            )));
        }
    };
    recurrence.interval = Some(pattern.interval.max(1));

    let range = &patterned.range;
    match range.kind.as_str() {
        "numbered" => recurrence.count = range.number_of_occurrences.filter(|n| *n > 0),
        "endDate" => {
            let end = range
                .end_date
                .as_deref()
                .ok_or_else(|| ProviderError::missing_field("range.endDate"))?;
            recurrence.until = Some(calgrid_core::EventTime::Date(parse_plain_date(end)?));
        }
        _ => {}
    }
    Ok(recurrence)
}

fn reject_unsupported(recurrence: &Recurrence) -> ProviderResult<()> {
    let relative = !recurrence.by_day.is_empty()
        && matches!(
            recurrence.effective_frequency(),
            Frequency::Monthly | Frequency::Yearly
        );
    if !recurrence.by_set_pos.is_empty() && !relative {
        return Err(ProviderError::unsupported(
            "by_set_pos needs a monthly or yearly by_day in a patterned recurrence",
        ));
    }
    let unsupported = [
        ("by_year_day", recurrence.by_year_day.is_empty()),
        ("by_week_no", recurrence.by_week_no.is_empty()),
        ("by_hour", recurrence.by_hour.is_empty()),
        ("by_minute", recurrence.by_minute.is_empty()),
        ("by_second", recurrence.by_second.is_empty()),
    ];
    match unsupported.iter().find(|(_, empty)| !empty) {
        Some((field, _)) => Err(ProviderError::unsupported(format!(
            "{} cannot be expressed as a patterned recurrence",
            field
        ))),
        None => Ok(()),
    }
}

fn single(field: &str, values: &[u16]) -> ProviderResult<Option<u16>> {
    match values {
        [] => Ok(None),
        [value] => Ok(Some(*value)),
        _ => Err(ProviderError::unsupported(format!(
            "{} takes a single value in a patterned recurrence",
            field
        ))),
    }
}

/// Graph index for a relative pattern: the rule's set position, or the
/// occurrence of the start date's weekday within its month.
fn relative_index(recurrence: &Recurrence, start: NaiveDate) -> ProviderResult<&'static str> {
    match recurrence.by_set_pos.as_slice() {
        [] => Ok(week_index(start)),
        [pos] => SET_POSITIONS
            .iter()
            .position(|p| p == pos)
            .map(|i| INDEXES[i])
            .ok_or_else(|| {
                ProviderError::unsupported(format!(
                    "by_set_pos {} has no patterned index; use 1 to 4 or -1",
                    pos
                ))
            }),
        _ => Err(ProviderError::unsupported(
            "by_set_pos takes a single value in a patterned recurrence",
        )),
    }
}

/// Set position for a Graph index. A missing index means the first.
fn parse_index(index: Option<&str>) -> ProviderResult<Option<i16>> {
    let Some(index) = index else {
        return Ok(None);
    };
    INDEXES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(index))
        .map(|i| Some(SET_POSITIONS[i]))
        .ok_or_else(|| {
            ProviderError::invalid_payload(format!("unknown week index '{}'", index))
        })
}

/// Which occurrence of its weekday `date` is within the month.
fn week_index(date: NaiveDate) -> &'static str {
    let nth = ((date.day() - 1) / 7) as usize;
    INDEXES[nth.min(INDEXES.len() - 1)]
}

fn parse_weekday(name: &str) -> ProviderResult<Weekday> {
    let day = match name.to_ascii_lowercase().as_str() {
        "sunday" => Weekday::Sunday,
        "monday" => Weekday::Monday,
        "tuesday" => Weekday::Tuesday,
        "wednesday" => Weekday::Wednesday,
        "thursday" => Weekday::Thursday,
        "friday" => Weekday::Friday,
        "saturday" => Weekday::Saturday,
        other => {
            return Err(ProviderError::invalid_payload(format!(
                "unknown day of week '{}'",
                other
            )));
        }
    };
    Ok(day)
}
