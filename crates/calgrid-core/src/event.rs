//! Event types for calendar events.
//!
//! - [`CalendarEvent`]: the provider-agnostic event every view renders
//! - [`EventKey`]: the stable identity used by layout
//! - [`DraftEvent`]: a temporary event produced by click or drag to create
//! - [`SelectedEvent`]: the current selection, draft or saved

use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::recurrence::Recurrence;
use crate::settings::CalendarSettings;
use crate::time::{EventTime, TimeError, TimeResult};

/// Prefix of temporary draft identifiers.
pub const DRAFT_ID_PREFIX: &str = "draft-";

/// The calendar provider an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Google,
    Microsoft,
}

impl ProviderId {
    /// Returns the wire name of the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Microsoft => "microsoft",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "microsoft" => Ok(Self::Microsoft),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}

/// Identity of an event for layout purposes.
///
/// Ordering is by account, then calendar, then event id, which makes it
/// usable as the final tie-breaker when packing lanes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventKey {
    pub account_id: String,
    pub calendar_id: String,
    pub id: String,
}

impl EventKey {
    pub fn new(
        account_id: impl Into<String>,
        calendar_id: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            calendar_id: calendar_id.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.account_id, self.calendar_id, self.id)
    }
}

/// The response status for an event attendee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendeeStatus {
    Accepted,
    Tentative,
    Declined,
    #[default]
    Unknown,
}

/// Whether an attendee is required, optional, or a room or resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendeeKind {
    #[default]
    Required,
    Optional,
    Resource,
}

/// An event attendee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub status: AttendeeStatus,
    #[serde(default)]
    pub kind: AttendeeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_guests: Option<u32>,
}

/// The kind of conference entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPointType {
    Video,
    Phone,
}

/// One way of joining a conference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPoint {
    pub entry_point_type: EntryPointType,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Online meeting details attached to an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
    #[serde(default)]
    pub entry_points: Vec<EntryPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Conference {
    /// Returns the first video entry point, if any.
    pub fn video_entry(&self) -> Option<&EntryPoint> {
        self.entry_points
            .iter()
            .find(|e| e.entry_point_type == EntryPointType::Video)
    }
}

/// A zone name as the provider sent it, plus the IANA zone it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeZoneName {
    pub raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed: Option<String>,
}

/// Provider-specific data carried through normalization untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum EventMetadata {
    #[serde(rename_all = "camelCase")]
    Google {
        /// Raw recurrence lines, never parsed.
        #[serde(default)]
        recurrence_rules: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        recurring_event_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Microsoft {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        original_start_time_zone: Option<TimeZoneName>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        original_end_time_zone: Option<TimeZoneName>,
    },
}

/// A calendar event in the internal model.
///
/// Start and end are either both plain dates (all-day, end exclusive) or
/// both timed. See [`CalendarEvent::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub provider_id: ProviderId,
    pub account_id: String,
    pub calendar_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    pub all_day: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference: Option<Conference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<EventMetadata>,
}

impl CalendarEvent {
    /// Creates an event with the required fields; `all_day` follows `start`.
    pub fn new(
        provider_id: ProviderId,
        key: EventKey,
        title: impl Into<String>,
        start: EventTime,
        end: EventTime,
    ) -> Self {
        Self {
            id: key.id,
            provider_id,
            account_id: key.account_id,
            calendar_id: key.calendar_id,
            title: title.into(),
            description: None,
            location: None,
            color: None,
            status: None,
            url: None,
            all_day: start.is_all_day(),
            start,
            end,
            recurrence: None,
            attendees: Vec::new(),
            conference: None,
            metadata: None,
        }
    }

    /// Returns the layout identity of this event.
    pub fn key(&self) -> EventKey {
        EventKey::new(&self.account_id, &self.calendar_id, &self.id)
    }

    /// Returns true if the event is cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("cancelled"))
    }

    /// Duration between start and end; whole days for all-day events.
    pub fn duration(&self) -> Duration {
        match (&self.start, &self.end) {
            (EventTime::Date(s), EventTime::Date(e)) => e.signed_duration_since(*s),
            (s, e) => match (s.to_instant(), e.to_instant()) {
                (Some(s), Some(e)) => e - s,
                _ => Duration::zero(),
            },
        }
    }

    /// Checks the boundary invariants.
    ///
    /// Plain dates are never mixed with timed values, the `all_day` flag
    /// matches the boundary kinds, and the end comes strictly after the
    /// start. All-day ends are exclusive, so a one-day event ends on the
    /// following date.
    pub fn validate(&self) -> TimeResult<()> {
        validate_bounds(&self.start, &self.end, self.all_day)
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set the recurrence.
    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    /// Builder method to add an attendee.
    pub fn with_attendee(mut self, attendee: Attendee) -> Self {
        self.attendees.push(attendee);
        self
    }

    /// Builder method to set the conference.
    pub fn with_conference(mut self, conference: Conference) -> Self {
        self.conference = Some(conference);
        self
    }

    /// Builder method to set provider metadata.
    pub fn with_metadata(mut self, metadata: EventMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

pub(crate) fn validate_bounds(start: &EventTime, end: &EventTime, all_day: bool) -> TimeResult<()> {
    if start.is_all_day() != end.is_all_day() {
        return Err(TimeError::MixedBoundaries {
            start: start.kind(),
            end: end.kind(),
        });
    }
    if start.is_all_day() != all_day {
        return Err(TimeError::AllDayMismatch {
            all_day,
            kind: start.kind(),
        });
    }

    let ordered = match (start, end) {
        (EventTime::Date(s), EventTime::Date(e)) => e > s,
        _ => match (start.to_instant(), end.to_instant()) {
            (Some(s), Some(e)) => e > s,
            _ => false,
        },
    };
    if !ordered {
        return Err(TimeError::EndNotAfterStart {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(())
}

/// A temporary event that exists only until it is saved or dismissed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftEvent {
    pub id: String,
    pub title: String,
    pub start: EventTime,
    pub end: EventTime,
    pub all_day: bool,
}

impl DraftEvent {
    /// Creates a draft with a fresh temporary id.
    pub fn new(start: EventTime, end: EventTime) -> Self {
        Self {
            id: new_draft_id(),
            title: String::new(),
            all_day: start.is_all_day(),
            start,
            end,
        }
    }

    /// Creates an all-day draft covering exactly `day`.
    pub fn all_day_on(day: NaiveDate) -> TimeResult<Self> {
        let end = day.succ_opt().ok_or(TimeError::OutOfRange)?;
        Ok(Self::new(EventTime::Date(day), EventTime::Date(end)))
    }

    /// Creates a timed draft starting at `start` with the default duration.
    ///
    /// The duration is rounded to the 15-minute snap step.
    pub fn timed(start: EventTime, settings: &CalendarSettings) -> TimeResult<Self> {
        if start.is_all_day() {
            return Err(TimeError::AllDayMismatch {
                all_day: false,
                kind: start.kind(),
            });
        }
        let end = start.checked_add(settings.snapped_default_duration())?;
        Ok(Self::new(start, end))
    }

    /// Builder method to set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn validate(&self) -> TimeResult<()> {
        validate_bounds(&self.start, &self.end, self.all_day)
    }

    /// Turns the draft into a saved event with a real identity.
    pub fn promote(self, provider_id: ProviderId, key: EventKey) -> CalendarEvent {
        let mut event = CalendarEvent::new(provider_id, key, self.title, self.start, self.end);
        event.all_day = self.all_day;
        event
    }
}

fn new_draft_id() -> String {
    format!("{}{}", DRAFT_ID_PREFIX, Uuid::new_v4())
}

/// The currently selected event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "event", rename_all = "snake_case")]
pub enum SelectedEvent {
    Draft(DraftEvent),
    Saved(CalendarEvent),
}

impl SelectedEvent {
    pub fn id(&self) -> &str {
        match self {
            Self::Draft(d) => &d.id,
            Self::Saved(e) => &e.id,
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, Self::Draft(_))
    }
}
