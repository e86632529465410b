//! Microsoft Graph event mapping.

use calgrid_core::time::parse_naive_datetime;
use calgrid_core::{
    Attendee, AttendeeKind, AttendeeStatus, CalendarEvent, Conference, EntryPoint, EntryPointType,
    EventMetadata, EventTime, ProviderId, TimeZoneName, ZonedDateTime,
};
use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::debug;

use super::recurrence::{from_patterned, to_patterned};
use super::timezones::{is_utc, resolve_time_zone};
use super::types::{
    MicrosoftAttendee, MicrosoftDateTimeZone, MicrosoftEmailAddress, MicrosoftEvent,
    MicrosoftEventWrite, MicrosoftItemBody, MicrosoftLocation, MicrosoftOnlineMeeting,
};
use crate::error::{ProviderError, ProviderResult};
use crate::provider::{EventMapper, MappingContext};

const WALL_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const UTC_NAME: &str = "UTC";

/// Maps Microsoft Graph payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicrosoftMapper;

impl EventMapper for MicrosoftMapper {
    type Payload = MicrosoftEvent;
    type WritePayload = MicrosoftEventWrite;

    fn provider_id(&self) -> ProviderId {
        ProviderId::Microsoft
    }

    fn normalize(&self, ctx: &MappingContext, payload: &MicrosoftEvent) -> ProviderResult<CalendarEvent> {
        let id = payload
            .id
            .clone()
            .ok_or_else(|| ProviderError::missing_field("id"))?;
        let start = payload
            .start
            .as_ref()
            .ok_or_else(|| ProviderError::missing_field("start"))?;
        let end = payload
            .end
            .as_ref()
            .ok_or_else(|| ProviderError::missing_field("end"))?;

        let mut event = CalendarEvent::new(
            ProviderId::Microsoft,
            ctx.key(id),
            payload.subject.clone().unwrap_or_default(),
            parse_date_time(start, payload.is_all_day)?,
            parse_date_time(end, payload.is_all_day)?,
        );
        event.all_day = payload.is_all_day;
        event.validate()?;

        event.description = payload
            .body
            .as_ref()
            .and_then(|b| b.content.clone())
            .filter(|c| !c.is_empty())
            .or_else(|| payload.body_preview.clone());
        event.location = payload
            .location
            .as_ref()
            .and_then(|l| l.display_name.clone())
            .filter(|l| !l.is_empty());
        event.status = if payload.is_cancelled {
            Some("cancelled".to_string())
        } else {
            payload.show_as.clone()
        };
        event.url = payload.web_link.clone();
        event.attendees = payload.attendees.iter().map(parse_attendee).collect();
        event.conference = payload
            .online_meeting
            .as_ref()
            .map(|m| parse_online_meeting(m, payload.online_meeting_provider.as_deref()));
        event.recurrence = payload.recurrence.as_ref().map(from_patterned).transpose()?;

        let original_start_time_zone =
            zone_name(start.time_zone.as_deref(), payload.original_start_time_zone.as_deref());
        let original_end_time_zone =
            zone_name(end.time_zone.as_deref(), payload.original_end_time_zone.as_deref());
        if original_start_time_zone.is_some() || original_end_time_zone.is_some() {
            event.metadata = Some(EventMetadata::Microsoft {
                original_start_time_zone,
                original_end_time_zone,
            });
        }

        debug!(id = %event.id, start = %event.start, "normalized microsoft event");
        Ok(event)
    }

    fn denormalize(&self, event: &CalendarEvent) -> ProviderResult<MicrosoftEventWrite> {
        event.validate()?;

        let (raw_start, raw_end) = match event.metadata {
            Some(EventMetadata::Microsoft {
                ref original_start_time_zone,
                ref original_end_time_zone,
            }) => (original_start_time_zone.as_ref(), original_end_time_zone.as_ref()),
            _ => (None, None),
        };
        let start = to_date_time(&event.start, raw_start);
        let end = to_date_time(&event.end, raw_end);

        let recurrence = match event.recurrence {
            Some(ref recurrence) => {
                let (date, tz) = series_start(&event.start);
                Some(to_patterned(recurrence, date, start.time_zone.as_deref(), tz)?)
            }
            None => None,
        };

        Ok(MicrosoftEventWrite {
            subject: event.title.clone(),
            body: event.description.as_ref().map(|content| MicrosoftItemBody {
                content_type: Some("text".to_string()),
                content: Some(content.clone()),
            }),
            start,
            end,
            is_all_day: event.all_day,
            location: event.location.as_ref().map(|name| MicrosoftLocation {
                display_name: Some(name.clone()),
            }),
            attendees: event.attendees.iter().map(to_attendee).collect(),
            recurrence,
        })
    }

    fn is_cancelled(&self, payload: &MicrosoftEvent) -> bool {
        payload.is_cancelled
    }
}

/// Parses a Graph `dateTimeTimeZone` into an [`EventTime`].
///
/// All-day values keep only the date part. A missing or UTC zone yields an
/// instant; any other zone is resolved (IANA first, then Windows names)
/// and the wall time is placed in it.
pub fn parse_date_time(value: &MicrosoftDateTimeZone, all_day: bool) -> ProviderResult<EventTime> {
    let naive = parse_naive_datetime(value.date_time.trim())?;
    if all_day {
        return Ok(EventTime::Date(naive.date()));
    }
    match value.time_zone.as_deref().map(str::trim) {
        None | Some("") => Ok(EventTime::Instant(naive.and_utc())),
        Some(name) if is_utc(name) => Ok(EventTime::Instant(naive.and_utc())),
        Some(name) => {
            let tz = resolve_time_zone(name)?;
            Ok(EventTime::Zoned(ZonedDateTime::from_local(naive, tz)))
        }
    }
}

/// Serializes an [`EventTime`] as Graph wall time.
///
/// `raw` is the zone name recorded at normalization. It is written back
/// when it still resolves to the event's zone, so Windows names survive a
/// round trip.
pub fn to_date_time(value: &EventTime, raw: Option<&TimeZoneName>) -> MicrosoftDateTimeZone {
    match value {
        EventTime::Date(d) => MicrosoftDateTimeZone::new(wall_time(d.and_time(chrono::NaiveTime::MIN)), UTC_NAME),
        EventTime::Instant(dt) => MicrosoftDateTimeZone::new(wall_time(dt.naive_utc()), UTC_NAME),
        EventTime::Zoned(z) => {
            let name = raw
                .filter(|n| resolve_time_zone(&n.raw).ok() == Some(z.time_zone))
                .map(|n| n.raw.clone())
                .unwrap_or_else(|| z.time_zone_id().to_string());
            MicrosoftDateTimeZone::new(wall_time(z.naive_local()), name)
        }
    }
}

fn wall_time(naive: chrono::NaiveDateTime) -> String {
    naive.format(WALL_TIME_FORMAT).to_string()
}

/// Local date and zone a recurrence series starts from.
fn series_start(start: &EventTime) -> (NaiveDate, Tz) {
    match start {
        EventTime::Date(d) => (*d, Tz::UTC),
        EventTime::Instant(dt) => (dt.date_naive(), Tz::UTC),
        EventTime::Zoned(z) => (z.naive_local().date(), z.time_zone),
    }
}

/// Records the zone a boundary was expressed in.
///
/// The boundary's own zone wins unless it is UTC, in which case the
/// event-level `originalStartTimeZone`/`originalEndTimeZone` is kept.
fn zone_name(boundary: Option<&str>, original: Option<&str>) -> Option<TimeZoneName> {
    let raw = boundary
        .map(str::trim)
        .filter(|n| !n.is_empty() && !is_utc(n))
        .or_else(|| original.map(str::trim).filter(|n| !n.is_empty()))?;
    Some(TimeZoneName {
        raw: raw.to_string(),
        parsed: resolve_time_zone(raw).ok().map(|tz| tz.name().to_string()),
    })
}

fn parse_attendee(a: &MicrosoftAttendee) -> Attendee {
    let status = match a.status.as_ref().and_then(|s| s.response.as_deref()) {
        Some("accepted") | Some("organizer") => AttendeeStatus::Accepted,
        Some("tentativelyAccepted") => AttendeeStatus::Tentative,
        Some("declined") => AttendeeStatus::Declined,
        _ => AttendeeStatus::Unknown,
    };
    let kind = match a.kind.as_deref() {
        Some("optional") => AttendeeKind::Optional,
        Some("resource") => AttendeeKind::Resource,
        _ => AttendeeKind::Required,
    };
    let email = a.email_address.as_ref();
    Attendee {
        email: email.and_then(|e| e.address.clone()),
        name: email.and_then(|e| e.name.clone()),
        status,
        kind,
        comment: None,
        additional_guests: None,
    }
}

fn to_attendee(a: &Attendee) -> MicrosoftAttendee {
    let kind = match a.kind {
        AttendeeKind::Required => "required",
        AttendeeKind::Optional => "optional",
        AttendeeKind::Resource => "resource",
    };
    MicrosoftAttendee {
        email_address: Some(MicrosoftEmailAddress {
            name: a.name.clone(),
            address: a.email.clone(),
        }),
        // Graph sets response status itself.
        status: None,
        kind: Some(kind.to_string()),
    }
}

fn parse_online_meeting(meeting: &MicrosoftOnlineMeeting, provider: Option<&str>) -> Conference {
    let video = meeting.join_url.iter().map(|url| EntryPoint {
        entry_point_type: EntryPointType::Video,
        uri: url.clone(),
        meeting_code: meeting.conference_id.clone(),
        password: None,
    });
    let phones = meeting
        .toll_number
        .iter()
        .chain(meeting.phones.iter().filter_map(|p| p.number.as_ref()))
        .map(|number| EntryPoint {
            entry_point_type: EntryPointType::Phone,
            uri: format!("tel:{}", number.replace(' ', "")),
            meeting_code: meeting.conference_id.clone(),
            password: None,
        });

    let mut entry_points: Vec<EntryPoint> = Vec::new();
    for ep in video.chain(phones) {
        if !entry_points.iter().any(|e| e.uri == ep.uri) {
            entry_points.push(ep);
        }
    }

    Conference {
        conference_id: meeting.conference_id.clone(),
        name: provider.map(str::to_string),
        icon_uri: None,
        key_type: provider.map(str::to_string),
        entry_points,
        notes: None,
    }
}
