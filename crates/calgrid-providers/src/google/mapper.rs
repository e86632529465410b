//! Google event mapping.

use calgrid_core::recurrence::recurrence_lines;
use calgrid_core::time::{format_instant, parse_instant, parse_plain_date, parse_time_zone};
use calgrid_core::{
    Attendee, AttendeeKind, AttendeeStatus, CalendarEvent, Conference, EntryPoint, EntryPointType,
    EventMetadata, EventTime, ProviderId,
};
use tracing::debug;

use super::types::{
    GoogleAttendee, GoogleConferenceData, GoogleEvent, GoogleEventDateTime, GoogleEventWrite,
};
use crate::error::{ProviderError, ProviderResult};
use crate::provider::{EventMapper, MappingContext};

/// Maps Google Calendar payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleMapper;

impl EventMapper for GoogleMapper {
    type Payload = GoogleEvent;
    type WritePayload = GoogleEventWrite;

    fn provider_id(&self) -> ProviderId {
        ProviderId::Google
    }

    fn normalize(&self, ctx: &MappingContext, payload: &GoogleEvent) -> ProviderResult<CalendarEvent> {
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
            ProviderId::Google,
            ctx.key(id),
            payload.summary.clone().unwrap_or_default(),
            parse_date_time(start)?,
            parse_date_time(end)?,
        );
        event.all_day = start.is_all_day();
        event.validate()?;

        event.description = payload.description.clone();
        event.location = payload.location.clone();
        event.color = payload.color_id.clone();
        event.status = payload.status.clone();
        event.url = payload.html_link.clone();
        event.attendees = payload.attendees.iter().map(parse_attendee).collect();
        event.conference = payload.conference_data.as_ref().map(parse_conference);

        if !payload.recurrence.is_empty() || payload.recurring_event_id.is_some() {
            event.metadata = Some(EventMetadata::Google {
                recurrence_rules: payload.recurrence.clone(),
                recurring_event_id: payload.recurring_event_id.clone(),
            });
        }

        debug!(id = %event.id, start = %event.start, "normalized google event");
        Ok(event)
    }

    fn denormalize(&self, event: &CalendarEvent) -> ProviderResult<GoogleEventWrite> {
        event.validate()?;
        Ok(GoogleEventWrite {
            id: Some(event.id.clone()).filter(|id| !id.is_empty()),
            summary: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            color_id: event.color.clone(),
            start: to_date_time(&event.start),
            end: to_date_time(&event.end),
            recurrence: recurrence_lines(event.recurrence.as_ref()),
            attendees: event.attendees.iter().map(to_attendee).collect(),
        })
    }

    fn is_cancelled(&self, payload: &GoogleEvent) -> bool {
        payload.status.as_deref() == Some("cancelled")
    }
}

/// Parses a Google start or end into an [`EventTime`].
///
/// `dateTime` wins over `date`. A `timeZone` turns the instant into a zoned
/// value; its identifier is kept exactly as given.
pub fn parse_date_time(value: &GoogleEventDateTime) -> ProviderResult<EventTime> {
    if let Some(ref date_time) = value.date_time {
        let instant = parse_instant(date_time)?;
        return match value.time_zone.as_deref().map(str::trim) {
            Some(tz) if !tz.is_empty() => {
                let tz = parse_time_zone(tz).map_err(|_| ProviderError::unknown_time_zone(tz))?;
                Ok(EventTime::from_zoned(instant, tz))
            }
            _ => Ok(EventTime::Instant(instant)),
        };
    }
    if let Some(ref date) = value.date {
        return Ok(EventTime::Date(parse_plain_date(date)?));
    }
    Err(ProviderError::invalid_payload(
        "event time has neither 'date' nor 'dateTime'",
    ))
}

/// Serializes an [`EventTime`] into Google's shape.
pub fn to_date_time(value: &EventTime) -> GoogleEventDateTime {
    match value {
        EventTime::Date(d) => GoogleEventDateTime::date(d.format("%Y-%m-%d").to_string()),
        EventTime::Instant(dt) => GoogleEventDateTime::date_time(format_instant(dt), None),
        EventTime::Zoned(z) => GoogleEventDateTime::date_time(
            format_instant(&z.instant),
            Some(z.time_zone_id().to_string()),
        ),
    }
}

fn parse_attendee(a: &GoogleAttendee) -> Attendee {
    let status = match a.response_status.as_deref() {
        Some("accepted") => AttendeeStatus::Accepted,
        Some("tentative") => AttendeeStatus::Tentative,
        Some("declined") => AttendeeStatus::Declined,
        _ => AttendeeStatus::Unknown,
    };
    let kind = if a.resource.unwrap_or(false) {
        AttendeeKind::Resource
    } else if a.optional.unwrap_or(false) {
        AttendeeKind::Optional
    } else {
        AttendeeKind::Required
    };
    Attendee {
        email: a.email.clone(),
        name: a.display_name.clone(),
        status,
        kind,
        comment: a.comment.clone(),
        additional_guests: a.additional_guests,
    }
}

fn to_attendee(a: &Attendee) -> GoogleAttendee {
    let response_status = match a.status {
        AttendeeStatus::Accepted => "accepted",
        AttendeeStatus::Tentative => "tentative",
        AttendeeStatus::Declined => "declined",
        AttendeeStatus::Unknown => "needsAction",
    };
    GoogleAttendee {
        email: a.email.clone(),
        display_name: a.name.clone(),
        response_status: Some(response_status.to_string()),
        optional: (a.kind == AttendeeKind::Optional).then_some(true),
        resource: (a.kind == AttendeeKind::Resource).then_some(true),
        comment: a.comment.clone(),
        additional_guests: a.additional_guests,
    }
}

fn parse_conference(data: &GoogleConferenceData) -> Conference {
    let solution = data.conference_solution.as_ref();
    let entry_points = data
        .entry_points
        .iter()
        .filter_map(|ep| {
            let entry_point_type = match ep.entry_point_type.as_str() {
                "video" => EntryPointType::Video,
                "phone" => EntryPointType::Phone,
                _ => return None,
            };
            Some(EntryPoint {
                entry_point_type,
                uri: ep.uri.clone()?,
                meeting_code: ep.meeting_code.clone(),
                password: ep.passcode.clone().or_else(|| ep.password.clone()),
            })
        })
        .collect();

    Conference {
        conference_id: data.conference_id.clone(),
        name: solution.and_then(|s| s.name.clone()),
        icon_uri: solution.and_then(|s| s.icon_uri.clone()),
        key_type: solution.and_then(|s| s.key.as_ref()).and_then(|k| k.kind.clone()),
        entry_points,
        notes: data.notes.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use calgrid_core::Frequency;
    use calgrid_core::recurrence::{Recurrence, Weekday};
    use chrono::{NaiveDate, TimeZone, Utc};
    use serde_json::json;

    fn ctx() -> MappingContext {
        MappingContext::new("acc-1", "primary")
    }

    fn payload(value: serde_json::Value) -> GoogleEvent {
        serde_json::from_value(value).unwrap()
    }

    mod times {
        use super::*;

        #[test]
        fn all_day_round_trips_verbatim() {
            for raw in ["2025-01-01", "2024-02-29", "1999-12-31"] {
                let t = parse_date_time(&GoogleEventDateTime::date(raw)).unwrap();
                assert!(t.is_all_day());
                assert_eq!(to_date_time(&t).date.as_deref(), Some(raw));
            }
        }

        #[test]
        fn date_time_without_zone_is_instant() {
            let t = parse_date_time(&GoogleEventDateTime::date_time(
                "2025-03-03T09:00:00-05:00",
                None,
            ))
            .unwrap();
            assert_eq!(
                t,
                EventTime::Instant(Utc.with_ymd_and_hms(2025, 3, 3, 14, 0, 0).unwrap())
            );
            assert_eq!(
                to_date_time(&t),
                GoogleEventDateTime::date_time("2025-03-03T14:00:00Z", None)
            );
        }

        #[test]
        fn zone_identifier_is_preserved() {
            for zone in ["America/New_York", "US/Eastern", "Asia/Kolkata", "Etc/GMT+5"] {
                let input = GoogleEventDateTime::date_time("2025-03-03T14:00:00Z", Some(zone.into()));
                let t = parse_date_time(&input).unwrap();
                assert_eq!(t.time_zone().map(|tz| tz.name()), Some(zone));
                assert_eq!(to_date_time(&t), input);
            }
        }

        #[test]
        fn date_time_wins_over_date() {
            let t = parse_date_time(&GoogleEventDateTime {
                date: Some("2025-03-03".into()),
                date_time: Some("2025-03-03T14:00:00Z".into()),
                time_zone: None,
            })
            .unwrap();
            assert!(!t.is_all_day());
        }

        #[test]
        fn errors() {
            let err = parse_date_time(&GoogleEventDateTime::default()).unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::InvalidPayload);

            let err = parse_date_time(&GoogleEventDateTime::date_time(
                "2025-03-03T14:00:00Z",
                Some("Mars/Olympus".into()),
            ))
            .unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::UnknownTimeZone);

            let err = parse_date_time(&GoogleEventDateTime::date("03/03/2025")).unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::InvalidTime);
        }
    }

    mod normalize {
        use super::*;

        #[test]
        fn full_event() {
            let p = payload(json!({
                "id": "abc123",
                "status": "confirmed",
                "summary": "Planning",
                "description": "Quarterly planning",
                "location": "Room 4",
                "colorId": "5",
                "htmlLink": "https://calendar.google.com/event?eid=abc123",
                "start": {"dateTime": "2025-03-03T09:00:00-05:00", "timeZone": "America/New_York"},
                "end": {"dateTime": "2025-03-03T10:00:00-05:00", "timeZone": "America/New_York"},
                "recurrence": ["RRULE:FREQ=WEEKLY;BYDAY=MO", "EXDATE;TZID=America/New_York:20250310T090000"],
                "attendees": [
                    {"email": "ana@example.com", "displayName": "Ana", "responseStatus": "accepted"},
                    {"email": "room@example.com", "resource": true, "responseStatus": "needsAction"},
                    {"email": "bo@example.com", "optional": true, "responseStatus": "tentative", "comment": "maybe", "additionalGuests": 1}
                ],
                "conferenceData": {
                    "conferenceId": "aaa-bbbb-ccc",
                    "conferenceSolution": {"name": "Google Meet", "iconUri": "https://meet/icon.png", "key": {"type": "hangoutsMeet"}},
                    "entryPoints": [
                        {"entryPointType": "video", "uri": "https://meet.google.com/aaa-bbbb-ccc", "meetingCode": "aaa-bbbb-ccc"},
                        {"entryPointType": "phone", "uri": "tel:+1-555-0100", "pin": "123"},
                        {"entryPointType": "more", "uri": "https://tel.meet/aaa"}
                    ]
                }
            }));

            let event = GoogleMapper.normalize(&ctx(), &p).unwrap();
            assert_eq!(event.key().to_string(), "acc-1/primary/abc123");
            assert!(!event.all_day);
            assert_eq!(event.color.as_deref(), Some("5"));
            assert_eq!(event.attendees.len(), 3);
            assert_eq!(event.attendees[1].kind, AttendeeKind::Resource);
            assert_eq!(event.attendees[1].status, AttendeeStatus::Unknown);
            assert_eq!(event.attendees[2].kind, AttendeeKind::Optional);
            assert_eq!(event.attendees[2].additional_guests, Some(1));

            let conference = event.conference.as_ref().unwrap();
            assert_eq!(conference.entry_points.len(), 2);
            assert_eq!(conference.key_type.as_deref(), Some("hangoutsMeet"));
            assert_eq!(
                conference.video_entry().map(|e| e.uri.as_str()),
                Some("https://meet.google.com/aaa-bbbb-ccc")
            );

            assert_eq!(
                event.metadata,
                Some(EventMetadata::Google {
                    recurrence_rules: vec![
                        "RRULE:FREQ=WEEKLY;BYDAY=MO".into(),
                        "EXDATE;TZID=America/New_York:20250310T090000".into(),
                    ],
                    recurring_event_id: None,
                })
            );
            assert!(event.recurrence.is_none());
        }

        #[test]
        fn all_day_event() {
            let p = payload(json!({
                "id": "holiday",
                "summary": "Holiday",
                "start": {"date": "2025-12-25"},
                "end": {"date": "2025-12-26"}
            }));
            let event = GoogleMapper.normalize(&ctx(), &p).unwrap();
            assert!(event.all_day);
            assert_eq!(
                event.start,
                EventTime::Date(NaiveDate::from_ymd_opt(2025, 12, 25).unwrap())
            );
            assert!(event.metadata.is_none());
        }

        #[test]
        fn missing_title_is_empty() {
            let p = payload(json!({
                "id": "x",
                "start": {"date": "2025-12-25"},
                "end": {"date": "2025-12-26"}
            }));
            assert_eq!(GoogleMapper.normalize(&ctx(), &p).unwrap().title, "");
        }

        #[test]
        fn rejects_bad_payloads() {
            let p = payload(json!({"start": {"date": "2025-12-25"}, "end": {"date": "2025-12-26"}}));
            assert_eq!(
                GoogleMapper.normalize(&ctx(), &p).unwrap_err().code(),
                ProviderErrorCode::MissingField
            );

            let p = payload(json!({
                "id": "mixed",
                "start": {"date": "2025-12-25"},
                "end": {"dateTime": "2025-12-25T10:00:00Z"}
            }));
            assert_eq!(
                GoogleMapper.normalize(&ctx(), &p).unwrap_err().code(),
                ProviderErrorCode::InvalidTime
            );

            let p = payload(json!({
                "id": "backwards",
                "start": {"dateTime": "2025-12-25T10:00:00Z"},
                "end": {"dateTime": "2025-12-25T09:00:00Z"}
            }));
            assert_eq!(
                GoogleMapper.normalize(&ctx(), &p).unwrap_err().code(),
                ProviderErrorCode::InvalidTime
            );
        }

        #[test]
        fn cancelled() {
            let p = payload(json!({"id": "x", "status": "cancelled"}));
            assert!(GoogleMapper.is_cancelled(&p));
            assert!(!GoogleMapper.is_cancelled(&GoogleEvent::default()));
        }
    }

    mod denormalize {
        use super::*;

        #[test]
        fn write_payload() {
            let p = payload(json!({
                "id": "abc123",
                "summary": "Planning",
                "location": "Room 4",
                "start": {"dateTime": "2025-03-03T09:00:00-05:00", "timeZone": "US/Eastern"},
                "end": {"dateTime": "2025-03-03T10:00:00-05:00", "timeZone": "US/Eastern"},
                "attendees": [{"email": "ana@example.com", "responseStatus": "declined"}]
            }));
            let event = GoogleMapper
                .normalize(&ctx(), &p)
                .unwrap()
                .with_recurrence(
                    Recurrence::new(Frequency::Weekly)
                        .with_interval(2)
                        .with_by_day([Weekday::Monday, Weekday::Wednesday]),
                );
            let write = GoogleMapper.denormalize(&event).unwrap();

            insta::assert_json_snapshot!(write, @r#"
            {
              "id": "abc123",
              "summary": "Planning",
              "location": "Room 4",
              "start": {
                "dateTime": "2025-03-03T14:00:00Z",
                "timeZone": "US/Eastern"
              },
              "end": {
                "dateTime": "2025-03-03T15:00:00Z",
                "timeZone": "US/Eastern"
              },
              "recurrence": [
                "RRULE:FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE"
              ],
              "attendees": [
                {
                  "email": "ana@example.com",
                  "responseStatus": "declined"
                }
              ]
            }
            "#);
        }

        #[test]
        fn no_recurrence_is_empty_list() {
            let p = payload(json!({
                "id": "x",
                "summary": "Once",
                "start": {"date": "2025-12-25"},
                "end": {"date": "2025-12-26"}
            }));
            let event = GoogleMapper.normalize(&ctx(), &p).unwrap();
            let write = GoogleMapper.denormalize(&event).unwrap();
            assert!(write.recurrence.is_empty());
            assert_eq!(write.start, GoogleEventDateTime::date("2025-12-25"));
            assert_eq!(write.end, GoogleEventDateTime::date("2025-12-26"));
        }

        #[test]
        fn invalid_event_is_rejected() {
            let p = payload(json!({
                "id": "x",
                "start": {"date": "2025-12-25"},
                "end": {"date": "2025-12-26"}
            }));
            let mut event = GoogleMapper.normalize(&ctx(), &p).unwrap();
            event.all_day = false;
            assert_eq!(
                GoogleMapper.denormalize(&event).unwrap_err().code(),
                ProviderErrorCode::InvalidTime
            );
        }
    }
}
