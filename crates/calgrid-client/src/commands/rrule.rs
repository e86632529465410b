//! `calgrid rrule`: encode a recurrence as an RRULE line.

use std::io::Write;

use calgrid_core::Recurrence;
use tracing::warn;

use super::parse_one;
use crate::error::ClientResult;

/// Encodes the recurrence in `input`.
///
/// Encoding never fails; a recurrence an editor would reject is still
/// encoded, with a warning.
pub fn encode(input: &str) -> ClientResult<String> {
    let recurrence: Recurrence = parse_one(input)?;
    if let Err(err) = recurrence.validate() {
        warn!(error = %err, "encoding a recurrence that does not validate");
    }
    Ok(recurrence.to_rrule())
}

pub fn run<W: Write>(input: &str, out: &mut W) -> ClientResult<()> {
    writeln!(out, "{}", encode(input)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_full_rule() {
        let input = r#"{
            "frequency": "monthly",
            "interval": 2,
            "until": {"type": "instant", "value": "2025-12-31T23:59:59.500Z"},
            "byDay": ["MO", "FR"],
            "byMonthDay": [1, 15]
        }"#;
        assert_eq!(
            encode(input).unwrap(),
            "RRULE:FREQ=MONTHLY;INTERVAL=2;UNTIL=20251231T235959Z;BYDAY=MO,FR;BYMONTHDAY=1,15"
        );
    }

    #[test]
    fn empty_object_uses_defaults() {
        let mut out = Vec::new();
        run("{}", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "RRULE:FREQ=DAILY;INTERVAL=1\n");
    }

    #[test]
    fn invalid_rule_still_encodes() {
        assert_eq!(
            encode(r#"{"interval": 0, "count": 0}"#).unwrap(),
            "RRULE:FREQ=DAILY;INTERVAL=1"
        );
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(encode(r#"{"frequency": "hourly"}"#).is_err());
    }
}
