// Upstream timestamp parsing
//
// The monitoring API is not consistent about timestamp shapes: alarm and event
// endpoints send zone-less local times with a fractional part, the logged
// values endpoint sends zone-less second precision, and some deployments send
// RFC 3339 instead. Zone-less values are taken as UTC.
use chrono::{DateTime, NaiveDateTime, ParseError, Utc};

const FRACTIONAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePrecision {
    /// `YYYY-MM-DDTHH:MM:SS[.ffffff]`
    Fractional,
    /// `YYYY-MM-DDTHH:MM:SS`
    Seconds,
}

impl TimePrecision {
    fn format(self) -> &'static str {
        match self {
            TimePrecision::Fractional => FRACTIONAL_FORMAT,
            TimePrecision::Seconds => SECONDS_FORMAT,
        }
    }
}

/// Parse a zone-less upstream timestamp, falling back to RFC 3339.
pub fn parse_instant(raw: &str, precision: TimePrecision) -> Result<DateTime<Utc>, ParseError> {
    let raw = raw.trim();
    match NaiveDateTime::parse_from_str(raw, precision.format()) {
        Ok(naive) => Ok(naive.and_utc()),
        Err(_) => DateTime::parse_from_rfc3339(raw).map(|t| t.with_timezone(&Utc)),
    }
}

/// Like [`parse_instant`], but an empty string is a valid "unset" value.
pub fn parse_optional_instant(
    raw: &str,
    precision: TimePrecision,
) -> Result<Option<DateTime<Utc>>, ParseError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_instant(raw, precision).map(Some)
}
