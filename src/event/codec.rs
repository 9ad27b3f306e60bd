//! Conversion between events and their queue wire forms
//!
//! Decoding is pure: every function here is deterministic and keeps no state
//! between calls.

use super::error::{DecodeError, DecodeErrorKind, DecodeResult};
use super::Event;
use chrono::NaiveDateTime;
use std::fmt;

/// The only accepted timestamp layout
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A raw entry as taken off the queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEntry {
    /// One `(field, value)` pair of a hash-map snapshot
    Field { field: String, value: String },
    /// One `"<timestamp>,<status>"` list element
    Combined(String),
}

impl fmt::Display for RawEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawEntry::Field { field, value } => write!(f, "{} => {}", field, value),
            RawEntry::Combined(entry) => write!(f, "{}", entry),
        }
    }
}

/// Decode either raw shape
pub fn decode(raw: &RawEntry) -> DecodeResult<Event> {
    match raw {
        RawEntry::Field { field, value } => decode_field(field, value),
        RawEntry::Combined(entry) => decode_entry(entry),
    }
}

/// Decode a hash-map pair: field is the timestamp, value the status
pub fn decode_field(field: &str, value: &str) -> DecodeResult<Event> {
    let raw = || format!("{} => {}", field, value);
    let occurred_at = parse_timestamp(field).map_err(|detail| {
        DecodeError::new(DecodeErrorKind::BadTimestamp, raw(), detail)
    })?;
    let status = parse_status(value)
        .map_err(|detail| DecodeError::new(DecodeErrorKind::BadStatus, raw(), detail))?;
    Ok(Event::new(occurred_at, status))
}

/// Decode a list element of the form `"<timestamp>,<status>"`
pub fn decode_entry(entry: &str) -> DecodeResult<Event> {
    let mut parts = entry.split(',');
    let (timestamp, status) = match (parts.next(), parts.next(), parts.next()) {
        (Some(timestamp), Some(status), None) => (timestamp, status),
        _ => {
            let fields = entry.split(',').count();
            return Err(DecodeError::new(
                DecodeErrorKind::BadArity,
                entry,
                format!("expected 2 comma-separated fields, found {}", fields),
            ));
        }
    };

    let occurred_at = parse_timestamp(timestamp)
        .map_err(|detail| DecodeError::new(DecodeErrorKind::BadTimestamp, entry, detail))?;
    let status = parse_status(status)
        .map_err(|detail| DecodeError::new(DecodeErrorKind::BadStatus, entry, detail))?;
    Ok(Event::new(occurred_at, status))
}

/// Encode an event as a list element
pub fn encode(event: &Event) -> String {
    format!(
        "{},{}",
        event.occurred_at.format(TIMESTAMP_FORMAT),
        event.gauge_value()
    )
}

/// Encode an event as a hash-map `(field, value)` pair
pub fn encode_field(event: &Event) -> (String, String) {
    (
        event.occurred_at.format(TIMESTAMP_FORMAT).to_string(),
        event.gauge_value().to_string(),
    )
}

fn parse_timestamp(text: &str) -> Result<NaiveDateTime, String> {
    let parsed = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map_err(|e| format!("'{}' does not match YYYY-MM-DD HH:MM:SS: {}", text, e))?;

    // chrono tolerates unpadded fields; the wire format does not
    if parsed.format(TIMESTAMP_FORMAT).to_string() != text {
        return Err(format!(
            "'{}' is not in canonical YYYY-MM-DD HH:MM:SS form",
            text
        ));
    }
    Ok(parsed)
}

fn parse_status(text: &str) -> Result<bool, String> {
    match text {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(format!("'{}' is not 0 or 1", other)),
    }
}
