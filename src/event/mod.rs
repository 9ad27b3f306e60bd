//! Light status events and their queue wire formats
//!
//! An [`Event`] is a single on/off change of a light together with the moment
//! it happened. Producers write events to the queue in one of two textual
//! forms, and the [`codec`] module turns those back into typed values:
//!
//! - hash-map mode: field `"2020-01-01 00:00:00"`, value `"1"`
//! - list mode: element `"2020-01-01 00:00:00,1"`

pub mod codec;
mod error;

pub use codec::{
    decode, decode_entry, decode_field, encode, encode_field, RawEntry, TIMESTAMP_FORMAT,
};
pub use error::{DecodeError, DecodeErrorKind, DecodeResult};

use chrono::NaiveDateTime;

/// A light status change
///
/// Timestamps carry second precision and no timezone; they are interpreted as
/// UTC when converted to epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Event {
    pub occurred_at: NaiveDateTime,
    pub status: bool,
}

impl Event {
    pub fn new(occurred_at: NaiveDateTime, status: bool) -> Self {
        Self {
            occurred_at,
            status,
        }
    }

    /// Seconds since the Unix epoch, reading `occurred_at` as UTC
    pub fn epoch_seconds(&self) -> i64 {
        self.occurred_at.and_utc().timestamp()
    }

    /// Gauge value for the status: 1 for on, 0 for off
    pub fn gauge_value(&self) -> u8 {
        u8::from(self.status)
    }
}

#[cfg(test)]
mod tests;
