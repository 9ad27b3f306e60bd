//! Gauge wire messages

use crate::event::Event;
use std::fmt;

/// One gauge sample in the plaintext line protocol
///
/// Serialises as `"<metric_key> <value> <epoch_seconds>\n"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GaugeMessage {
    pub metric_key: String,
    pub value: u8,
    pub epoch_seconds: i64,
}

impl GaugeMessage {
    pub fn new(metric_key: impl Into<String>, epoch_seconds: i64, value: u8) -> Self {
        Self {
            metric_key: metric_key.into(),
            value,
            epoch_seconds,
        }
    }

    /// Gauge for a light event: 1 while on, 0 while off
    pub fn from_event(metric_key: &str, event: &Event) -> Self {
        Self::new(metric_key, event.epoch_seconds(), event.gauge_value())
    }

    /// The newline-terminated protocol line
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for GaugeMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.metric_key, self.value, self.epoch_seconds)
    }
}

/// Acknowledgement of a flushed gauge line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaugeAck {
    pub message: GaugeMessage,
    pub bytes_written: usize,
}
