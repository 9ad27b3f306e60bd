//! Per-run counters

use crate::pipeline::{RunState, Strategy};
use crate::sink::{DeliveryResult, GaugeAck};
use std::fmt;
use std::time::Duration;

/// Summary of one pipeline run
///
/// `raw_seen` counts every entry taken off the queue; each one is either
/// decoded or dropped, and each decoded event is dispatched exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub strategy: Strategy,
    pub queue_id: String,
    pub raw_seen: usize,
    pub decoded: usize,
    pub dispatched: usize,
    pub delivered: usize,
    pub delivery_failures: usize,
    /// Gauge lines whose delivery failed, for replaying them by hand
    pub failed_lines: Vec<String>,
    pub state: RunState,
    pub transitions: Vec<RunState>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn new(strategy: Strategy, queue_id: &str) -> Self {
        Self {
            strategy,
            queue_id: queue_id.to_string(),
            raw_seen: 0,
            decoded: 0,
            dispatched: 0,
            delivered: 0,
            delivery_failures: 0,
            failed_lines: Vec::new(),
            state: RunState::Start,
            transitions: vec![RunState::Start],
            elapsed: Duration::ZERO,
        }
    }

    /// Entries that did not decode
    pub fn decode_drops(&self) -> usize {
        self.raw_seen - self.decoded
    }

    pub fn succeeded(&self) -> bool {
        self.state == RunState::Done
    }

    /// Tally one delivery outcome, logging failures
    pub(crate) fn record_delivery(&mut self, outcome: DeliveryResult<GaugeAck>) {
        self.dispatched += 1;
        match outcome {
            Ok(ack) => {
                log::debug!("Delivered '{}' ({} bytes)", ack.message, ack.bytes_written);
                self.delivered += 1;
            }
            Err(err) => {
                log::warn!("Delivery failed: {}", err);
                self.delivery_failures += 1;
                self.failed_lines.push(err.line().to_string());
            }
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Strategy:          {}", self.strategy)?;
        writeln!(f, "Queue:             {}", self.queue_id)?;
        writeln!(f, "Entries read:      {}", self.raw_seen)?;
        writeln!(f, "Decoded:           {}", self.decoded)?;
        writeln!(f, "Dropped:           {}", self.decode_drops())?;
        writeln!(f, "Dispatched:        {}", self.dispatched)?;
        writeln!(f, "Delivered:         {}", self.delivered)?;
        writeln!(f, "Delivery failures: {}", self.delivery_failures)?;
        writeln!(f, "Final state:       {}", self.state)?;
        write!(f, "Time of execution: {:.3}s", self.elapsed.as_secs_f64())
    }
}
