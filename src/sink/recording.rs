//! In-memory sink that records gauge lines instead of sending them
//!
//! Backs `--dry-run` and the pipeline tests. Every `gauge` counts as one
//! connection and every `batch_gauge` as one shared connection, matching what
//! the TCP sink would open.

use crate::core::sync::lock_or;
use crate::sink::{DeliveryError, DeliveryResult, GaugeAck, GaugeMessage, MetricsSink};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Default)]
struct Recorded {
    lines: Vec<String>,
    connections: usize,
    attempts: usize,
    in_flight: usize,
    peak_in_flight: usize,
    failing_keys: HashSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    recorded: Arc<Mutex<Recorded>>,
    latency: Duration,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every delivery, to make overlapping deliveries observable
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Refuse deliveries for `metric_key` with a connection error
    pub fn fail_key(&self, metric_key: &str) {
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.failing_keys.insert(metric_key.to_string());
        }
    }

    /// Delivered lines, newline included, in arrival order
    pub fn lines(&self) -> Vec<String> {
        self.snapshot(|r| r.lines.clone())
    }

    /// Connections that would have been opened
    pub fn connections(&self) -> usize {
        self.snapshot(|r| r.connections)
    }

    /// Delivery attempts, successful or not
    pub fn attempts(&self) -> usize {
        self.snapshot(|r| r.attempts)
    }

    /// Highest number of deliveries observed in progress at once
    pub fn peak_in_flight(&self) -> usize {
        self.snapshot(|r| r.peak_in_flight)
    }

    fn snapshot<T: Default>(&self, read: impl FnOnce(&Recorded) -> T) -> T {
        self.recorded.lock().map(|r| read(&r)).unwrap_or_default()
    }

    fn with_recorded<T>(
        &self,
        line: &GaugeMessage,
        update: impl FnOnce(&mut Recorded) -> T,
    ) -> DeliveryResult<T> {
        let mut recorded = lock_or(self.recorded.lock(), |message| DeliveryError::Task {
            line: line.to_string(),
            message,
        })?;
        Ok(update(&mut recorded))
    }

    fn record(&self, message: &GaugeMessage) -> DeliveryResult<GaugeAck> {
        let refused = self.with_recorded(message, |r| {
            r.attempts += 1;
            let refused = r.failing_keys.contains(&message.metric_key);
            if !refused {
                r.lines.push(message.to_line());
            }
            refused
        })?;

        if refused {
            return Err(DeliveryError::Connection {
                endpoint: self.describe(),
                line: message.to_string(),
                message: "refused by recording sink".to_string(),
            });
        }
        log::info!("[dry-run] {}", message);
        Ok(GaugeAck {
            message: message.clone(),
            bytes_written: message.to_line().len(),
        })
    }

    async fn simulate_latency(&self, message: &GaugeMessage) -> DeliveryResult<()> {
        self.with_recorded(message, |r| {
            r.in_flight += 1;
            r.peak_in_flight = r.peak_in_flight.max(r.in_flight);
        })?;
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.with_recorded(message, |r| r.in_flight -= 1)
    }
}

#[async_trait]
impl MetricsSink for RecordingSink {
    async fn gauge(&self, message: &GaugeMessage) -> DeliveryResult<GaugeAck> {
        self.with_recorded(message, |r| r.connections += 1)?;
        self.simulate_latency(message).await?;
        self.record(message)
    }

    async fn batch_gauge(&self, messages: &[GaugeMessage]) -> Vec<DeliveryResult<GaugeAck>> {
        if let Some(first) = messages.first() {
            if let Err(err) = self.with_recorded(first, |r| r.connections += 1) {
                return messages.iter().map(|_| Err(err.clone())).collect();
            }
        }

        let mut results = Vec::with_capacity(messages.len());
        for message in messages {
            let delivered = match self.simulate_latency(message).await {
                Ok(()) => self.record(message),
                Err(err) => Err(err),
            };
            results.push(delivered);
        }
        results
    }

    fn describe(&self) -> String {
        "recording sink".to_string()
    }
}
