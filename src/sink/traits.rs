//! The metrics capability used by the pipeline

use crate::sink::{DeliveryResult, GaugeAck, GaugeMessage};
use async_trait::async_trait;

/// A time-series endpoint accepting gauge samples
#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// Deliver one gauge over its own connection
    ///
    /// The connection is opened for this line and closed after the flush,
    /// whether or not the write succeeded. Connections are never pooled.
    async fn gauge(&self, message: &GaugeMessage) -> DeliveryResult<GaugeAck>;

    /// Scatter/gather: one concurrent `gauge` per message
    ///
    /// Results come back in input order, one per message. A failed delivery
    /// never cancels the others.
    async fn bulk_gauge(&self, messages: &[GaugeMessage]) -> Vec<DeliveryResult<GaugeAck>> {
        futures::future::join_all(messages.iter().map(|message| self.gauge(message))).await
    }

    /// Write every message over a single connection, in order
    ///
    /// The default falls back to sequential `gauge` calls for sinks without
    /// a cheaper batched path.
    async fn batch_gauge(&self, messages: &[GaugeMessage]) -> Vec<DeliveryResult<GaugeAck>> {
        let mut results = Vec::with_capacity(messages.len());
        for message in messages {
            results.push(self.gauge(message).await);
        }
        results
    }

    /// Human readable destination for log lines
    fn describe(&self) -> String;
}
