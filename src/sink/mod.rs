//! Metrics sinks
//!
//! Decoded events leave the pipeline as gauge lines in the plaintext
//! time-series protocol:
//!
//! ```text
//! local.home.sync 1 1577836800\n
//! ```
//!
//! [`MetricsSink`] is the capability the pipeline depends on; [`GraphiteSink`]
//! speaks the protocol over TCP and [`RecordingSink`] keeps lines in memory.

mod error;
pub mod graphite;
mod message;
mod recording;
mod traits;

pub use error::{DeliveryError, DeliveryResult};
pub use graphite::GraphiteSink;
pub use message::{GaugeAck, GaugeMessage};
pub use recording::RecordingSink;
pub use traits::MetricsSink;

#[cfg(test)]
mod tests;
