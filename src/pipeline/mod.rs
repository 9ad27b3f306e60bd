//! Queue to metrics pipeline
//!
//! A run reads light events from a queue, decodes them and delivers one gauge
//! per event to the metrics sink. Three strategies share the same decode and
//! delivery primitives and differ only in how they schedule them:
//!
//! ```text
//! bulk-sync        drain map ──> decode all ──> one connection, N lines
//! bulk-concurrent  drain map ──> decode all ──> N concurrent connections
//! streaming        pop ─> decode ─> spawn delivery ─> pop ... until empty
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use lightsync::pipeline::{Pipeline, PipelineSettings, Strategy};
//! use lightsync::queue::MemoryQueue;
//! use lightsync::sink::RecordingSink;
//! use std::sync::Arc;
//!
//! let mut queue = MemoryQueue::new();
//! queue.push_entry("list_home", "2020-01-01 00:00:00,1")?;
//!
//! let sink = Arc::new(RecordingSink::new());
//! let pipeline = Pipeline::new(
//!     Strategy::Streaming,
//!     PipelineSettings::for_strategy(Strategy::Streaming),
//!     sink.clone(),
//! );
//! let report = pipeline.run(&mut queue).await?;
//! assert_eq!(report.delivered, 1);
//! # Ok(())
//! # }
//! ```

mod error;
mod report;
mod runner;
mod state;
mod strategy;
mod stream;

pub use error::{PipelineError, PipelineResult};
pub use report::RunReport;
pub use runner::{Pipeline, PipelineSettings};
pub use state::{RunState, RunTracker};
pub use strategy::Strategy;
pub use stream::{EventStream, Pulled};

#[cfg(test)]
mod tests;
