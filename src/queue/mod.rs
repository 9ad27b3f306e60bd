//! Queue backends feeding the pipeline
//!
//! Light events wait in a durable store until a pipeline run takes them. The
//! store is read in one of two ways:
//!
//! - **drain snapshot**: take the whole hash map at once and clear it
//! - **pop with timeout**: take the oldest list element, waiting a bounded
//!   time for one to arrive
//!
//! ```text
//!  producers ──HSET──▶ ┌──────────────┐ ──HGETALL+DEL──▶ bulk pipelines
//!                      │  queue store │
//!  producers ──LPUSH─▶ └──────────────┘ ──BRPOP───────▶ streaming pipeline
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use lightsync::queue::{MemoryQueue, QueueSource};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut queue = MemoryQueue::new();
//! queue.push_entry("list_home", "2020-01-01 00:00:00,1")?;
//!
//! while let Some(entry) = queue
//!     .pop_with_timeout("list_home", Duration::from_millis(10))
//!     .await?
//! {
//!     println!("popped {}", entry);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
mod error;
mod memory;
mod redis_store;
mod traits;

pub use error::{QueueError, QueueResult};
pub use memory::MemoryQueue;
pub use redis_store::RedisQueue;
pub use traits::QueueSource;

#[cfg(test)]
mod tests;
