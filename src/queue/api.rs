//! Public API for the queue backends
//!
//! External modules should import from here rather than directly from the
//! backend modules.

pub use crate::queue::error::{QueueError, QueueResult};
pub use crate::queue::memory::MemoryQueue;
pub use crate::queue::redis_store::RedisQueue;
pub use crate::queue::traits::QueueSource;
