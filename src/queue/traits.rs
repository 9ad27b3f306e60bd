//! The queue capability used by the pipeline

use crate::queue::QueueResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// A durable store of pending light events
///
/// Methods take `&mut self`: one handle serves one pipeline run and is used
/// sequentially, never for concurrent pops.
#[async_trait]
pub trait QueueSource: Send {
    /// Fetch the whole hash map stored under `queue_id`, then clear it
    ///
    /// Fetch and clear are two separate operations. An entry written by a
    /// producer between them is lost.
    async fn drain_snapshot(&mut self, queue_id: &str) -> QueueResult<HashMap<String, String>>;

    /// Remove and return the oldest list element under `queue_id`
    ///
    /// Waits at most `timeout` for an element to arrive. `Ok(None)` means the
    /// queue is empty for now; it is not an error.
    async fn pop_with_timeout(
        &mut self,
        queue_id: &str,
        timeout: Duration,
    ) -> QueueResult<Option<String>>;

    /// Short backend name for log lines
    fn backend_name(&self) -> &'static str;
}
