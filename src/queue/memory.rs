//! In-process queue backend
//!
//! `MemoryQueue` mirrors the two Redis shapes the pipeline reads:
//! - a hash map per queue id (timestamp field -> status value)
//! - a list per queue id, pushed at the head by producers and popped from the
//!   tail, so pops return the oldest element first
//!
//! Handles are cheap clones sharing the same store, which lets a test act as
//! producer while a pipeline run consumes.

use crate::core::sync::lock_or;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::traits::QueueSource;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct StoredQueue {
    fields: HashMap<String, String>,
    list: VecDeque<String>,
}

#[derive(Debug, Default)]
struct Shared {
    queues: Mutex<HashMap<String, StoredQueue>>,
    /// Woken whenever a list element is pushed
    arrivals: Notify,
    /// Simulates a lost connection to the store
    unavailable: AtomicBool,
}

/// Shared in-memory queue store
#[derive(Debug, Clone, Default)]
pub struct MemoryQueue {
    shared: Arc<Shared>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Producer side of hash-map mode: set one field
    pub fn insert_field(
        &self,
        queue_id: &str,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> QueueResult<()> {
        let mut queues = self.lock()?;
        queues
            .entry(queue_id.to_string())
            .or_default()
            .fields
            .insert(field.into(), value.into());
        Ok(())
    }

    /// Producer side of list mode: push one element at the head
    pub fn push_entry(&self, queue_id: &str, entry: impl Into<String>) -> QueueResult<()> {
        {
            let mut queues = self.lock()?;
            queues
                .entry(queue_id.to_string())
                .or_default()
                .list
                .push_front(entry.into());
        }
        self.shared.arrivals.notify_waiters();
        Ok(())
    }

    /// Number of hash-map fields currently stored under `queue_id`
    pub fn field_count(&self, queue_id: &str) -> usize {
        self.lock()
            .map(|queues| queues.get(queue_id).map_or(0, |q| q.fields.len()))
            .unwrap_or(0)
    }

    /// Number of list elements currently stored under `queue_id`
    pub fn list_len(&self, queue_id: &str) -> usize {
        self.lock()
            .map(|queues| queues.get(queue_id).map_or(0, |q| q.list.len()))
            .unwrap_or(0)
    }

    /// Make every following operation fail as if the store went away
    pub fn set_unavailable(&self, unavailable: bool) {
        self.shared.unavailable.store(unavailable, Ordering::Release);
    }

    fn lock(&self) -> QueueResult<std::sync::MutexGuard<'_, HashMap<String, StoredQueue>>> {
        lock_or(self.shared.queues.lock(), |message| QueueError::Internal { message })
    }

    fn check_available(&self) -> QueueResult<()> {
        if self.shared.unavailable.load(Ordering::Acquire) {
            return Err(QueueError::Connection {
                target: "memory".to_string(),
                message: "store is unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn try_pop(&self, queue_id: &str) -> QueueResult<Option<String>> {
        self.check_available()?;
        let mut queues = self.lock()?;
        Ok(queues.get_mut(queue_id).and_then(|q| q.list.pop_back()))
    }
}

#[async_trait]
impl QueueSource for MemoryQueue {
    async fn drain_snapshot(&mut self, queue_id: &str) -> QueueResult<HashMap<String, String>> {
        self.check_available()?;
        let mut queues = self.lock()?;
        let fields = queues
            .get_mut(queue_id)
            .map(|q| std::mem::take(&mut q.fields))
            .unwrap_or_default();
        log::debug!("Drained {} fields from memory queue '{}'", fields.len(), queue_id);
        Ok(fields)
    }

    async fn pop_with_timeout(
        &mut self,
        queue_id: &str,
        timeout: Duration,
    ) -> QueueResult<Option<String>> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            // Register interest before looking, so a push between the check
            // and the wait still wakes us.
            let notified = self.shared.arrivals.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(entry) = self.try_pop(queue_id)? {
                return Ok(Some(entry));
            }

            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return Ok(None);
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
