//! Tests for the pipeline module

mod runner;

use crate::queue::{MemoryQueue, QueueError, QueueResult, QueueSource};
use async_trait::async_trait;
use chrono::{NaiveDate, TimeDelta};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// Timestamp text `offset` seconds after 2020-01-01 00:00:00
pub(super) fn timestamp(offset: i64) -> String {
    let base = NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (base + TimeDelta::seconds(offset))
        .format(crate::event::TIMESTAMP_FORMAT)
        .to_string()
}

/// Fill `queue_id` with `count` well-formed events in the shape the strategy reads
pub(super) fn fill(queue: &MemoryQueue, queue_id: &str, streaming: bool, count: usize) {
    for i in 0..count {
        let status = if i % 2 == 0 { "1" } else { "0" };
        if streaming {
            queue
                .push_entry(queue_id, format!("{},{}", timestamp(i as i64), status))
                .unwrap();
        } else {
            queue.insert_field(queue_id, timestamp(i as i64), status).unwrap();
        }
    }
}

/// Queue that replays a fixed sequence of pop outcomes
pub(super) struct ScriptedQueue {
    pops: VecDeque<QueueResult<Option<String>>>,
    pub calls: usize,
}

impl ScriptedQueue {
    pub fn new(pops: Vec<QueueResult<Option<String>>>) -> Self {
        Self {
            pops: pops.into(),
            calls: 0,
        }
    }

    pub fn broken() -> QueueResult<Option<String>> {
        Err(QueueError::Connection {
            target: "scripted".to_string(),
            message: "connection reset".to_string(),
        })
    }
}

#[async_trait]
impl QueueSource for ScriptedQueue {
    async fn drain_snapshot(&mut self, _queue_id: &str) -> QueueResult<HashMap<String, String>> {
        Ok(HashMap::new())
    }

    async fn pop_with_timeout(
        &mut self,
        _queue_id: &str,
        _timeout: Duration,
    ) -> QueueResult<Option<String>> {
        self.calls += 1;
        self.pops.pop_front().unwrap_or(Ok(None))
    }

    fn backend_name(&self) -> &'static str {
        "scripted"
    }
}
