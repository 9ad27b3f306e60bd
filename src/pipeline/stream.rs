//! Lazy event stream over a list-mode queue

use crate::event::{decode_entry, DecodeResult, Event};
use crate::queue::{QueueResult, QueueSource};
use std::time::Duration;

/// One element taken off the queue
#[derive(Debug, Clone, PartialEq)]
pub struct Pulled {
    pub raw: String,
    pub decoded: DecodeResult<Event>,
}

/// Pull-based sequence of decoded events
///
/// Each `next` pops at most one element, waiting up to the pop timeout. An
/// empty pop ends the stream for good: later calls return `None` without
/// touching the queue, so the stream cannot be restarted.
pub struct EventStream<'a> {
    source: &'a mut dyn QueueSource,
    queue_id: &'a str,
    pop_timeout: Duration,
    finished: bool,
}

impl<'a> EventStream<'a> {
    pub fn new(source: &'a mut dyn QueueSource, queue_id: &'a str, pop_timeout: Duration) -> Self {
        Self {
            source,
            queue_id,
            pop_timeout,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Next element, or `None` once the queue stayed empty for the timeout
    ///
    /// A queue error also ends the stream.
    pub async fn next(&mut self) -> QueueResult<Option<Pulled>> {
        if self.finished {
            return Ok(None);
        }

        match self.source.pop_with_timeout(self.queue_id, self.pop_timeout).await {
            Ok(Some(raw)) => {
                let decoded = decode_entry(&raw);
                Ok(Some(Pulled { raw, decoded }))
            }
            Ok(None) => {
                log::debug!(
                    "Queue '{}' empty for {:?}, ending stream",
                    self.queue_id,
                    self.pop_timeout
                );
                self.finished = true;
                Ok(None)
            }
            Err(err) => {
                self.finished = true;
                Err(err)
            }
        }
    }
}
