//! Redis queue backend
//!
//! Hash-map mode reads with `HGETALL` and clears with `DEL`. List mode pops
//! with `BRPOP`; producers `LPUSH`, so the tail holds the oldest element.

use crate::queue::error::{QueueError, QueueResult};
use crate::queue::traits::QueueSource;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, RedisError};
use std::collections::HashMap;
use std::time::Duration;

/// Redis-backed queue handle, one connection per pipeline run
pub struct RedisQueue {
    url: String,
    connection: MultiplexedConnection,
}

impl RedisQueue {
    /// Open a connection to the Redis server at `url`
    pub async fn connect(url: &str) -> QueueResult<Self> {
        log::info!("Connecting to redis at {}", url);
        let client = redis::Client::open(url).map_err(|e| QueueError::Connection {
            target: url.to_string(),
            message: e.to_string(),
        })?;
        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| QueueError::Connection {
                target: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            url: url.to_string(),
            connection,
        })
    }
}

fn command_error(url: &str, queue_id: &str, err: RedisError) -> QueueError {
    if err.is_io_error()
        || err.is_connection_refusal()
        || err.is_connection_dropped()
        || err.is_timeout()
    {
        QueueError::Connection {
            target: url.to_string(),
            message: err.to_string(),
        }
    } else {
        QueueError::Command {
            queue_id: queue_id.to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl QueueSource for RedisQueue {
    async fn drain_snapshot(&mut self, queue_id: &str) -> QueueResult<HashMap<String, String>> {
        let url = &self.url;
        let entries: HashMap<String, String> = self
            .connection
            .hgetall(queue_id)
            .await
            .map_err(|e| command_error(url, queue_id, e))?;

        // Not atomic with the read above; see QueueSource::drain_snapshot
        let _: () = self
            .connection
            .del(queue_id)
            .await
            .map_err(|e| command_error(url, queue_id, e))?;

        log::debug!("Drained {} fields from redis hash '{}'", entries.len(), queue_id);
        Ok(entries)
    }

    async fn pop_with_timeout(
        &mut self,
        queue_id: &str,
        timeout: Duration,
    ) -> QueueResult<Option<String>> {
        let url = &self.url;

        // BRPOP treats a zero timeout as "block forever"
        if timeout.is_zero() {
            return self
                .connection
                .rpop(queue_id, None)
                .await
                .map_err(|e| command_error(url, queue_id, e));
        }

        let popped: Option<(String, String)> = self
            .connection
            .brpop(queue_id, timeout.as_secs_f64())
            .await
            .map_err(|e| command_error(url, queue_id, e))?;

        Ok(popped.map(|(_key, entry)| entry))
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
