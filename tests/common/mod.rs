//! Common test utilities and helpers
//!
//! A local plaintext collector standing in for the metrics endpoint, and
//! helpers for filling an in-memory queue.

#![allow(dead_code)]

use lightsync::queue::MemoryQueue;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

/// TCP listener recording every connection and every line it receives
pub struct Collector {
    pub port: u16,
    connections: Arc<AtomicUsize>,
    lines: Arc<Mutex<Vec<String>>>,
}

impl Collector {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let connections = Arc::new(AtomicUsize::new(0));
        let lines = Arc::new(Mutex::new(Vec::new()));

        let accepted = connections.clone();
        let received = lines.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                accepted.fetch_add(1, Ordering::SeqCst);
                let received = received.clone();
                tokio::spawn(async move {
                    let mut buffer = String::new();
                    if socket.read_to_string(&mut buffer).await.is_ok() {
                        received
                            .lock()
                            .unwrap()
                            .extend(buffer.split_inclusive('\n').map(str::to_string));
                    }
                });
            }
        });

        Self {
            port,
            connections,
            lines,
        }
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Lines received so far, sorted, once `count` arrived or two seconds passed
    pub async fn wait_for_lines(&self, count: usize) -> Vec<String> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        loop {
            let mut lines = self.lines.lock().unwrap().clone();
            if lines.len() >= count || tokio::time::Instant::now() >= deadline {
                lines.sort();
                return lines;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

/// Hash-map entries for the two-event scenario: on at midnight, off an hour later
pub fn fill_two_events_map(queue: &MemoryQueue, queue_id: &str) {
    queue
        .insert_field(queue_id, "2020-01-01 00:00:00", "1")
        .unwrap();
    queue
        .insert_field(queue_id, "2020-01-01 01:00:00", "0")
        .unwrap();
}

/// List entries for the same scenario, oldest pushed first
pub fn fill_two_events_list(queue: &MemoryQueue, queue_id: &str) {
    queue.push_entry(queue_id, "2020-01-01 00:00:00,1").unwrap();
    queue.push_entry(queue_id, "2020-01-01 01:00:00,0").unwrap();
}

pub const EXPECTED_LINES: [&str; 2] = ["key 0 1577840400\n", "key 1 1577836800\n"];
