//! Plaintext line-protocol sink over TCP
//!
//! The collector on the other end (Graphite/carbon style, port 2003 by
//! default) expects `"<key> <value> <timestamp>\n"` lines and never replies,
//! so nothing is read back. Each `gauge` opens and closes its own connection;
//! `batch_gauge` shares one connection across the whole batch.

use crate::sink::{DeliveryError, DeliveryResult, GaugeAck, GaugeMessage, MetricsSink};
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct GraphiteSink {
    endpoint: String,
    connect_timeout: Duration,
}

impl GraphiteSink {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            endpoint: format!("{}:{}", host, port),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Connect, giving up after the connect timeout
    async fn open(&self) -> Result<TcpStream, String> {
        let connect = TcpStream::connect(self.endpoint.as_str());
        match tokio::time::timeout(self.connect_timeout, connect).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("timed out after {:?}", self.connect_timeout)),
        }
    }

    fn connection_error(&self, line: &str, message: String) -> DeliveryError {
        DeliveryError::Connection {
            endpoint: self.endpoint.clone(),
            line: line.to_string(),
            message,
        }
    }

    fn write_error(&self, message: &GaugeMessage, err: std::io::Error) -> DeliveryError {
        DeliveryError::Write {
            endpoint: self.endpoint.clone(),
            line: message.to_string(),
            message: err.to_string(),
        }
    }
}

async fn write_line(stream: &mut TcpStream, message: &GaugeMessage) -> std::io::Result<usize> {
    let line = message.to_line();
    stream.write_all(line.as_bytes()).await?;
    stream.flush().await?;
    Ok(line.len())
}

#[async_trait]
impl MetricsSink for GraphiteSink {
    async fn gauge(&self, message: &GaugeMessage) -> DeliveryResult<GaugeAck> {
        let mut stream = self
            .open()
            .await
            .map_err(|reason| self.connection_error(&message.to_string(), reason))?;
        let written = write_line(&mut stream, message).await;
        // Released whatever the write outcome was
        let _ = stream.shutdown().await;

        let bytes_written = written.map_err(|e| self.write_error(message, e))?;
        log::trace!("Sent '{}' to {}", message, self.endpoint);
        Ok(GaugeAck {
            message: message.clone(),
            bytes_written,
        })
    }

    async fn batch_gauge(&self, messages: &[GaugeMessage]) -> Vec<DeliveryResult<GaugeAck>> {
        if messages.is_empty() {
            return Vec::new();
        }

        let mut stream = match self.open().await {
            Ok(stream) => stream,
            Err(reason) => {
                return messages
                    .iter()
                    .map(|message| Err(self.connection_error(&message.to_string(), reason.clone())))
                    .collect();
            }
        };

        let mut results = Vec::with_capacity(messages.len());
        let mut broken: Option<String> = None;
        for message in messages {
            // Once the shared connection breaks, the remaining lines cannot be sent
            if let Some(reason) = &broken {
                results.push(Err(DeliveryError::Write {
                    endpoint: self.endpoint.clone(),
                    line: message.to_string(),
                    message: format!("connection broken earlier in batch: {}", reason),
                }));
                continue;
            }

            match write_line(&mut stream, message).await {
                Ok(bytes_written) => results.push(Ok(GaugeAck {
                    message: message.clone(),
                    bytes_written,
                })),
                Err(e) => {
                    broken = Some(e.to_string());
                    results.push(Err(self.write_error(message, e)));
                }
            }
        }
        let _ = stream.shutdown().await;

        log::debug!(
            "Batch of {} lines sent to {} over one connection",
            messages.len(),
            self.endpoint
        );
        results
    }

    fn describe(&self) -> String {
        format!("graphite at {}", self.endpoint)
    }
}
