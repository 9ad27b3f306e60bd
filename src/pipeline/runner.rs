//! Strategy execution

use crate::event::decode_field;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::{EventStream, RunReport, RunState, RunTracker, Strategy};
use crate::queue::{QueueError, QueueSource};
use crate::sink::{DeliveryError, GaugeMessage, MetricsSink};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{self, JoinSet};

/// Where a run reads from and what it writes
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub queue_id: String,
    pub metric_key: String,
    pub pop_timeout: Duration,
}

impl PipelineSettings {
    pub const DEFAULT_POP_TIMEOUT: Duration = Duration::from_millis(10);

    /// The queue id and metric key the strategy's producers and dashboards use
    pub fn for_strategy(strategy: Strategy) -> Self {
        Self {
            queue_id: strategy.default_queue_id().to_string(),
            metric_key: strategy.default_metric_key().to_string(),
            pop_timeout: Self::DEFAULT_POP_TIMEOUT,
        }
    }
}

/// Moves events from a queue to a metrics sink using one strategy
pub struct Pipeline {
    strategy: Strategy,
    settings: PipelineSettings,
    sink: Arc<dyn MetricsSink>,
}

struct Run {
    tracker: RunTracker,
    report: RunReport,
    started: Instant,
}

impl Run {
    fn advance(&mut self, next: RunState) {
        self.tracker.advance(next);
    }

    fn finish(mut self, state: RunState) -> RunReport {
        self.tracker.advance(state);
        self.report.state = self.tracker.current();
        self.report.transitions = self.tracker.history().to_vec();
        self.report.elapsed = self.started.elapsed();
        self.report
    }
}

impl Pipeline {
    pub fn new(strategy: Strategy, settings: PipelineSettings, sink: Arc<dyn MetricsSink>) -> Self {
        Self {
            strategy,
            settings,
            sink,
        }
    }

    /// Run once to completion
    ///
    /// Decode and delivery failures are counted and logged; the run still
    /// ends DONE. Only a queue failure ends it FAILED, returned as an error.
    pub async fn run(&self, source: &mut dyn QueueSource) -> PipelineResult<RunReport> {
        log::info!(
            "Starting {} run: queue '{}' on {}, sink {}",
            self.strategy,
            self.settings.queue_id,
            source.backend_name(),
            self.sink.describe()
        );

        let mut run = Run {
            tracker: RunTracker::new(),
            report: RunReport::new(self.strategy, &self.settings.queue_id),
            started: Instant::now(),
        };
        run.advance(RunState::Sourcing);

        let outcome = match self.strategy {
            Strategy::BulkSync | Strategy::BulkConcurrent => self.run_bulk(source, &mut run).await,
            Strategy::Streaming => self.run_streaming(source, &mut run).await,
        };

        match outcome {
            Ok(()) => {
                let report = run.finish(RunState::Done);
                log::info!(
                    "{} run done: {} delivered, {} dropped, {} failed in {:.3}s",
                    self.strategy,
                    report.delivered,
                    report.decode_drops(),
                    report.delivery_failures,
                    report.elapsed.as_secs_f64()
                );
                Ok(report)
            }
            Err(err) => {
                let report = run.finish(RunState::Failed);
                Err(PipelineError::Source {
                    strategy: self.strategy,
                    queue_id: self.settings.queue_id.clone(),
                    source: err,
                    report: Box::new(report),
                })
            }
        }
    }

    /// Drain the whole hash map, decode it, then dispatch everything
    async fn run_bulk(&self, source: &mut dyn QueueSource, run: &mut Run) -> Result<(), QueueError> {
        let snapshot = source.drain_snapshot(&self.settings.queue_id).await?;
        run.report.raw_seen = snapshot.len();
        log::debug!("Read {} entries from '{}'", snapshot.len(), self.settings.queue_id);

        run.advance(RunState::Decoding);
        let messages = self.decode_snapshot(snapshot, &mut run.report);

        run.advance(RunState::Dispatching);
        let outcomes = match self.strategy {
            Strategy::BulkSync => self.sink.batch_gauge(&messages).await,
            _ => self.sink.bulk_gauge(&messages).await,
        };
        for outcome in outcomes {
            run.report.record_delivery(outcome);
        }
        Ok(())
    }

    fn decode_snapshot(
        &self,
        snapshot: HashMap<String, String>,
        report: &mut RunReport,
    ) -> Vec<GaugeMessage> {
        snapshot
            .iter()
            .filter_map(|(field, value)| match decode_field(field, value) {
                Ok(event) => Some(GaugeMessage::from_event(&self.settings.metric_key, &event)),
                Err(err) => {
                    log::warn!("Dropping queue entry: {}", err);
                    None
                }
            })
            .inspect(|_| report.decoded += 1)
            .collect()
    }

    /// Pop, decode and dispatch one element at a time until the queue runs dry
    async fn run_streaming(
        &self,
        source: &mut dyn QueueSource,
        run: &mut Run,
    ) -> Result<(), QueueError> {
        let mut stream = EventStream::new(
            source,
            &self.settings.queue_id,
            self.settings.pop_timeout,
        );
        let mut deliveries = JoinSet::new();
        let mut in_flight: HashMap<task::Id, String> = HashMap::new();

        let ended = loop {
            let pulled = match stream.next().await {
                Ok(Some(pulled)) => pulled,
                Ok(None) => break Ok(()),
                Err(err) => break Err(err),
            };
            run.report.raw_seen += 1;
            run.advance(RunState::Decoding);

            let event = match pulled.decoded {
                Ok(event) => event,
                Err(err) => {
                    log::warn!("Dropping queue entry: {}", err);
                    run.advance(RunState::Sourcing);
                    continue;
                }
            };
            run.report.decoded += 1;

            run.advance(RunState::Dispatching);
            let message = GaugeMessage::from_event(&self.settings.metric_key, &event);
            let line = message.to_string();
            let sink = Arc::clone(&self.sink);
            let handle = deliveries.spawn(async move { sink.gauge(&message).await });
            in_flight.insert(handle.id(), line);
            run.advance(RunState::Sourcing);

            // A ready queue never suspends the pop; let the delivery start now
            task::yield_now().await;
        };

        // In-flight deliveries finish even when the queue failed
        if !deliveries.is_empty() {
            if ended.is_ok() {
                run.advance(RunState::Dispatching);
            }
            log::debug!("Waiting for {} outstanding deliveries", deliveries.len());
        }
        while let Some(joined) = deliveries.join_next_with_id().await {
            let outcome = match joined {
                Ok((id, outcome)) => {
                    in_flight.remove(&id);
                    outcome
                }
                Err(e) => Err(DeliveryError::Task {
                    line: in_flight
                        .remove(&e.id())
                        .unwrap_or_else(|| "<unknown>".to_string()),
                    message: e.to_string(),
                }),
            };
            run.report.record_delivery(outcome);
        }
        ended
    }
}
