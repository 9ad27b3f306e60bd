use super::{fill, timestamp, ScriptedQueue};
use crate::pipeline::{Pipeline, PipelineError, PipelineSettings, RunState, Strategy};
use crate::queue::{MemoryQueue, QueueError};
use crate::sink::{DeliveryResult, GaugeAck, GaugeMessage, MetricsSink, RecordingSink};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn settings(queue_id: &str) -> PipelineSettings {
    PipelineSettings {
        queue_id: queue_id.to_string(),
        metric_key: "key".to_string(),
        pop_timeout: Duration::from_millis(10),
    }
}

fn pipeline(strategy: Strategy, sink: &Arc<RecordingSink>) -> Pipeline {
    Pipeline::new(strategy, settings("home"), sink.clone())
}

#[tokio::test]
async fn test_every_decoded_event_is_dispatched_once() {
    for strategy in Strategy::ALL {
        for count in [0, 1, 100] {
            let mut queue = MemoryQueue::new();
            fill(&queue, "home", strategy == Strategy::Streaming, count);
            let sink = Arc::new(RecordingSink::new());

            let report = pipeline(strategy, &sink).run(&mut queue).await.unwrap();

            assert_eq!(report.raw_seen, count, "{} x{}", strategy, count);
            assert_eq!(report.decoded, count);
            assert_eq!(report.dispatched, count);
            assert_eq!(report.delivered, count);
            assert_eq!(sink.attempts(), count);
            assert_eq!(report.state, RunState::Done);
        }
    }
}

#[tokio::test]
async fn test_connections_per_strategy() {
    let cases = [
        (Strategy::BulkSync, 1),
        (Strategy::BulkConcurrent, 12),
        (Strategy::Streaming, 12),
    ];

    for (strategy, connections) in cases {
        let mut queue = MemoryQueue::new();
        fill(&queue, "home", strategy == Strategy::Streaming, 12);
        let sink = Arc::new(RecordingSink::new());

        pipeline(strategy, &sink).run(&mut queue).await.unwrap();

        assert_eq!(sink.connections(), connections, "{}", strategy);
    }
}

#[tokio::test]
async fn test_malformed_entry_is_dropped_not_fatal() {
    for strategy in Strategy::ALL {
        let mut queue = MemoryQueue::new();
        let streaming = strategy == Strategy::Streaming;
        fill(&queue, "home", streaming, 9);
        if streaming {
            queue.push_entry("home", "2020-01-01 00:00:00,maybe").unwrap();
        } else {
            queue.insert_field("home", "2020-02-30 00:00:00", "1").unwrap();
        }
        let sink = Arc::new(RecordingSink::new());

        let report = pipeline(strategy, &sink).run(&mut queue).await.unwrap();

        assert_eq!(report.raw_seen, 10, "{}", strategy);
        assert_eq!(report.decoded, 9);
        assert_eq!(report.decode_drops(), 1);
        assert_eq!(report.delivered, 9);
        assert_eq!(report.state, RunState::Done);
    }
}

#[tokio::test]
async fn test_bulk_run_emits_expected_lines_and_empties_queue() {
    for strategy in [Strategy::BulkSync, Strategy::BulkConcurrent] {
        let mut queue = MemoryQueue::new();
        queue.insert_field("home", "2020-01-01 00:00:00", "1").unwrap();
        queue.insert_field("home", "2020-01-01 01:00:00", "0").unwrap();
        let sink = Arc::new(RecordingSink::new());

        let report = pipeline(strategy, &sink).run(&mut queue).await.unwrap();

        let mut lines = sink.lines();
        lines.sort();
        assert_eq!(lines, vec!["key 0 1577840400\n", "key 1 1577836800\n"]);
        assert_eq!(report.delivered, 2);
        assert_eq!(queue.field_count("home"), 0);
        assert_eq!(
            report.transitions,
            vec![
                RunState::Start,
                RunState::Sourcing,
                RunState::Decoding,
                RunState::Dispatching,
                RunState::Done
            ]
        );
    }
}

#[tokio::test]
async fn test_streaming_empty_queue_finishes_after_one_timeout() {
    let mut queue = MemoryQueue::new();
    let sink = Arc::new(RecordingSink::new());

    let started = Instant::now();
    let report = pipeline(Strategy::Streaming, &sink)
        .run(&mut queue)
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_millis(10));
    assert_eq!(report.dispatched, 0);
    assert_eq!(
        report.transitions,
        vec![RunState::Start, RunState::Sourcing, RunState::Done]
    );
    assert_eq!(sink.connections(), 0);
}

#[tokio::test]
async fn test_unavailable_queue_fails_run() {
    for strategy in Strategy::ALL {
        let mut queue = MemoryQueue::new();
        fill(&queue, "home", strategy == Strategy::Streaming, 3);
        queue.set_unavailable(true);
        let sink = Arc::new(RecordingSink::new());

        let err = pipeline(strategy, &sink).run(&mut queue).await.unwrap_err();

        let PipelineError::Source { source, .. } = &err;
        assert!(matches!(source, QueueError::Connection { .. }));
        assert_eq!(err.report().state, RunState::Failed);
        assert_eq!(err.report().dispatched, 0);
        assert_eq!(sink.attempts(), 0, "{}", strategy);
    }
}

#[tokio::test]
async fn test_mid_stream_failure_lets_in_flight_deliveries_finish() {
    let mut queue = ScriptedQueue::new(vec![
        Ok(Some(format!("{},1", timestamp(0)))),
        Ok(Some(format!("{},0", timestamp(60)))),
        ScriptedQueue::broken(),
    ]);
    let sink = Arc::new(RecordingSink::new().with_latency(Duration::from_millis(20)));

    let err = pipeline(Strategy::Streaming, &sink)
        .run(&mut queue)
        .await
        .unwrap_err();

    let report = err.report();
    assert_eq!(report.state, RunState::Failed);
    assert_eq!(report.raw_seen, 2);
    assert_eq!(report.dispatched, 2);
    assert_eq!(sink.lines().len(), 2);
    assert!(err.to_string().contains("streaming run aborted"));
}

#[tokio::test]
async fn test_delivery_failures_do_not_fail_run() {
    for strategy in Strategy::ALL {
        let mut queue = MemoryQueue::new();
        fill(&queue, "home", strategy == Strategy::Streaming, 5);
        let sink = Arc::new(RecordingSink::new());
        sink.fail_key("key");

        let report = pipeline(strategy, &sink).run(&mut queue).await.unwrap();

        assert_eq!(report.state, RunState::Done, "{}", strategy);
        assert_eq!(report.dispatched, 5);
        assert_eq!(report.delivery_failures, 5);
        assert_eq!(report.delivered, 0);
        assert_eq!(report.failed_lines.len(), 5);
    }
}

#[tokio::test]
async fn test_bulk_concurrent_deliveries_overlap() {
    let mut queue = MemoryQueue::new();
    fill(&queue, "home", false, 20);
    let sink = Arc::new(RecordingSink::new().with_latency(Duration::from_millis(50)));

    let report = pipeline(Strategy::BulkConcurrent, &sink)
        .run(&mut queue)
        .await
        .unwrap();

    assert_eq!(report.delivered, 20);
    assert_eq!(sink.peak_in_flight(), 20);
    assert!(report.elapsed < Duration::from_millis(500));
}

#[tokio::test]
async fn test_bulk_sync_delivers_one_at_a_time() {
    let mut queue = MemoryQueue::new();
    fill(&queue, "home", false, 4);
    let sink = Arc::new(RecordingSink::new().with_latency(Duration::from_millis(5)));

    let report = pipeline(Strategy::BulkSync, &sink)
        .run(&mut queue)
        .await
        .unwrap();

    assert_eq!(report.delivered, 4);
    assert_eq!(sink.peak_in_flight(), 1);
}

#[tokio::test]
async fn test_streaming_deliveries_overlap() {
    let mut queue = MemoryQueue::new();
    fill(&queue, "home", true, 10);
    let sink = Arc::new(RecordingSink::new().with_latency(Duration::from_millis(50)));

    let report = pipeline(Strategy::Streaming, &sink)
        .run(&mut queue)
        .await
        .unwrap();

    assert_eq!(report.delivered, 10);
    assert!(sink.peak_in_flight() > 1);
    assert!(report.elapsed < Duration::from_millis(400));
}

#[tokio::test]
async fn test_streaming_delivers_before_queue_is_drained() {
    let queue = MemoryQueue::new();
    let sink = Arc::new(RecordingSink::new());

    let producer_queue = queue.clone();
    let producer_sink = sink.clone();
    let producer = tokio::spawn(async move {
        producer_queue
            .push_entry("home", "2020-01-01 00:00:00,1")
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        let delivered_so_far = producer_sink.lines().len();
        producer_queue
            .push_entry("home", "2020-01-01 01:00:00,0")
            .unwrap();
        delivered_so_far
    });

    let mut consumer = queue.clone();
    let mut settings = settings("home");
    settings.pop_timeout = Duration::from_millis(100);
    let report = Pipeline::new(Strategy::Streaming, settings, sink.clone())
        .run(&mut consumer)
        .await
        .unwrap();

    assert_eq!(producer.await.unwrap(), 1);
    assert_eq!(report.delivered, 2);
    assert_eq!(
        sink.lines(),
        vec!["key 1 1577836800\n", "key 0 1577840400\n"]
    );
}

#[tokio::test]
async fn test_report_summary_mentions_counts() {
    let mut queue = MemoryQueue::new();
    fill(&queue, "home", false, 3);
    let sink = Arc::new(RecordingSink::new());

    let report = pipeline(Strategy::BulkSync, &sink)
        .run(&mut queue)
        .await
        .unwrap();
    let summary = report.to_string();

    assert!(summary.contains("bulk-sync"));
    assert!(summary.contains("Delivered:         3"));
    assert!(summary.contains("Final state:       DONE"));
    assert!(summary.contains("Time of execution:"));
}

#[test]
fn test_settings_for_strategy() {
    let settings = PipelineSettings::for_strategy(Strategy::Streaming);
    assert_eq!(settings.queue_id, "list_home");
    assert_eq!(settings.metric_key, "local.home.async_gen");
    assert_eq!(settings.pop_timeout, Duration::from_millis(10));
}

/// Notes how many list entries were still queued whenever a delivery starts
struct QueueWatchingSink {
    queue: MemoryQueue,
    queued_at_start: Mutex<Vec<usize>>,
}

#[async_trait]
impl MetricsSink for QueueWatchingSink {
    async fn gauge(&self, message: &GaugeMessage) -> DeliveryResult<GaugeAck> {
        self.queued_at_start
            .lock()
            .unwrap()
            .push(self.queue.list_len("home"));
        Ok(GaugeAck {
            message: message.clone(),
            bytes_written: message.to_line().len(),
        })
    }

    fn describe(&self) -> String {
        "queue watching sink".to_string()
    }
}

#[tokio::test]
async fn test_streaming_starts_deliveries_while_entries_remain_queued() {
    let mut queue = MemoryQueue::new();
    fill(&queue, "home", true, 50);
    let sink = Arc::new(QueueWatchingSink {
        queue: queue.clone(),
        queued_at_start: Mutex::new(Vec::new()),
    });

    let report = Pipeline::new(Strategy::Streaming, settings("home"), sink.clone())
        .run(&mut queue)
        .await
        .unwrap();

    assert_eq!(report.delivered, 50);
    let queued = sink.queued_at_start.lock().unwrap().clone();
    assert_eq!(queued.len(), 50);
    // The first delivery runs right after the first pop
    assert_eq!(queued[0], 49);
    assert!(queued.iter().filter(|&&left| left > 0).count() > 1);
}

/// Panics instead of delivering the "off" gauges
struct PanickingSink;

#[async_trait]
impl MetricsSink for PanickingSink {
    async fn gauge(&self, message: &GaugeMessage) -> DeliveryResult<GaugeAck> {
        if message.value == 0 {
            panic!("sink bug");
        }
        Ok(GaugeAck {
            message: message.clone(),
            bytes_written: message.to_line().len(),
        })
    }

    fn describe(&self) -> String {
        "panicking sink".to_string()
    }
}

#[tokio::test]
async fn test_crashed_delivery_task_keeps_its_line() {
    let mut queue = MemoryQueue::new();
    queue.push_entry("home", "2020-01-01 00:00:00,1").unwrap();
    queue.push_entry("home", "2020-01-01 01:00:00,0").unwrap();

    let report = Pipeline::new(Strategy::Streaming, settings("home"), Arc::new(PanickingSink))
        .run(&mut queue)
        .await
        .unwrap();

    assert_eq!(report.state, RunState::Done);
    assert_eq!(report.delivered, 1);
    assert_eq!(report.delivery_failures, 1);
    assert_eq!(report.failed_lines, vec!["key 0 1577840400"]);
}
