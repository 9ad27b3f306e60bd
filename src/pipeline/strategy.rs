//! Selectable concurrency strategies

use std::fmt;
use std::str::FromStr;

/// How a run moves events from the queue to the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Drain the hash map, decode everything, write all lines over one connection
    BulkSync,
    /// Drain the hash map, decode everything, then one concurrent delivery per event
    #[default]
    BulkConcurrent,
    /// Pop list entries until the queue runs dry, delivering each as it arrives
    Streaming,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::BulkSync,
        Strategy::BulkConcurrent,
        Strategy::Streaming,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::BulkSync => "bulk-sync",
            Strategy::BulkConcurrent => "bulk-concurrent",
            Strategy::Streaming => "streaming",
        }
    }

    /// Queue id the producers of this strategy write to
    pub fn default_queue_id(&self) -> &'static str {
        match self {
            Strategy::BulkSync => "map_sync_home",
            Strategy::BulkConcurrent => "map_async_home",
            Strategy::Streaming => "list_home",
        }
    }

    /// Metric key dashboards expect for this strategy
    pub fn default_metric_key(&self) -> &'static str {
        match self {
            Strategy::BulkSync => "local.home.sync",
            Strategy::BulkConcurrent => "local.home.async",
            Strategy::Streaming => "local.home.async_gen",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown strategy '{}' (expected bulk-sync, bulk-concurrent or streaming)",
                    s
                )
            })
    }
}
