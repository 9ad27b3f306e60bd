//! Run state machine
//!
//! ```text
//! START -> SOURCING -> DECODING -> DISPATCHING -> DONE
//!             |  ^         |           |
//!             |  +---------+-----------+   (streaming loops back per item)
//!             +-> FAILED
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Start,
    Sourcing,
    Decoding,
    Dispatching,
    Done,
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Failed)
    }

    /// Whether a run may move from `self` to `next`
    ///
    /// FAILED is only reachable from SOURCING: decode and delivery failures
    /// are per item and never fail the run.
    pub fn can_advance_to(&self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (Start, Sourcing)
                | (Sourcing, Decoding)
                | (Sourcing, Dispatching)
                | (Sourcing, Done)
                | (Sourcing, Failed)
                | (Decoding, Dispatching)
                | (Decoding, Sourcing)
                | (Dispatching, Sourcing)
                | (Dispatching, Done)
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Start => "START",
            RunState::Sourcing => "SOURCING",
            RunState::Decoding => "DECODING",
            RunState::Dispatching => "DISPATCHING",
            RunState::Done => "DONE",
            RunState::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Current state plus every state the run passed through
#[derive(Debug, Clone)]
pub struct RunTracker {
    current: RunState,
    history: Vec<RunState>,
}

impl RunTracker {
    pub fn new() -> Self {
        Self {
            current: RunState::Start,
            history: vec![RunState::Start],
        }
    }

    pub fn current(&self) -> RunState {
        self.current
    }

    pub fn history(&self) -> &[RunState] {
        &self.history
    }

    pub fn advance(&mut self, next: RunState) {
        if self.current == next {
            return;
        }
        debug_assert!(
            self.current.can_advance_to(next),
            "invalid run transition {} -> {}",
            self.current,
            next
        );
        log::trace!("Run state {} -> {}", self.current, next);
        self.current = next;
        self.history.push(next);
    }
}

impl Default for RunTracker {
    fn default() -> Self {
        Self::new()
    }
}
