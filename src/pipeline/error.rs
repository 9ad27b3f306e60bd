use crate::core::error_handling::ContextualError;
use crate::pipeline::{RunReport, Strategy};
use crate::queue::QueueError;
use thiserror::Error;

/// A run that ended in FAILED
///
/// Only the queue can fail a run. The counters gathered up to the failure
/// travel with the error.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{strategy} run aborted reading queue '{queue_id}': {source}")]
    Source {
        strategy: Strategy,
        queue_id: String,
        #[source]
        source: QueueError,
        report: Box<RunReport>,
    },
}

impl PipelineError {
    /// Counters at the moment the run failed
    pub fn report(&self) -> &RunReport {
        match self {
            PipelineError::Source { report, .. } => report,
        }
    }
}

impl ContextualError for PipelineError {
    fn is_user_actionable(&self) -> bool {
        match self {
            PipelineError::Source { source, .. } => source.is_user_actionable(),
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            PipelineError::Source { source, .. } => source.user_message(),
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
