//! Error types for the pipeline engine.

use thiserror::Error;

/// The error taxonomy for pipeline runs.
///
/// At most one error reaches a run's failure notification: the first one
/// encountered in step execution or in the cleanup that leads the drain.
/// Later cleanup failures during a forced drain are logged, never surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// A step's action reported failure.
    #[error("step '{title}' failed: {message}")]
    StepFailed {
        /// The failing step's title.
        title: String,
        /// The message the step's action reported.
        message: String,
    },

    /// A cleanup action reported failure while no earlier error existed.
    #[error("cleanup '{id}' failed: {message}")]
    CleanupFailed {
        /// The failing cleanup's id.
        id: String,
        /// The message the cleanup's action reported.
        message: String,
    },

    /// `run_cleanup` was called with an id that is not currently registered.
    /// A programming error, not a runtime condition to recover from.
    #[error("no cleanup step registered with id '{id}'")]
    UnknownCleanupId {
        /// The missing id.
        id: String,
    },

    /// `add_cleanup_step` was called with an id that is already registered.
    #[error("cleanup step with id '{id}' is already registered")]
    DuplicateCleanupId {
        /// The duplicate id.
        id: String,
    },

    /// The spawned run task could not be joined (a step action panicked).
    #[error("pipeline task failed: {0}")]
    Runtime(String),
}

impl PipelineError {
    /// Creates a step failure error.
    #[must_use]
    pub fn step_failed(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StepFailed {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Creates a cleanup failure error.
    #[must_use]
    pub fn cleanup_failed(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CleanupFailed {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Creates an unknown-cleanup-id error.
    #[must_use]
    pub fn unknown_cleanup_id(id: impl Into<String>) -> Self {
        Self::UnknownCleanupId { id: id.into() }
    }
}
