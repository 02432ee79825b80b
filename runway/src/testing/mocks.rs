//! Recording step and cleanup actions.

use crate::core::StepOutcome;
use crate::pipeline::{CleanupAction, StepAction, StepContext};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Records the order in which steps and cleanups run.
///
/// Clones share the same underlying log, so a recorder can be handed to
/// many actions and inspected after the run.
#[derive(Debug, Clone, Default)]
pub struct RunRecorder {
    entries: Arc<Mutex<Vec<String>>>,
}

impl RunRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a label to the log.
    pub fn record(&self, label: impl Into<String>) {
        self.entries.lock().push(label.into());
    }

    /// Returns the recorded labels, in execution order.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }
}

/// A step action that records its label, then reports a fixed outcome.
#[derive(Debug)]
pub struct RecordingStep {
    label: String,
    recorder: RunRecorder,
    outcome: StepOutcome,
}

impl RecordingStep {
    /// Creates a step that records and succeeds.
    #[must_use]
    pub fn ok(label: impl Into<String>, recorder: RunRecorder) -> Self {
        Self {
            label: label.into(),
            recorder,
            outcome: StepOutcome::Ok,
        }
    }

    /// Creates a step that records and skips.
    #[must_use]
    pub fn skip(label: impl Into<String>, recorder: RunRecorder) -> Self {
        Self {
            label: label.into(),
            recorder,
            outcome: StepOutcome::Skip,
        }
    }

    /// Creates a step that records and fails with `message`.
    #[must_use]
    pub fn fail(
        label: impl Into<String>,
        recorder: RunRecorder,
        message: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            recorder,
            outcome: StepOutcome::Fail(message.into()),
        }
    }
}

#[async_trait]
impl StepAction for RecordingStep {
    async fn run(&self, _ctx: &StepContext) -> StepOutcome {
        self.recorder.record(self.label.clone());
        self.outcome.clone()
    }
}

/// A cleanup action that records its label, then reports a fixed outcome.
#[derive(Debug)]
pub struct RecordingCleanup {
    label: String,
    recorder: RunRecorder,
    outcome: StepOutcome,
}

impl RecordingCleanup {
    /// Creates a cleanup that records and succeeds.
    #[must_use]
    pub fn ok(label: impl Into<String>, recorder: RunRecorder) -> Self {
        Self {
            label: label.into(),
            recorder,
            outcome: StepOutcome::Ok,
        }
    }

    /// Creates a cleanup that records and fails with `message`.
    #[must_use]
    pub fn fail(
        label: impl Into<String>,
        recorder: RunRecorder,
        message: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            recorder,
            outcome: StepOutcome::Fail(message.into()),
        }
    }
}

#[async_trait]
impl CleanupAction for RecordingCleanup {
    async fn run(&self, _ctx: &StepContext, _erroring: bool) -> StepOutcome {
        self.recorder.record(self.label.clone());
        self.outcome.clone()
    }
}
