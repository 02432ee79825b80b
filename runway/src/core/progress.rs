//! Progress payloads and the tagged pipeline event enum.

use super::{ProgressKind, StepStatus};
use serde::{Deserialize, Serialize};

/// A progress notification describing the start or end of a single step or
/// cleanup execution.
///
/// `current` and `total` reflect the engine-wide counters at the moment of
/// emission. They are a reporting approximation: totals can grow mid-run via
/// `expect_additional`, and `current` can exceed `total` when cleanups are
/// registered after the run starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Whether this marks the start or the end of the item.
    #[serde(rename = "type")]
    pub kind: ProgressKind,

    /// The result tag, present on end events only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StepStatus>,

    /// The item's title, present on begin events only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Items executed so far, this one included.
    pub current: usize,

    /// Items expected overall.
    pub total: usize,
}

impl Progress {
    /// Creates a begin notification for the named item.
    #[must_use]
    pub fn begin(title: impl Into<String>, current: usize, total: usize) -> Self {
        Self {
            kind: ProgressKind::StepBegin,
            status: None,
            title: Some(title.into()),
            current,
            total,
        }
    }

    /// Creates an end notification carrying the item's status tag.
    #[must_use]
    pub fn end(status: StepStatus, current: usize, total: usize) -> Self {
        Self {
            kind: ProgressKind::StepEnd,
            status: Some(status),
            title: None,
            current,
            total,
        }
    }
}

/// The three observable signal kinds a pipeline emits.
///
/// Exactly one terminal event (`Finished` or `Failed`) fires per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// A step or cleanup began or ended.
    Progress(Progress),

    /// The pipeline completed without error.
    Finished {
        /// Items executed by the end of the run.
        current: usize,
        /// Items expected overall.
        total: usize,
    },

    /// The pipeline failed; carries the first error encountered.
    Failed {
        /// The rendered first error.
        error: String,
        /// Items executed by the end of the run.
        current: usize,
        /// Items expected overall.
        total: usize,
    },
}

impl PipelineEvent {
    /// Returns the inner progress payload, if this is a progress event.
    #[must_use]
    pub fn progress(&self) -> Option<&Progress> {
        match self {
            Self::Progress(progress) => Some(progress),
            _ => None,
        }
    }

    /// Returns true for the terminal `Finished` / `Failed` events.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished { .. } | Self::Failed { .. })
    }
}
