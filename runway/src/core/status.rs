//! Step status and progress-kind enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The reported result of a single step or cleanup execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// The step completed successfully.
    Ok,
    /// The step failed.
    Error,
    /// The step was skipped.
    Skip,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Error => write!(f, "error"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

impl StepStatus {
    /// Returns true if the status counts as success. Skips are reported
    /// identically to ok apart from the tag.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok | Self::Skip)
    }

    /// Returns true if the status indicates failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Error)
    }
}

/// Whether a progress event marks the start or the end of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressKind {
    /// A step or cleanup is about to run.
    StepBegin,
    /// A step or cleanup finished running.
    StepEnd,
}

impl fmt::Display for ProgressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StepBegin => write!(f, "step-begin"),
            Self::StepEnd => write!(f, "step-end"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_status_display() {
        assert_eq!(StepStatus::Ok.to_string(), "ok");
        assert_eq!(StepStatus::Error.to_string(), "error");
        assert_eq!(StepStatus::Skip.to_string(), "skip");
    }

    #[test]
    fn test_step_status_is_success() {
        assert!(StepStatus::Ok.is_success());
        assert!(StepStatus::Skip.is_success());
        assert!(!StepStatus::Error.is_success());
        assert!(StepStatus::Error.is_failure());
    }

    #[test]
    fn test_step_status_serialize() {
        let json = serde_json::to_string(&StepStatus::Skip).unwrap();
        assert_eq!(json, r#""skip""#);

        let deserialized: StepStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, StepStatus::Skip);
    }

    #[test]
    fn test_progress_kind_serialize() {
        let json = serde_json::to_string(&ProgressKind::StepBegin).unwrap();
        assert_eq!(json, r#""step-begin""#);

        let json = serde_json::to_string(&ProgressKind::StepEnd).unwrap();
        assert_eq!(json, r#""step-end""#);
    }

    #[test]
    fn test_progress_kind_display() {
        assert_eq!(ProgressKind::StepBegin.to_string(), "step-begin");
        assert_eq!(ProgressKind::StepEnd.to_string(), "step-end");
    }
}
