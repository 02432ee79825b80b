//! Step outcome type with factory methods.

use super::StepStatus;
use std::fmt;

/// The outcome a step or cleanup action produces when it finishes.
///
/// Every action ends by returning exactly one `StepOutcome`; the engine
/// advances, skips, or short-circuits based on the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The action completed successfully.
    Ok,
    /// The action declined to do its work; reported like success with a
    /// `skip` status tag.
    Skip,
    /// The action failed with the given message.
    Fail(String),
}

impl StepOutcome {
    /// Creates a successful outcome.
    #[must_use]
    pub fn ok() -> Self {
        Self::Ok
    }

    /// Creates a skipped outcome.
    #[must_use]
    pub fn skip() -> Self {
        Self::Skip
    }

    /// Creates a failed outcome with an error message.
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }

    /// Converts a `Result` into an outcome, stringifying the error.
    #[must_use]
    pub fn from_result<E: fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::Ok,
            Err(err) => Self::Fail(err.to_string()),
        }
    }

    /// Returns the status tag this outcome is reported under.
    #[must_use]
    pub fn status(&self) -> StepStatus {
        match self {
            Self::Ok => StepStatus::Ok,
            Self::Skip => StepStatus::Skip,
            Self::Fail(_) => StepStatus::Error,
        }
    }

    /// Returns true if the outcome counts as success (ok or skip).
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Fail(_))
    }

    /// Returns the error message, if the outcome is a failure.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Fail(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_factories() {
        assert_eq!(StepOutcome::ok(), StepOutcome::Ok);
        assert_eq!(StepOutcome::skip(), StepOutcome::Skip);
        assert_eq!(
            StepOutcome::fail("boom"),
            StepOutcome::Fail("boom".to_string())
        );
    }

    #[test]
    fn test_outcome_status_mapping() {
        assert_eq!(StepOutcome::ok().status(), StepStatus::Ok);
        assert_eq!(StepOutcome::skip().status(), StepStatus::Skip);
        assert_eq!(StepOutcome::fail("x").status(), StepStatus::Error);
    }

    #[test]
    fn test_outcome_is_success() {
        assert!(StepOutcome::ok().is_success());
        assert!(StepOutcome::skip().is_success());
        assert!(!StepOutcome::fail("x").is_success());
    }

    #[test]
    fn test_outcome_error_accessor() {
        assert_eq!(StepOutcome::ok().error(), None);
        assert_eq!(StepOutcome::fail("nope").error(), Some("nope"));
    }

    #[test]
    fn test_outcome_from_result() {
        let ok: Result<(), std::io::Error> = Ok(());
        assert_eq!(StepOutcome::from_result(ok), StepOutcome::Ok);

        let err: Result<(), String> = Err("disk full".to_string());
        assert_eq!(
            StepOutcome::from_result(err),
            StepOutcome::Fail("disk full".to_string())
        );
    }
}
