//! Assertions over collected pipeline events.

use crate::core::{PipelineEvent, ProgressKind, StepStatus};

/// Asserts that the final event is the success notification.
pub fn assert_finished(events: &[PipelineEvent]) {
    match events.last() {
        Some(PipelineEvent::Finished { .. }) => {}
        other => panic!("expected a finished event last, got {other:?}"),
    }
}

/// Asserts that the final event is the failure notification and that its
/// error contains `fragment`.
pub fn assert_failed(events: &[PipelineEvent], fragment: &str) {
    match events.last() {
        Some(PipelineEvent::Failed { error, .. }) if error.contains(fragment) => {}
        other => {
            panic!("expected a failed event carrying {fragment:?} last, got {other:?}")
        }
    }
}

/// Asserts the number of progress events emitted.
pub fn assert_progress_count(events: &[PipelineEvent], expected: usize) {
    let actual = events.iter().filter(|event| event.progress().is_some()).count();
    assert_eq!(
        actual, expected,
        "expected {expected} progress events, got {actual}"
    );
}

/// Returns the titles of begin events, in emission order.
#[must_use]
pub fn begin_titles(events: &[PipelineEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(PipelineEvent::progress)
        .filter(|progress| progress.kind == ProgressKind::StepBegin)
        .filter_map(|progress| progress.title.clone())
        .collect()
}

/// Returns the status tags of end events, in emission order.
#[must_use]
pub fn end_statuses(events: &[PipelineEvent]) -> Vec<StepStatus> {
    events
        .iter()
        .filter_map(PipelineEvent::progress)
        .filter(|progress| progress.kind == ProgressKind::StepEnd)
        .filter_map(|progress| progress.status)
        .collect()
}
