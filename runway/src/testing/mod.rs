//! Testing utilities for pipelines.
//!
//! This module provides:
//! - Recording step/cleanup actions
//! - Assertions over collected pipeline events

mod assertions;
mod mocks;

pub use assertions::{
    assert_failed, assert_finished, assert_progress_count, begin_titles,
    end_statuses,
};
pub use mocks::{RecordingCleanup, RecordingStep, RunRecorder};
