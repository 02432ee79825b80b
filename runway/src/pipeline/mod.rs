//! Pipeline engine and step actions.
//!
//! This module provides:
//! - The action traits steps and cleanups implement
//! - Closure adapters for ad-hoc actions
//! - The engine itself: FIFO step queue, LIFO cleanup stack, drain logic

mod engine;
mod step;


pub use engine::{Pipeline, RunHandle, StepContext};
pub use step::{CleanupAction, FnCleanup, FnStep, StepAction};
