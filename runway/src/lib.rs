//! # Runway
//!
//! A sequential step-execution engine with guaranteed teardown.
//!
//! Runway runs an ordered list of asynchronous steps one at a time, tracks
//! progress, and guarantees that registered cleanup actions run — in reverse
//! order of registration — whenever execution halts, whether by normal
//! completion or by the first failure. It provides:
//!
//! - **Sequential execution**: steps run strictly one at a time, in
//!   registration order
//! - **Guaranteed teardown**: cleanup actions drain in LIFO order on both
//!   success and failure
//! - **Progress reporting**: begin/end events with running counters for every
//!   step and cleanup
//! - **Event-driven observability**: pluggable event sinks for logging,
//!   collection, and channel forwarding
//!
//! ## Quick Start
//!
//! ```
//! use runway::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let pipeline = Pipeline::new();
//! pipeline.add_step("greet", FnStep::new(|_ctx| async { StepOutcome::ok() }));
//! pipeline
//!     .add_cleanup_step("tmp", "remove scratch space", FnCleanup::new(
//!         |_ctx, _erroring| async { StepOutcome::ok() },
//!     ))
//!     .unwrap();
//!
//! pipeline.run().wait().await.unwrap();
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod core;
pub mod errors;
pub mod events;
pub mod observability;
pub mod pipeline;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        PipelineEvent, Progress, ProgressKind, StepOutcome, StepStatus,
    };
    pub use crate::errors::PipelineError;
    pub use crate::events::{
        ChannelEventSink, CollectingEventSink, EventSink, LoggingEventSink,
        NoOpEventSink,
    };
    pub use crate::pipeline::{
        CleanupAction, FnCleanup, FnStep, Pipeline, RunHandle, StepAction,
        StepContext,
    };
}
