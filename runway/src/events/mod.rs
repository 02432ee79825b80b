//! Event sink system for observability.
//!
//! Every pipeline owns one sink; all progress and terminal notifications
//! flow through it. Sinks must be attached before `run()` so observers see
//! every event.

mod sink;

pub use sink::{
    ChannelEventSink, CollectingEventSink, EventSink, LoggingEventSink,
    NoOpEventSink,
};
