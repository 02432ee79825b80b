//! Tracing setup helpers.

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber with an env-derived filter.
///
/// Respects `RUST_LOG`; falls back to `info`. Safe to call more than once;
/// later calls are no-ops.
pub fn init_tracing() {
    init_tracing_with_filter("info");
}

/// Initializes the global tracing subscriber with a default filter used
/// when `RUST_LOG` is unset.
pub fn init_tracing_with_filter(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
