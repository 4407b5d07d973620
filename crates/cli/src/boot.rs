//! Process start-up: diagnostics setup.
//!
//! Everything diagnostic goes to stderr; stdout carries merged log data
//! only.

use tracing_subscriber::{fmt, EnvFilter};

use merger::conf::model::DEFAULT_LOG_LEVEL;

/// Phase 1: basic tracing so config loading can log.
/// Uses set_default (thread-local) so phase 2 can install the global subscriber.
pub fn init_tracing_basic() -> tracing::subscriber::DefaultGuard {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_default(subscriber)
}

/// Phase 2: global subscriber at the configured level.
/// `RUST_LOG` still wins when set.
pub fn init_tracing(level: &str) {
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    // A subscriber may already be installed when embedded in tests
    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}
