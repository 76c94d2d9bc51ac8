//! Logging setup for embedders.
//!
//! The camera app loads this library as a shared object and never runs a Rust
//! `main`, so subscriber installation is exposed as an idempotent call.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize tracing with the default `info` filter.
///
/// The level can be overridden through `RUST_LOG`, e.g.
/// `RUST_LOG=edgeview=debug` for per-frame timings.
pub fn init() {
    init_with_filter("info");
}

/// Initialize tracing with a custom default filter. Later calls are no-ops.
pub fn init_with_filter(default_filter: &str) {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

        // Another subscriber may already be installed by the host process.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init();
    });
}
