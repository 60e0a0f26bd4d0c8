//! Log output for the racing demo.
//!
//! What matters in a run is how readers and the writer interleave, so every
//! line is tagged with the OS thread name (`reader-0`, `writer`) instead of
//! the module path. Gate internals from `rwgate_core` (`[gate-racing] ...`)
//! are logged at `debug`; raise that target in `RUST_LOG` to see each acquire.

use std::sync::Once;

use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static INIT: Once = Once::new();

/// Used when `RUST_LOG` is unset or does not parse.
pub const DEFAULT_FILTER: &str = "demos=info,rwgate_core=info";

pub fn demo_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the demo subscriber. Only the first call in a process has an effect,
/// and an already installed global subscriber is left in place.
pub fn init_tracing(run_label: &str) {
    INIT.call_once(|| {
        let layer = fmt::layer().compact().with_thread_names(true).with_target(false);
        if tracing_subscriber::registry().with(demo_filter()).with(layer).try_init().is_ok() {
            info!(run = %run_label, "logging ready");
        }
    });
}
