//! Log subscriber setup.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Env var that turns on debug logging in CI without touching `RUST_LOG`.
pub const DEBUG_ENV: &str = "CI_SCRIPT_DEBUG";

/// Picks the filter directive when `RUST_LOG` is not set.
#[must_use]
pub fn default_directive(debug: bool, ci_debug: bool) -> &'static str {
    if debug || ci_debug {
        "debug"
    } else {
        "info"
    }
}

/// Installs a stderr `fmt` subscriber, coloured only on a terminal. Safe to
/// call more than once; later calls are ignored.
pub fn init(debug: bool) {
    let ci_debug = std::env::var_os(DEBUG_ENV).is_some_and(|v| !v.is_empty());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug, ci_debug)));

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
}
