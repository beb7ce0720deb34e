//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static INIT: Once = Once::new();

/// Environment variable holding per-target log levels,
/// e.g. `BORDERED_SQUARE_LOG=bordered_square=debug`.
pub const LOG_ENV: &str = "BORDERED_SQUARE_LOG";

/// Install the stderr subscriber. Safe to call more than once.
///
/// Falls back to `bordered_square=info`, or `debug` when `verbose` is set,
/// if the environment variable is unset or invalid.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let fallback = if verbose {
            "bordered_square=debug"
        } else {
            "bordered_square=info"
        };
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .init();
    });
}
