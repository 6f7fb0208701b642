//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the Augur tracing/logging system.
///
/// Reads the `AUGUR_LOG` environment variable for per-subsystem log levels.
/// Format: `AUGUR_LOG=augur_extraction=debug,augur_storage=warn`
///
/// Falls back to `augur=info` if `AUGUR_LOG` is not set or is invalid.
///
/// This function is idempotent — calling it multiple times is safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("AUGUR_LOG").unwrap_or_else(|_| EnvFilter::new("augur=info"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .init();
    });
}
