//! Tracing setup for the CLI binaries.
//!
//! Controlled by `JOLT_LOG` (an `EnvFilter` directive string). Logs go to
//! stderr so piped output stays clean.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Safe to call once per process; later
/// calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_env("JOLT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
