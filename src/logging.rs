//! Tracing subscriber setup for hosts and tests that want log output.

use tracing_subscriber::EnvFilter;

/// Installs a global fmt subscriber on stderr, filtered by `RUST_LOG`
/// (default `warn`).
///
/// Returns `false` if a subscriber was already installed.
pub fn init() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
