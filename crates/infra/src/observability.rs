//! Tracing bootstrap

use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber once.
///
/// `RUST_LOG` takes precedence over the configured level. Repeated calls
/// are harmless no-ops.
pub fn init_tracing(log_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
