//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt};

use crate::domain::config::JournalConfig;

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
///
/// Output goes to stderr so the console menu on stdout stays clean. Calling
/// this twice is harmless; the second call is ignored.
pub fn init(config: &JournalConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.log_ansi)
        .with_target(false)
        .try_init();
}
