//! Typed application settings resolved from a [`ConfigPort`].

use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::domain::error::JournalError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_JOURNAL_PATH: &str = "journal.json";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";
pub const DEFAULT_LOG_LEVEL: &str = "warn";
const MAX_INDENT: i64 = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct JournalConfig {
    pub journal_path: PathBuf,
    pub json_indent: usize,
    pub listen: SocketAddr,
    pub chart_width: f64,
    pub chart_height: f64,
    pub log_level: String,
    pub log_ansi: bool,
}

impl JournalConfig {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, JournalError> {
        let journal_path = config
            .get_string("journal", "path")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_JOURNAL_PATH.to_string());

        let indent = config.get_int("journal", "indent", 4);
        if !(0..=MAX_INDENT).contains(&indent) {
            return Err(invalid("journal", "indent", format!("must be between 0 and {MAX_INDENT}")));
        }

        let listen_str = config
            .get_string("web", "listen")
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let listen: SocketAddr = listen_str
            .trim()
            .parse()
            .map_err(|_| invalid("web", "listen", format!("'{listen_str}' is not a socket address")))?;

        let chart_width = config.get_double("charts", "width", 600.0);
        let chart_height = config.get_double("charts", "height", 300.0);
        // Charts reserve 40px of padding on every side.
        if chart_width < 160.0 || !chart_width.is_finite() {
            return Err(invalid("charts", "width", "must be at least 160"));
        }
        if chart_height < 160.0 || !chart_height.is_finite() {
            return Err(invalid("charts", "height", "must be at least 160"));
        }

        let log_level = config
            .get_string("logging", "level")
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        validate_log_level(&log_level)?;

        Ok(JournalConfig {
            journal_path: PathBuf::from(journal_path),
            json_indent: indent as usize,
            listen,
            chart_width,
            chart_height,
            log_level,
            log_ansi: config.get_bool("logging", "ansi", true),
        })
    }
}

/// A bare word must be a level name; anything with `=` or `,` is an
/// `EnvFilter` directive list such as `tradelog=debug,tower_http=info`.
fn validate_log_level(level: &str) -> Result<(), JournalError> {
    let level = level.trim();
    if level.contains(['=', ',']) {
        return EnvFilter::try_new(level)
            .map(|_| ())
            .map_err(|e| invalid("logging", "level", e.to_string()));
    }
    level.parse::<LevelFilter>().map(|_| ()).map_err(|_| {
        invalid(
            "logging",
            "level",
            format!("'{level}' is not one of trace, debug, info, warn, error, off"),
        )
    })
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> JournalError {
    JournalError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}
