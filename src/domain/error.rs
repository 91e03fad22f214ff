//! Domain error types.

/// Top-level error type for tradelog.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("trade store {path}: {reason}")]
    Store { path: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl JournalError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        JournalError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn missing(field: &str) -> Self {
        JournalError::MissingField {
            field: field.to_string(),
        }
    }

    /// True for errors caused by what the user typed, as opposed to the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            JournalError::InvalidField { .. } | JournalError::MissingField { .. }
        )
    }
}

impl From<&JournalError> for std::process::ExitCode {
    fn from(err: &JournalError) -> Self {
        let code: u8 = match err {
            JournalError::Io(_) | JournalError::Csv(_) => 1,
            JournalError::ConfigParse { .. } | JournalError::ConfigInvalid { .. } => 2,
            JournalError::Store { .. } => 3,
            JournalError::InvalidField { .. } | JournalError::MissingField { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
