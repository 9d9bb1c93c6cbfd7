//! Error types for leadsync-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from leadsync-core
    #[error(transparent)]
    Core(#[from] leadsync_core::Error),

    /// Error from leadsync-fs
    #[error(transparent)]
    Fs(#[from] leadsync_fs::Error),

    /// Failure reported by one of the trackers
    #[error(transparent)]
    Tracker(#[from] leadsync_core::TrackerError),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Interactive prompt error
    #[error("Interactive prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// Report could not be rendered as JSON
    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
