//! Error types for leadsync-core

use crate::model::EntityKind;
use crate::ports::TrackerError;

/// Result type for leadsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in leadsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Lead status outside the known set
    #[error("Unknown lead status: {value}")]
    UnknownStatus { value: String },

    /// Work list outside the known set
    #[error("Unknown work list: {value}")]
    UnknownList { value: String },

    /// Persisted mapping violates the inverse-map invariant
    #[error("Identity mapping is inconsistent: {message}")]
    MappingInconsistency { message: String },

    /// Single-item sync could not find or repair a counterpart
    #[error("No linked counterpart for {kind} {id}")]
    NotMapped { kind: EntityKind, id: String },

    /// Lead data rejected before creation
    #[error("Invalid lead: {message}")]
    InvalidLead { message: String },

    /// Configuration could not be resolved
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Failure reported by a tracker port
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// Persistence error from leadsync-fs
    #[error(transparent)]
    Fs(#[from] leadsync_fs::Error),
}

impl Error {
    /// Whether the error is confined to a single lead/card.
    ///
    /// Item-scoped errors are recorded in the pass summary and the pass moves
    /// on. Everything else (persistence, mapping integrity, config) aborts the
    /// pass.
    pub fn is_item_scoped(&self) -> bool {
        matches!(
            self,
            Error::UnknownStatus { .. }
                | Error::UnknownList { .. }
                | Error::NotMapped { .. }
                | Error::InvalidLead { .. }
                | Error::Tracker(_)
        )
    }

    pub fn inconsistent(message: impl Into<String>) -> Self {
        Self::MappingInconsistency {
            message: message.into(),
        }
    }
}
