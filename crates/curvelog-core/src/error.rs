//! History error types.

use crate::types::EbmMode;
use thiserror::Error;

/// Errors that can occur during history operations.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Redo requested with an empty redo buffer.
    #[error("nothing to redo")]
    NothingToRedo,

    /// A commit, feature or pending edit that an operation needs is missing.
    #[error("not found: {0}")]
    NotFound(String),

    /// The commit log is malformed (e.g. an edit with no origin commit).
    #[error("history invariant violated: {0}")]
    InvariantViolation(String),

    /// The binning engine failed; the navigation was aborted before any
    /// history or working-state mutation.
    #[error("binning engine failed in {mode} mode")]
    ComputationFailed {
        mode: EbmMode,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, HistoryError>;
