//! Error taxonomy for the transaction state core.
//!
//! Validation failures are raised before any I/O is attempted and never
//! corrupt state; storage failures surface as an error state carrying the
//! previous known-good data so the display layer keeps showing stale rather
//! than blank.

use shared::ValidationError;
use thiserror::Error;

/// All failures an operation against the ledger can produce.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Client-side input problem, detected before any I/O
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The underlying record store failed
    #[error("storage failure: {0}")]
    Storage(String),

    /// An operation referenced a record key that does not exist
    #[error("no transaction with id {0}")]
    NotFound(i64),

    /// Reserved for future remote sync; unused by current operations
    #[error("network unavailable: {0}")]
    Network(String),

    /// Catch-all for anything not already classified above
    #[error("unexpected error: {0}")]
    Unknown(#[from] anyhow::Error),
}

/// Discriminant of [`LedgerError`], suitable for carrying inside state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Storage,
    NotFound,
    Network,
    Unknown,
}

/// Cloneable, comparable projection of a [`LedgerError`] for observers.
///
/// Application state must be cheap to clone and compare, which the full
/// error (with its `anyhow` payload) is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&LedgerError> for ErrorInfo {
    fn from(error: &LedgerError) -> Self {
        let kind = match error {
            LedgerError::Validation(_) => ErrorKind::Validation,
            LedgerError::Storage(_) => ErrorKind::Storage,
            LedgerError::NotFound(_) => ErrorKind::NotFound,
            LedgerError::Network(_) => ErrorKind::Network,
            LedgerError::Unknown(_) => ErrorKind::Unknown,
        };
        Self {
            kind,
            message: error.to_string(),
        }
    }
}
