//! Store error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Category of a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum StoreErrorKind {
    /// The database file cannot be opened, created or initialized.
    #[display("Storage unavailable")]
    StorageUnavailable,
    /// A statement failed against an otherwise usable store.
    #[display("Storage error")]
    Storage,
    /// Caller-supplied data was rejected before any I/O.
    #[display("Validation error")]
    Validation,
}

/// Store error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("{}: {} at {}:{}", kind, message, file, line)]
pub struct StoreError {
    /// Error category.
    pub kind: StoreErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// The database file could not be opened or initialized.
    #[track_caller]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::StorageUnavailable, message)
    }

    /// A statement failed.
    #[track_caller]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Storage, message)
    }

    /// Input was rejected before touching the database.
    #[track_caller]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Validation, message)
    }

    /// Returns true if this is a validation failure.
    pub fn is_validation(&self) -> bool {
        self.kind == StoreErrorKind::Validation
    }
}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::storage(format!("Diesel error: {}", err))
    }
}

impl From<diesel::ConnectionError> for StoreError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::unavailable(format!("Connection error: {}", err))
    }
}
