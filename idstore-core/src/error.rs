//! Error types and result types for identity store operations.
//!
//! Only the structural operations (create, update, delete) can fail. Everything else
//! either returns a value, an empty/absent result, or silently does nothing.
//! Use [`IdentityStoreResult<T>`] as the return type for fallible operations.

use thiserror::Error;

use crate::record::RecordKind;

/// Represents the failures a structural store operation can report.
///
/// Both variants carry the kind of record involved and the id of the record that
/// was passed to the store. The [`Display`](std::fmt::Display) output doubles as the
/// human-readable description handed back to callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityStoreError {
    /// A record with the same id or normalized name is already stored.
    #[error("{0} already exists: {1}")]
    AlreadyExists(RecordKind, String),
    /// Neither the id nor the normalized name of the record matched a stored record.
    #[error("{0} not found: {1}")]
    NotFound(RecordKind, String),
}

impl IdentityStoreError {
    /// Returns a stable, machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            IdentityStoreError::AlreadyExists(RecordKind::User, _) => "DuplicateUser",
            IdentityStoreError::AlreadyExists(RecordKind::Role, _) => "DuplicateRole",
            IdentityStoreError::NotFound(RecordKind::User, _) => "UserNotFound",
            IdentityStoreError::NotFound(RecordKind::Role, _) => "RoleNotFound",
        }
    }

    /// Returns the human-readable description of this error.
    pub fn description(&self) -> String {
        self.to_string()
    }

    /// Returns the kind of record the failed operation targeted.
    pub fn kind(&self) -> RecordKind {
        match self {
            IdentityStoreError::AlreadyExists(kind, _) | IdentityStoreError::NotFound(kind, _) => *kind,
        }
    }
}

/// A specialized `Result` type for identity store operations.
///
/// This type alias is used throughout the workspace to indicate operations that may fail
/// with an [`IdentityStoreError`].
pub type IdentityStoreResult<T> = Result<T, IdentityStoreError>;
