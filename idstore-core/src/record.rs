//! Traits and handles shared by every record kept in an identity store.
//!
//! A store never owns a private copy of a record. Callers and the store share the
//! same [`RecordRef`], so a change made through one handle is visible through every
//! other handle, including the ones the store keeps in its collection.

use mea::rwlock::RwLock;
use std::{fmt, sync::Arc};

/// The kind of record a store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    User,
    Role,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::User => write!(f, "User"),
            RecordKind::Role => write!(f, "Role"),
        }
    }
}

/// The pair of keys a store uses to enforce uniqueness.
///
/// Stores look records up by `id` first and fall back to `normalized_name`.
/// An absent normalized name never matches anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKey {
    pub id: String,
    pub normalized_name: Option<String>,
}

/// Core trait implemented by the user and role record types.
pub trait Record: Send + Sync + 'static {
    /// Returns the caller-assigned identifier of this record.
    fn id(&self) -> &str;

    /// Returns the normalized name used for lookups, if one has been set.
    fn normalized_name(&self) -> Option<&str>;

    /// Replaces the normalized name used for lookups.
    fn set_normalized_name(&mut self, normalized_name: Option<String>);

    /// Returns the kind of this record, used in errors and log events.
    fn kind() -> RecordKind;

    /// Captures the current uniqueness keys of this record.
    fn key(&self) -> RecordKey {
        RecordKey {
            id: self.id().to_string(),
            normalized_name: self.normalized_name().map(str::to_string),
        }
    }
}

/// A shared, lockable handle to a record.
///
/// Cloning a `RecordRef` clones the handle, not the record. Field and
/// sub-collection edits go through [`RecordRef::write`], which holds the
/// record's own lock for the duration of the closure.
pub struct RecordRef<R> {
    inner: Arc<RwLock<R>>,
}

impl<R> RecordRef<R> {
    /// Wraps a record into a new shared handle.
    pub fn new(record: R) -> Self {
        Self {
            inner: Arc::new(RwLock::new(record)),
        }
    }

    /// Runs `f` with shared access to the record.
    pub async fn read<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        let guard = self.inner.read().await;
        f(&*guard)
    }

    /// Runs `f` with exclusive access to the record.
    pub async fn write<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        let mut guard = self.inner.write().await;
        f(&mut *guard)
    }

    /// Returns `true` when both handles point at the same record.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<R: Clone> RecordRef<R> {
    /// Returns a detached copy of the record's current state.
    pub async fn snapshot(&self) -> R {
        self.read(R::clone).await
    }
}

impl<R: Record> RecordRef<R> {
    /// Captures the current uniqueness keys of the record.
    pub async fn key(&self) -> RecordKey {
        self.read(|record| record.key()).await
    }
}

impl<R> Clone for RecordRef<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R> From<R> for RecordRef<R> {
    fn from(record: R) -> Self {
        Self::new(record)
    }
}

impl<R: fmt::Debug> fmt::Debug for RecordRef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordRef")
            .field("inner", &self.inner)
            .finish()
    }
}
