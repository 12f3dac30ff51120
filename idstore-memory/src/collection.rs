//! The lock-guarded record collection shared by the user and role stores.

use mea::rwlock::RwLock;
use std::fmt::Debug;
use tracing::{debug, trace};

use idstore_core::{
    error::{IdentityStoreError, IdentityStoreResult},
    record::{Record, RecordRef},
};

use crate::index::RecordIndex;

/// A collection of records guarded by one reader-writer lock.
///
/// Structural changes take the write lock for their whole find-then-act sequence.
/// Keys are read from the argument record before the collection is locked, and scans
/// copy the handles out before visiting records. Renames are the one place a record
/// lock is taken under the collection lock; the reverse order never happens, since
/// record closures are synchronous.
#[derive(Debug)]
pub(crate) struct RecordCollection<R> {
    index: RwLock<RecordIndex<R>>,
}

impl<R> Default for RecordCollection<R> {
    fn default() -> Self {
        Self {
            index: RwLock::new(RecordIndex::default()),
        }
    }
}

impl<R: Record + Debug> RecordCollection<R> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            index: RwLock::new(RecordIndex::with_capacity(capacity)),
        }
    }

    pub(crate) async fn create(&self, record: &RecordRef<R>) -> IdentityStoreResult<()> {
        let kind = R::kind();
        let key = record.key().await;
        let mut index = self.index.write().await;

        if let Some(existing) = index.locate(&key) {
            debug!(%kind, id = %key.id, %existing, "Rejected create, record already exists");
            return Err(IdentityStoreError::AlreadyExists(kind, key.id));
        }

        debug!(%kind, id = %key.id, "Created record");
        index.insert(key, record.clone());

        Ok(())
    }

    pub(crate) async fn update(&self, record: &RecordRef<R>) -> IdentityStoreResult<()> {
        let kind = R::kind();
        let key = record.key().await;
        let mut index = self.index.write().await;

        let Some(existing) = index.locate(&key) else {
            debug!(%kind, id = %key.id, "Rejected update, record not found");
            return Err(IdentityStoreError::NotFound(kind, key.id));
        };

        if let Some(name) = &key.normalized_name {
            if index.owner_of_name(name).is_some_and(|owner| owner != existing) {
                debug!(%kind, id = %key.id, name = %name, "Rejected update, name taken by another record");
                return Err(IdentityStoreError::AlreadyExists(kind, key.id));
            }
        }

        index.remove(&existing);
        debug!(%kind, id = %key.id, replaced = %existing, "Updated record");
        index.insert(key, record.clone());

        Ok(())
    }

    pub(crate) async fn delete(&self, record: &RecordRef<R>) -> IdentityStoreResult<()> {
        let kind = R::kind();
        let key = record.key().await;
        let mut index = self.index.write().await;

        let Some(existing) = index.locate(&key) else {
            debug!(%kind, id = %key.id, "Rejected delete, record not found");
            return Err(IdentityStoreError::NotFound(kind, key.id));
        };

        index.remove(&existing);
        debug!(%kind, id = %existing, "Deleted record");

        Ok(())
    }

    pub(crate) async fn find_by_id(&self, id: &str) -> Option<RecordRef<R>> {
        self.index
            .read()
            .await
            .get(id)
            .cloned()
    }

    /// Sets the normalized name of `record`, moving it in the name index when the
    /// handle is the one stored here.
    pub(crate) async fn rename(&self, record: &RecordRef<R>, normalized_name: Option<String>) {
        let kind = R::kind();
        let mut index = self.index.write().await;

        let id = record
            .write(|r| {
                r.set_normalized_name(normalized_name.clone());
                r.id().to_string()
            })
            .await;

        if index.get(&id).is_some_and(|stored| stored.ptr_eq(record)) {
            trace!(%kind, %id, name = ?normalized_name, "Re-indexed record");
            index.rename(&id, normalized_name);
        }
    }

    /// Finds the record currently holding `normalized_name`.
    ///
    /// The indexed candidate is checked against its current state. A name written
    /// straight through a handle is still found, by a scan.
    pub(crate) async fn find_by_name(&self, normalized_name: &str) -> Option<RecordRef<R>> {
        let candidate = self
            .index
            .read()
            .await
            .get_by_name(normalized_name)
            .cloned();

        if let Some(record) = candidate {
            if record.read(|r| r.normalized_name() == Some(normalized_name)).await {
                return Some(record);
            }
        }

        self.find(|r| r.normalized_name() == Some(normalized_name))
            .await
    }

    /// Copies out a handle to every stored record.
    pub(crate) async fn all(&self) -> Vec<RecordRef<R>> {
        self.index
            .read()
            .await
            .records()
            .cloned()
            .collect()
    }

    /// Returns every record whose current state satisfies `predicate`.
    pub(crate) async fn filter<F>(&self, predicate: F) -> Vec<RecordRef<R>>
    where
        F: Fn(&R) -> bool + Send + Sync,
    {
        let mut matched = Vec::new();

        for record in self.all().await {
            if record.read(&predicate).await {
                matched.push(record);
            }
        }

        matched
    }

    /// Returns the first record whose current state satisfies `predicate`.
    pub(crate) async fn find<F>(&self, predicate: F) -> Option<RecordRef<R>>
    where
        F: Fn(&R) -> bool + Send + Sync,
    {
        for record in self.all().await {
            if record.read(&predicate).await {
                return Some(record);
            }
        }

        None
    }

    pub(crate) async fn len(&self) -> usize {
        self.index.read().await.len()
    }

    pub(crate) async fn clear(&self) {
        let kind = R::kind();
        self.index.write().await.clear();
        debug!(%kind, "Cleared records");
    }
}
