//! The id and normalized-name index behind every in-memory store.

use std::collections::HashMap;

use idstore_core::record::{Record, RecordKey, RecordRef};

/// A stored record together with the keys it was indexed under.
#[derive(Debug)]
struct Entry<R> {
    key: RecordKey,
    record: RecordRef<R>,
}

/// Records indexed by id, with a secondary index from normalized name to id.
///
/// Keys are captured when a record is inserted and moved by [`RecordIndex::rename`].
/// Record ids cannot change after construction, so only the name key can drift, and
/// only when a caller writes the name field directly instead of going through a store.
#[derive(Debug)]
pub(crate) struct RecordIndex<R> {
    by_id: HashMap<String, Entry<R>>,
    by_name: HashMap<String, String>,
}

impl<R> Default for RecordIndex<R> {
    fn default() -> Self {
        Self {
            by_id: HashMap::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<R: Record> RecordIndex<R> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            by_id: HashMap::with_capacity(capacity),
            by_name: HashMap::with_capacity(capacity),
        }
    }

    /// Finds the stored id matching `key`, trying the id first and the normalized name second.
    pub(crate) fn locate(&self, key: &RecordKey) -> Option<String> {
        if self.by_id.contains_key(&key.id) {
            return Some(key.id.clone());
        }

        key.normalized_name
            .as_ref()
            .and_then(|name| self.by_name.get(name))
            .cloned()
    }

    /// Returns the id indexed under `normalized_name`, if any.
    pub(crate) fn owner_of_name(&self, normalized_name: &str) -> Option<&str> {
        self.by_name
            .get(normalized_name)
            .map(String::as_str)
    }

    pub(crate) fn insert(&mut self, key: RecordKey, record: RecordRef<R>) {
        if let Some(name) = &key.normalized_name {
            self.by_name.insert(name.clone(), key.id.clone());
        }

        self.by_id.insert(key.id.clone(), Entry { key, record });
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<RecordRef<R>> {
        let entry = self.by_id.remove(id)?;

        if let Some(name) = &entry.key.normalized_name {
            self.release_name(name, id);
        }

        Some(entry.record)
    }

    /// Moves the record stored under `id` to a new normalized name.
    ///
    /// A name already owned by another record stays with its owner; the renamed record
    /// inherits it only once the owner releases it.
    pub(crate) fn rename(&mut self, id: &str, normalized_name: Option<String>) {
        let Some(entry) = self.by_id.get_mut(id) else {
            return;
        };
        let previous = std::mem::replace(&mut entry.key.normalized_name, normalized_name.clone());

        if let Some(name) = previous {
            self.release_name(&name, id);
        }

        if let Some(name) = normalized_name {
            self.by_name.entry(name).or_insert_with(|| id.to_string());
        }
    }

    /// Drops `name` from the name index if `id` owns it, handing it to another record
    /// still keyed under the same name.
    fn release_name(&mut self, name: &str, id: &str) {
        if !self.by_name.get(name).is_some_and(|owner| owner == id) {
            return;
        }

        let heir = self
            .by_id
            .iter()
            .find(|(other, entry)| {
                other.as_str() != id && entry.key.normalized_name.as_deref() == Some(name)
            })
            .map(|(other, _)| other.clone());

        match heir {
            Some(other) => {
                self.by_name.insert(name.to_string(), other);
            }
            None => {
                self.by_name.remove(name);
            }
        }
    }

    pub(crate) fn get(&self, id: &str) -> Option<&RecordRef<R>> {
        self.by_id
            .get(id)
            .map(|entry| &entry.record)
    }

    pub(crate) fn get_by_name(&self, normalized_name: &str) -> Option<&RecordRef<R>> {
        self.by_name
            .get(normalized_name)
            .and_then(|id| self.get(id))
    }

    pub(crate) fn records(&self) -> impl Iterator<Item = &RecordRef<R>> {
        self.by_id
            .values()
            .map(|entry| &entry.record)
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    pub(crate) fn clear(&mut self) {
        self.by_id.clear();
        self.by_name.clear();
    }
}
