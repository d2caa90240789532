//! Resolution caches.
//!
//! Each cache memoizes one kind of answer per key for the life of the process
//! (or until `flush()`). Entries are never updated in place. Concurrent first
//! lookups for the same key may each compute the value, but only the first one
//! inserted is kept and every caller returns that stored value.

pub mod command_type;
pub mod db_field;
pub mod handler;
pub mod mapped_name;
pub mod primary;
pub mod property;

use std::hash::Hash;

use dashmap::DashMap;

use crate::core::Result;

pub use command_type::CommandTypeCache;
pub use db_field::{DbFieldCache, PrimaryIdentityCache};
pub use handler::PropertyHandlerCache;
pub use mapped_name::MappedNameCache;
pub use primary::{IdentityCache, PrimaryCache};
pub use property::{ClassProperty, FieldCache, PropertyCache};

/// Insert-if-absent memo table shared by every cache.
pub struct MemoCache<K, V> {
    entries: DashMap<K, V>,
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Stored value for `key`, if any. Never blocks on other keys' computations.
    pub fn peek(&self, key: &K) -> Option<V> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Stores `value` unless another caller got there first; returns whichever
    /// value ended up stored.
    pub fn insert_if_absent(&self, key: K, value: V) -> V {
        self.entries.entry(key).or_insert(value).value().clone()
    }

    /// Returns the stored value or computes, stores and returns a new one.
    ///
    /// `compute` runs without any lock held, so it may consult other caches.
    /// A failed computation stores nothing.
    pub fn get_or_try_insert_with<F>(&self, key: K, compute: F) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        if let Some(hit) = self.peek(&key) {
            return Ok(hit);
        }
        let value = compute()?;
        Ok(self.insert_if_absent(key, value))
    }

    /// Removes the entry for `key` if `predicate` holds for its value.
    pub fn remove_if<F>(&self, key: &K, predicate: F) -> bool
    where
        F: FnOnce(&V) -> bool,
    {
        self.entries
            .remove_if(key, |_, value| predicate(value))
            .is_some()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl<K, V> Default for MemoCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
