//! Per-collection write locks.
//!
//! [`CollectionLocks`] maps collection names to a dedicated mutex. The map
//! itself sits behind its own mutex, which is held only long enough to look
//! up or insert an entry; the returned collection lock is then held for the
//! duration of the caller's I/O. Entries are never removed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A shared handle to one collection's lock.
pub type CollectionLock = Arc<Mutex<()>>;

/// Registry of per-collection locks, owned by a single store.
#[derive(Debug, Default)]
pub struct CollectionLocks {
    registry: Mutex<HashMap<String, CollectionLock>>,
}

impl CollectionLocks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the lock for `collection`, creating it on first use.
    pub fn lock_for(&self, collection: &str) -> CollectionLock {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(lock) = registry.get(collection) {
            return Arc::clone(lock);
        }
        let lock = CollectionLock::default();
        registry.insert(collection.to_string(), Arc::clone(&lock));
        lock
    }

    /// Number of collections that have a registered lock.
    pub fn len(&self) -> usize {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if no lock has been created yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Acquire a collection lock.
///
/// The lock guards no data, so a poisoned lock is still usable.
pub fn acquire(lock: &CollectionLock) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}
