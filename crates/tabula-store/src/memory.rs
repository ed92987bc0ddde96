use std::collections::{BTreeMap, HashMap};
use std::io;
use std::sync::{PoisonError, RwLock};

use crate::error::{StoreError, StoreResult};
use crate::names::{validate_collection, validate_resource};
use crate::traits::DocumentStore;

type Collection = BTreeMap<String, Vec<u8>>;

/// In-memory document store.
///
/// Intended for tests and embedding where durability is not wanted. All
/// collections live behind one `RwLock`; a write swaps in the complete new
/// byte vector, so readers observe whole documents only. Data is lost when
/// the store is dropped.
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Number of records across all collections.
    pub fn len(&self) -> usize {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(BTreeMap::len)
            .sum()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every collection.
    pub fn clear(&self) {
        self.collections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn write_raw(&self, collection: &str, resource: &str, bytes: &[u8]) -> StoreResult<()> {
        validate_collection(collection)?;
        validate_resource(resource)?;
        let mut map = self.collections.write().unwrap_or_else(PoisonError::into_inner);
        map.entry(collection.to_string())
            .or_default()
            .insert(resource.to_string(), bytes.to_vec());
        Ok(())
    }

    fn read_raw(&self, collection: &str, resource: &str) -> StoreResult<Vec<u8>> {
        validate_collection(collection)?;
        validate_resource(resource)?;
        let map = self.collections.read().unwrap_or_else(PoisonError::into_inner);
        map.get(collection)
            .and_then(|c| c.get(resource))
            .cloned()
            .ok_or_else(|| StoreError::record_not_found(collection, resource))
    }

    fn read_all(&self, collection: &str) -> StoreResult<Vec<String>> {
        validate_collection(collection)?;
        let map = self.collections.read().unwrap_or_else(PoisonError::into_inner);
        let records = map
            .get(collection)
            .ok_or_else(|| StoreError::collection_not_found(collection))?;
        records
            .values()
            .map(|bytes| {
                String::from_utf8(bytes.clone())
                    .map_err(|e| StoreError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
            })
            .collect()
    }

    fn delete(&self, collection: &str, resource: &str) -> StoreResult<()> {
        validate_collection(collection)?;
        validate_resource(resource)?;
        let mut map = self.collections.write().unwrap_or_else(PoisonError::into_inner);
        map.get_mut(collection)
            .and_then(|c| c.remove(resource))
            .map(|_| ())
            .ok_or_else(|| StoreError::record_not_found(collection, resource))
    }

    fn delete_collection(&self, collection: &str) -> StoreResult<()> {
        validate_collection(collection)?;
        let mut map = self.collections.write().unwrap_or_else(PoisonError::into_inner);
        map.remove(collection)
            .map(|_| ())
            .ok_or_else(|| StoreError::collection_not_found(collection))
    }

    fn exists(&self, collection: &str, resource: &str) -> StoreResult<bool> {
        validate_collection(collection)?;
        validate_resource(resource)?;
        let map = self.collections.read().unwrap_or_else(PoisonError::into_inner);
        Ok(map.get(collection).is_some_and(|c| c.contains_key(resource)))
    }

    fn list_resources(&self, collection: &str) -> StoreResult<Vec<String>> {
        validate_collection(collection)?;
        let map = self.collections.read().unwrap_or_else(PoisonError::into_inner);
        map.get(collection)
            .map(|c| c.keys().cloned().collect())
            .ok_or_else(|| StoreError::collection_not_found(collection))
    }

    fn list_collections(&self) -> StoreResult<Vec<String>> {
        let map = self.collections.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = map.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDocumentStore")
            .field("record_count", &self.len())
            .finish()
    }
}
