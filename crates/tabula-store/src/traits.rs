use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::{decode_document, encode_document};
use crate::error::StoreResult;

/// Document store keyed by `(collection, resource)`.
///
/// All implementations must satisfy these invariants:
/// - Empty or otherwise unusable keys fail with `InvalidArgument`.
/// - A reader never observes a partially written record: it sees either the
///   previous complete document or the new one.
/// - Writes and deletes within one collection are serialized; different
///   collections do not block each other.
/// - Reads never take a collection lock.
/// - The store never interprets document contents beyond the JSON encoding.
/// - All I/O errors are propagated, never silently ignored.
pub trait DocumentStore: Send + Sync {
    /// Store already-encoded document bytes, replacing any previous version.
    fn write_raw(&self, collection: &str, resource: &str, bytes: &[u8]) -> StoreResult<()>;

    /// Read the stored bytes of one record.
    ///
    /// Returns `Err(NotFound)` if the record does not exist.
    fn read_raw(&self, collection: &str, resource: &str) -> StoreResult<Vec<u8>>;

    /// Read the raw JSON text of every record in a collection.
    ///
    /// Order is unspecified. Returns `Err(NotFound)` if the collection does
    /// not exist.
    fn read_all(&self, collection: &str) -> StoreResult<Vec<String>>;

    /// Delete one record (or a nested directory named `resource`).
    fn delete(&self, collection: &str, resource: &str) -> StoreResult<()>;

    /// Delete a collection and every record in it.
    fn delete_collection(&self, collection: &str) -> StoreResult<()>;

    /// Check whether a record exists.
    fn exists(&self, collection: &str, resource: &str) -> StoreResult<bool>;

    /// Sorted resource names in a collection.
    fn list_resources(&self, collection: &str) -> StoreResult<Vec<String>>;

    /// Sorted names of all collections.
    fn list_collections(&self) -> StoreResult<Vec<String>>;
}

/// Typed document helpers available on every [`DocumentStore`].
pub trait DocumentStoreExt: DocumentStore {
    /// Serialize `document` and store it under `(collection, resource)`.
    fn write<T: Serialize + ?Sized>(
        &self,
        collection: &str,
        resource: &str,
        document: &T,
    ) -> StoreResult<()> {
        let bytes = encode_document(document)?;
        self.write_raw(collection, resource, &bytes)
    }

    /// Read a record and deserialize it into `T`.
    fn read<T: DeserializeOwned>(&self, collection: &str, resource: &str) -> StoreResult<T> {
        let bytes = self.read_raw(collection, resource)?;
        decode_document(&bytes)
    }

    /// Read every record of a collection and deserialize each into `T`.
    fn read_all_as<T: DeserializeOwned>(&self, collection: &str) -> StoreResult<Vec<T>> {
        self.read_all(collection)?
            .iter()
            .map(|text| decode_document(text.as_bytes()))
            .collect()
    }
}

impl<S: DocumentStore + ?Sized> DocumentStoreExt for S {}
