//! Embedded JSON document storage for Tabula.
//!
//! Documents are addressed by a `(collection, resource)` pair. On disk a
//! collection is a directory under the store root and each resource is one
//! `<resource>.json` file inside it.
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`FsDocumentStore`] -- durable, filesystem-backed store
//! - [`InMemoryDocumentStore`] -- `HashMap`-based store for tests and embedding
//!
//! Typed access goes through [`DocumentStoreExt`], which is implemented for
//! every backend:
//!
//! ```no_run
//! use serde::{Deserialize, Serialize};
//! use tabula_store::{DocumentStoreExt, FsDocumentStore};
//!
//! #[derive(Serialize, Deserialize)]
//! struct User {
//!     name: String,
//!     age: u32,
//! }
//!
//! let store = FsDocumentStore::open("./collections")?;
//! store.write("users", "John", &User { name: "John".into(), age: 23 })?;
//! let john: User = store.read("users", "John")?;
//! assert_eq!(john.age, 23);
//! # Ok::<(), tabula_store::StoreError>(())
//! ```
//!
//! # Design Rules
//!
//! 1. A record is replaced by writing a sibling temp file and renaming it, so
//!    readers see the old or the new document and never a partial one.
//! 2. Writes and deletes are serialized per collection but parallel across
//!    collections. Reads take no lock.
//! 3. Collection locks are created lazily and live as long as the store.
//! 4. The store never interprets document contents.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod codec;
pub mod config;
pub mod error;
pub mod fs;
pub mod locks;
pub mod memory;
pub mod names;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use codec::{decode_document, encode_document};
pub use config::{StoreConfig, SyncMode};
pub use error::{StoreError, StoreResult};
pub use fs::FsDocumentStore;
pub use memory::InMemoryDocumentStore;
pub use traits::{DocumentStore, DocumentStoreExt};
