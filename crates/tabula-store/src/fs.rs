//! Filesystem-backed document store.
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/
//!   <collection>/
//!     <resource>.json        # one document per resource
//!     <resource>.json.temp   # transient, only during an in-flight write
//! ```
//!
//! Writes go to the `.temp` sibling first and are then renamed over the
//! final path. Both files live in the same directory, so the rename is
//! atomic on POSIX filesystems and a reader sees either the old or the new
//! document, never a mixture.

use std::ffi::OsString;
use std::fs::{self, DirBuilder, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{StoreConfig, SyncMode};
use crate::error::{StoreError, StoreResult};
use crate::locks::{acquire, CollectionLocks};
use crate::names::{validate_collection, validate_resource, TEMP_SUFFIX};
use crate::traits::DocumentStore;

/// Extension of committed record files.
pub const RECORD_EXTENSION: &str = ".json";

/// What a `(collection, resource)` key currently resolves to on disk.
enum Target {
    /// A nested directory inside the collection.
    Directory(PathBuf),
    /// The `.json` record and/or a legacy extensionless file.
    Files(Vec<PathBuf>),
}

/// Document store rooted at a directory on the local filesystem.
///
/// The on-disk files are the only copy of the data; nothing is cached
/// between calls and no file handles stay open. Writes and deletes take the
/// collection's lock; reads do not.
pub struct FsDocumentStore {
    root: PathBuf,
    config: StoreConfig,
    locks: CollectionLocks,
}

impl FsDocumentStore {
    /// Open a store at `root` with default settings, creating the directory
    /// (and any missing parents) if needed.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        Self::with_config(StoreConfig::new(root.as_ref()))
    }

    /// Open a store with an explicit configuration.
    ///
    /// An existing root directory is used as-is; its contents are trusted.
    pub fn with_config(mut config: StoreConfig) -> StoreResult<Self> {
        let root = normalize_path(&config.root);

        if root.is_dir() {
            info!(root = %root.display(), "using existing store");
        } else {
            info!(root = %root.display(), "creating store");
            create_dir_all(&root, config.dir_mode)?;
        }

        config.root = root.clone();
        Ok(Self {
            root,
            config,
            locks: CollectionLocks::new(),
        })
    }

    /// The normalized root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The configuration this store was opened with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of collections that have had a lock created so far.
    pub fn collection_lock_count(&self) -> usize {
        self.locks.len()
    }

    fn collection_dir(&self, collection: &str) -> PathBuf {
        self.root.join(collection)
    }

    /// Path a read resolves to: the `.json` record, else a legacy
    /// extensionless file.
    fn locate_record(&self, collection: &str, resource: &str) -> Option<PathBuf> {
        let bare = self.collection_dir(collection).join(resource);
        let record = with_suffix(&bare, RECORD_EXTENSION);
        if record.is_file() {
            Some(record)
        } else if bare.is_file() {
            Some(bare)
        } else {
            None
        }
    }

    fn locate(&self, collection: &str, resource: &str) -> Option<Target> {
        let bare = self.collection_dir(collection).join(resource);
        if bare.is_dir() {
            return Some(Target::Directory(bare));
        }

        let record = with_suffix(&bare, RECORD_EXTENSION);
        let files: Vec<PathBuf> = [record, bare].into_iter().filter(|p| p.is_file()).collect();
        if files.is_empty() {
            None
        } else {
            Some(Target::Files(files))
        }
    }

    fn write_temp(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(self.config.file_mode);
        }

        let mut file = options.open(path)?;
        file.write_all(bytes)?;
        if self.config.sync == SyncMode::EveryWrite {
            file.sync_all()?;
        }
        Ok(())
    }
}

impl DocumentStore for FsDocumentStore {
    fn write_raw(&self, collection: &str, resource: &str, bytes: &[u8]) -> StoreResult<()> {
        validate_collection(collection)?;
        validate_resource(resource)?;

        let lock = self.locks.lock_for(collection);
        let _guard = acquire(&lock);

        let dir = self.collection_dir(collection);
        create_dir_all(&dir, self.config.dir_mode)?;

        let final_path = with_suffix(&dir.join(resource), RECORD_EXTENSION);
        let temp_path = with_suffix(&final_path, TEMP_SUFFIX);

        if temp_path.exists() {
            warn!(path = %temp_path.display(), "overwriting stale temp file");
        }

        // The final path is only touched by the rename.
        if let Err(e) = self.write_temp(&temp_path, bytes) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, &final_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        if self.config.sync == SyncMode::EveryWrite {
            sync_dir(&dir)?;
        }

        debug!(collection, resource, len = bytes.len(), "record written");
        Ok(())
    }

    fn read_raw(&self, collection: &str, resource: &str) -> StoreResult<Vec<u8>> {
        validate_collection(collection)?;
        validate_resource(resource)?;

        let path = self
            .locate_record(collection, resource)
            .ok_or_else(|| StoreError::record_not_found(collection, resource))?;

        fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::record_not_found(collection, resource),
            _ => StoreError::Io(e),
        })
    }

    fn read_all(&self, collection: &str) -> StoreResult<Vec<String>> {
        validate_collection(collection)?;

        let dir = self.collection_dir(collection);
        if !dir.is_dir() {
            return Err(StoreError::collection_not_found(collection));
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type()?.is_file() || is_temp_file(&path) {
                continue;
            }
            records.push(fs::read_to_string(&path)?);
        }

        debug!(collection, count = records.len(), "collection read");
        Ok(records)
    }

    fn delete(&self, collection: &str, resource: &str) -> StoreResult<()> {
        validate_collection(collection)?;
        validate_resource(resource)?;

        // Unknown keys fail before a lock is registered for the collection.
        if self.locate(collection, resource).is_none() {
            return Err(StoreError::record_not_found(collection, resource));
        }

        let lock = self.locks.lock_for(collection);
        let _guard = acquire(&lock);

        let not_found = |e: io::Error| match e.kind() {
            io::ErrorKind::NotFound => StoreError::record_not_found(collection, resource),
            _ => StoreError::Io(e),
        };

        match self.locate(collection, resource) {
            None => return Err(StoreError::record_not_found(collection, resource)),
            Some(Target::Directory(path)) => {
                fs::remove_dir_all(&path).map_err(not_found)?;
            }
            Some(Target::Files(paths)) => {
                for path in &paths {
                    fs::remove_file(path).map_err(not_found)?;
                }
            }
        }

        debug!(collection, resource, "record deleted");
        Ok(())
    }

    fn delete_collection(&self, collection: &str) -> StoreResult<()> {
        validate_collection(collection)?;

        let dir = self.collection_dir(collection);
        if !dir.is_dir() {
            return Err(StoreError::collection_not_found(collection));
        }

        let lock = self.locks.lock_for(collection);
        let _guard = acquire(&lock);

        fs::remove_dir_all(&dir).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::collection_not_found(collection),
            _ => StoreError::Io(e),
        })?;

        debug!(collection, "collection deleted");
        Ok(())
    }

    fn exists(&self, collection: &str, resource: &str) -> StoreResult<bool> {
        validate_collection(collection)?;
        validate_resource(resource)?;
        Ok(self.locate_record(collection, resource).is_some())
    }

    fn list_resources(&self, collection: &str) -> StoreResult<Vec<String>> {
        validate_collection(collection)?;

        let dir = self.collection_dir(collection);
        if !dir.is_dir() {
            return Err(StoreError::collection_not_found(collection));
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if name.ends_with(TEMP_SUFFIX) {
                continue;
            }
            let stem = name.strip_suffix(RECORD_EXTENSION).unwrap_or(&name);
            names.push(stem.to_string());
        }

        names.sort();
        names.dedup();
        Ok(names)
    }

    fn list_collections(&self) -> StoreResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

impl std::fmt::Debug for FsDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsDocumentStore")
            .field("root", &self.root)
            .field("sync", &self.config.sync)
            .field("collection_locks", &self.locks.len())
            .finish()
    }
}

/// Append `suffix` to the final path component (`a.b` + `.json` = `a.b.json`).
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

fn is_temp_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(TEMP_SUFFIX))
}

/// Lexically clean a path: drop `.` components and fold `name/..` pairs.
fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

fn create_dir_all(path: &Path, mode: u32) -> io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder.create(path)
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
