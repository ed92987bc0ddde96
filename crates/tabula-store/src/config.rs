use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Flush strategy for record writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// `fsync` the temp file before the rename and the collection directory
    /// after it (safest, highest latency).
    EveryWrite,
    /// Rely on OS page-cache buffering. The rename is still atomic, but a
    /// power loss may roll a record back to its previous version.
    #[default]
    OsDefault,
}

/// Configuration for a [`FsDocumentStore`](crate::FsDocumentStore).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Root directory; each collection is a subdirectory of it.
    pub root: PathBuf,
    /// Sync/flush strategy.
    pub sync: SyncMode,
    /// Unix permission bits for created directories.
    pub dir_mode: u32,
    /// Unix permission bits for record files.
    pub file_mode: u32,
}

impl StoreConfig {
    /// Default configuration rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./collections"),
            sync: SyncMode::default(),
            dir_mode: 0o755,
            file_mode: 0o644,
        }
    }
}
