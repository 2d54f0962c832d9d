//! Persistence for repository state records.
//!
//! The commit graph, branch table and staging area are each saved as one
//! opaque bincode record. A [`RecordStore`] only moves bytes; encoding lives
//! with the types themselves.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use tempfile::NamedTempFile;

use crate::error::TwigResult;

/// The records that make up repository state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Graph,
    Branches,
    Staging,
}

impl RecordKey {
    pub const ALL: [RecordKey; 3] = [Self::Graph, Self::Branches, Self::Staging];

    /// File name of the record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Graph => "graph",
            Self::Branches => "branches",
            Self::Staging => "staging",
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyed byte storage for state records.
pub trait RecordStore: Send + Sync {
    /// Read a record. Returns `Ok(None)` if it was never saved.
    fn load(&self, key: RecordKey) -> TwigResult<Option<Vec<u8>>>;

    /// Replace a record. A single save is atomic.
    fn save(&self, key: RecordKey, data: &[u8]) -> TwigResult<()>;

    /// Returns `true` once a repository has been created in this store.
    fn is_initialized(&self) -> TwigResult<bool>;
}

// ---------------------------------------------------------------------------
// Filesystem
// ---------------------------------------------------------------------------

/// Records stored as files directly under the metadata directory.
#[derive(Debug, Clone)]
pub struct FsRecordStore {
    root: PathBuf,
}

impl FsRecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, key: RecordKey) -> PathBuf {
        self.root.join(key.as_str())
    }
}

impl RecordStore for FsRecordStore {
    fn load(&self, key: RecordKey) -> TwigResult<Option<Vec<u8>>> {
        match fs::read(self.path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: RecordKey, data: &[u8]) -> TwigResult<()> {
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_data()?;
        tmp.persist(self.path(key)).map_err(|e| e.error)?;
        Ok(())
    }

    fn is_initialized(&self) -> TwigResult<bool> {
        Ok(self.path(RecordKey::Branches).is_file())
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Records held in memory, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<HashMap<RecordKey, Vec<u8>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn load(&self, key: RecordKey) -> TwigResult<Option<Vec<u8>>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Ok(records.get(&key).cloned())
    }

    fn save(&self, key: RecordKey, data: &[u8]) -> TwigResult<()> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.insert(key, data.to_vec());
        Ok(())
    }

    fn is_initialized(&self) -> TwigResult<bool> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Ok(records.contains_key(&RecordKey::Branches))
    }
}
