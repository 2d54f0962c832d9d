//! The staging area.
//!
//! [`StagingArea`] is purely in-memory bookkeeping. Reading working files,
//! storing blobs and deleting files are the caller's job; this type only
//! decides what the next commit will contain.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use twig_dag::Snapshot;
use twig_types::ObjectId;

use crate::error::{IndexError, IndexResult};

/// Result of [`StagingArea::stage_addition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageOutcome {
    /// The content differs from the head and is now staged.
    Staged,
    /// The content matches the head; any pending change to the path was
    /// dropped.
    Unchanged,
}

/// Result of [`StagingArea::stage_removal`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// The path was only staged for addition and is now unstaged. The
    /// working file must be left alone.
    Unstaged,
    /// The path is tracked by the head and is now staged for removal. The
    /// working file should be deleted.
    MarkedForRemoval,
}

/// Pending changes for the next commit.
///
/// Invariant: a path never appears in both maps, and a path whose staged
/// blob equals the head's blob is never kept in `additions`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingArea {
    additions: BTreeMap<String, ObjectId>,
    removals: BTreeMap<String, ObjectId>,
}

impl StagingArea {
    /// Create an empty staging area.
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------
    // Stage operations
    // ---------------------------------------------------------------

    /// Stage `blob_id` as the new content of `path`.
    ///
    /// Any pending removal of `path` is dropped. If the content equals the
    /// head's tracked version, any pending addition is dropped as well and
    /// nothing new is recorded.
    pub fn stage_addition(
        &mut self,
        path: &str,
        blob_id: ObjectId,
        head: &Snapshot,
    ) -> IndexResult<StageOutcome> {
        validate_path(path)?;
        self.removals.remove(path);

        if head.get(path) == Some(&blob_id) {
            self.additions.remove(path);
            debug!(path, "content matches head, nothing staged");
            return Ok(StageOutcome::Unchanged);
        }

        self.additions.insert(path.to_string(), blob_id);
        debug!(path, blob = %blob_id.short_hex(12), "staged addition");
        Ok(StageOutcome::Staged)
    }

    /// Stage `path` for removal, or unstage a pending addition.
    pub fn stage_removal(&mut self, path: &str, head: &Snapshot) -> IndexResult<RemovalOutcome> {
        let was_added = self.additions.remove(path).is_some();
        match head.get(path) {
            Some(tracked) => {
                self.removals.insert(path.to_string(), *tracked);
                debug!(path, "staged removal");
                Ok(RemovalOutcome::MarkedForRemoval)
            }
            None if was_added => {
                debug!(path, "unstaged addition");
                Ok(RemovalOutcome::Unstaged)
            }
            None => Err(IndexError::NothingToRemove(path.to_string())),
        }
    }

    /// Snapshot of the next commit: `head`, overlaid with additions, minus
    /// removals.
    pub fn reconcile_for_commit(&self, head: &Snapshot) -> Snapshot {
        let mut next = head.clone();
        for (path, blob) in &self.additions {
            next.insert(path.clone(), *blob);
        }
        for path in self.removals.keys() {
            next.remove(path);
        }
        next
    }

    /// Drop every pending change.
    pub fn clear(&mut self) {
        self.additions.clear();
        self.removals.clear();
    }

    /// Returns `true` if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Paths staged for addition with their blob ids, sorted by path.
    pub fn additions(&self) -> &BTreeMap<String, ObjectId> {
        &self.additions
    }

    /// Paths staged for removal with the blob id they had in the head.
    pub fn removals(&self) -> &BTreeMap<String, ObjectId> {
        &self.removals
    }

    pub fn staged_addition(&self, path: &str) -> Option<ObjectId> {
        self.additions.get(path).copied()
    }

    pub fn is_staged_for_removal(&self, path: &str) -> bool {
        self.removals.contains_key(path)
    }

    // ---------------------------------------------------------------
    // Serialization
    // ---------------------------------------------------------------

    /// Serialize to bincode bytes.
    pub fn to_bytes(&self) -> IndexResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| IndexError::Serialization(e.to_string()))
    }

    /// Deserialize from bincode bytes.
    pub fn from_bytes(data: &[u8]) -> IndexResult<Self> {
        bincode::deserialize(data).map_err(|e| IndexError::Serialization(e.to_string()))
    }
}

/// Working-tree paths are plain file names: the tree is flat.
fn validate_path(path: &str) -> IndexResult<()> {
    if path.is_empty() || path == "." || path == ".." || path.contains(['/', '\\', '\0']) {
        return Err(IndexError::InvalidPath(path.to_string()));
    }
    Ok(())
}
