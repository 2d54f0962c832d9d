//! Commit records and their content-derived ids.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use twig_crypto::ContentHasher;
use twig_types::{ObjectId, Timestamp};

use crate::error::{DagError, DagResult};

/// Identifier of a commit.
pub type CommitId = ObjectId;

/// Complete tracked-tree state: path to blob id.
pub type Snapshot = BTreeMap<String, ObjectId>;

/// Message carried by the root commit of every repository.
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

/// An immutable commit.
///
/// The id is computed from every other field when the commit is built and is
/// never recomputed; a `Commit` cannot be mutated after construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    id: CommitId,
    message: String,
    timestamp: Timestamp,
    parent: Option<CommitId>,
    merge_parent: Option<CommitId>,
    snapshot: Snapshot,
}

/// Canonical JSON preimage for commit ids.
#[derive(Serialize)]
struct CommitPreimage<'a> {
    message: &'a str,
    timestamp_ms: i64,
    parent: Option<String>,
    merge_parent: Option<String>,
    snapshot: String,
}

impl Commit {
    /// Build a commit and derive its id.
    pub fn new(
        message: impl Into<String>,
        timestamp: Timestamp,
        parent: Option<CommitId>,
        merge_parent: Option<CommitId>,
        snapshot: Snapshot,
    ) -> DagResult<Self> {
        let message = message.into();
        let preimage = CommitPreimage {
            message: &message,
            timestamp_ms: timestamp.as_millis(),
            parent: parent.map(|p| p.to_hex()),
            merge_parent: merge_parent.map(|p| p.to_hex()),
            snapshot: snapshot_digest(&snapshot).to_hex(),
        };
        let id = ContentHasher::COMMIT
            .hash_json(&preimage)
            .map_err(|e| DagError::Serialization(e.to_string()))?;
        Ok(Self {
            id,
            message,
            timestamp,
            parent,
            merge_parent,
            snapshot,
        })
    }

    /// The root commit: empty snapshot, no parent, epoch timestamp.
    pub fn initial() -> DagResult<Self> {
        Self::new(
            INITIAL_COMMIT_MESSAGE,
            Timestamp::epoch(),
            None,
            None,
            Snapshot::new(),
        )
    }

    pub fn id(&self) -> CommitId {
        self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// First parent, `None` for the root commit.
    pub fn parent(&self) -> Option<CommitId> {
        self.parent
    }

    /// Second parent of a merge commit.
    pub fn merge_parent(&self) -> Option<CommitId> {
        self.merge_parent
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Blob id tracked at `path`, if any.
    pub fn blob_for(&self, path: &str) -> Option<ObjectId> {
        self.snapshot.get(path).copied()
    }

    /// Returns `true` if `path` is tracked by this commit.
    pub fn tracks(&self, path: &str) -> bool {
        self.snapshot.contains_key(path)
    }

    pub fn is_merge(&self) -> bool {
        self.merge_parent.is_some()
    }

    /// All parents, first parent first.
    pub fn parents(&self) -> impl Iterator<Item = CommitId> + '_ {
        self.parent.into_iter().chain(self.merge_parent)
    }
}

/// Order-independent digest of a snapshot.
///
/// `BTreeMap` iteration is sorted, so equal snapshots always feed the hasher
/// the same sequence of parts.
pub fn snapshot_digest(snapshot: &Snapshot) -> ObjectId {
    ContentHasher::SNAPSHOT.hash_parts(
        snapshot
            .iter()
            .flat_map(|(path, blob)| [path.as_bytes().to_vec(), blob.as_bytes().to_vec()]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn blob(byte: u8) -> ObjectId {
        ObjectId::from_hash([byte; 32])
    }

    fn snapshot(entries: &[(&str, u8)]) -> Snapshot {
        entries
            .iter()
            .map(|(path, b)| (path.to_string(), blob(*b)))
            .collect()
    }

    #[test]
    fn initial_commit_is_fixed() {
        let a = Commit::initial().unwrap();
        let b = Commit::initial().unwrap();
        assert_eq!(a.id(), b.id());
        assert_eq!(a.message(), "initial commit");
        assert_eq!(a.timestamp(), Timestamp::epoch());
        assert!(a.parent().is_none());
        assert!(a.snapshot().is_empty());
    }

    #[test]
    fn identical_fields_collapse_to_one_id() {
        let ts = Timestamp::from_millis(1000);
        let a = Commit::new("m", ts, None, None, snapshot(&[("a.txt", 1)])).unwrap();
        let b = Commit::new("m", ts, None, None, snapshot(&[("a.txt", 1)])).unwrap();
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn each_field_changes_the_id() {
        let ts = Timestamp::from_millis(1000);
        let parent = Some(blob(9));
        let base = Commit::new("m", ts, parent, None, snapshot(&[("a.txt", 1)])).unwrap();

        let variants = [
            Commit::new("n", ts, parent, None, snapshot(&[("a.txt", 1)])).unwrap(),
            Commit::new("m", Timestamp::from_millis(1001), parent, None, snapshot(&[("a.txt", 1)]))
                .unwrap(),
            Commit::new("m", ts, Some(blob(8)), None, snapshot(&[("a.txt", 1)])).unwrap(),
            Commit::new("m", ts, parent, Some(blob(7)), snapshot(&[("a.txt", 1)])).unwrap(),
            Commit::new("m", ts, parent, None, snapshot(&[("a.txt", 2)])).unwrap(),
            Commit::new("m", ts, parent, None, snapshot(&[("b.txt", 1)])).unwrap(),
        ];
        for v in &variants {
            assert_ne!(v.id(), base.id());
        }
    }

    #[test]
    fn parents_lists_first_then_merge() {
        let c = Commit::new("m", Timestamp::epoch(), Some(blob(1)), Some(blob(2)), Snapshot::new())
            .unwrap();
        assert!(c.is_merge());
        assert_eq!(c.parents().collect::<Vec<_>>(), vec![blob(1), blob(2)]);
    }

    #[test]
    fn blob_lookup() {
        let c = Commit::new("m", Timestamp::epoch(), None, None, snapshot(&[("a.txt", 3)]))
            .unwrap();
        assert!(c.tracks("a.txt"));
        assert_eq!(c.blob_for("a.txt"), Some(blob(3)));
        assert_eq!(c.blob_for("b.txt"), None);
    }

    #[test]
    fn snapshot_digest_distinguishes_path_boundaries() {
        let a = snapshot(&[("ab", 1)]);
        let b = snapshot(&[("a", 1)]);
        assert_ne!(snapshot_digest(&a), snapshot_digest(&b));
        assert_ne!(snapshot_digest(&Snapshot::new()), snapshot_digest(&a));
    }

    proptest! {
        #[test]
        fn id_is_a_pure_function_of_fields(
            msg in ".{0,40}",
            ms in 0i64..4_000_000_000_000,
            files in proptest::collection::btree_map("[a-z]{1,8}", any::<u8>(), 0..6),
        ) {
            let snap: Snapshot = files.iter().map(|(p, b)| (p.clone(), blob(*b))).collect();
            let a = Commit::new(msg.clone(), Timestamp::from_millis(ms), None, None, snap.clone()).unwrap();
            let b = Commit::new(msg, Timestamp::from_millis(ms), None, None, snap).unwrap();
            prop_assert_eq!(a.id(), b.id());
        }

        #[test]
        fn message_change_alters_id(msg in "[a-z]{1,20}", ms in 0i64..1_000_000) {
            let ts = Timestamp::from_millis(ms);
            let a = Commit::new(msg.clone(), ts, None, None, Snapshot::new()).unwrap();
            let b = Commit::new(format!("{msg}!"), ts, None, None, Snapshot::new()).unwrap();
            prop_assert_ne!(a.id(), b.id());
        }
    }
}
