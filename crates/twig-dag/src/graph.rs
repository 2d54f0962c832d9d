//! The commit graph and its traversal algorithms.
//!
//! [`CommitGraph`] stores every commit ever created, keyed by id. It is
//! append-only: commits are inserted and never removed or modified.
//!
//! # Invariants
//!
//! - Every parent reference resolves to a commit in the graph.
//! - The graph is acyclic (parents always exist before their children).

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::debug;

use twig_types::Timestamp;

use crate::commit::{Commit, CommitId, Snapshot};
use crate::error::{DagError, DagResult};

/// All commits of a repository.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CommitGraph {
    commits: HashMap<CommitId, Commit>,
}

impl CommitGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of commits.
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    /// Returns `true` if the graph has no commits.
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    // ---------------------------------------------------------------
    // Creation
    // ---------------------------------------------------------------

    /// Insert the root commit and return its id.
    pub fn create_initial(&mut self) -> DagResult<CommitId> {
        self.insert(Commit::initial()?)
    }

    /// Create an ordinary commit on top of `parent`.
    ///
    /// Fails if the message is empty or if `snapshot` is identical to the
    /// parent's snapshot.
    pub fn create_commit(
        &mut self,
        message: &str,
        parent: CommitId,
        snapshot: Snapshot,
        timestamp: Timestamp,
    ) -> DagResult<CommitId> {
        if message.is_empty() {
            return Err(DagError::EmptyCommitMessage);
        }
        if self.get(&parent)?.snapshot() == &snapshot {
            return Err(DagError::NothingToCommit);
        }
        self.insert(Commit::new(message, timestamp, Some(parent), None, snapshot)?)
    }

    /// Create a two-parent commit recording a merge.
    ///
    /// The snapshot may equal the parent's; the commit still records that
    /// the histories were joined.
    pub fn create_merge_commit(
        &mut self,
        message: &str,
        parent: CommitId,
        merge_parent: CommitId,
        snapshot: Snapshot,
        timestamp: Timestamp,
    ) -> DagResult<CommitId> {
        if message.is_empty() {
            return Err(DagError::EmptyCommitMessage);
        }
        self.insert(Commit::new(
            message,
            timestamp,
            Some(parent),
            Some(merge_parent),
            snapshot,
        )?)
    }

    /// Add an already-built commit.
    ///
    /// Inserting a commit whose id is already present is a no-op.
    pub fn insert(&mut self, commit: Commit) -> DagResult<CommitId> {
        let id = commit.id();
        if self.commits.contains_key(&id) {
            return Ok(id);
        }
        for parent in commit.parents() {
            if !self.commits.contains_key(&parent) {
                return Err(DagError::DanglingParent { commit: id, parent });
            }
        }
        debug!(commit = %id.short_hex(12), message = commit.message(), "added commit");
        self.commits.insert(id, commit);
        Ok(id)
    }

    // ---------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------

    /// Retrieve a commit by full id.
    pub fn get(&self, id: &CommitId) -> DagResult<&Commit> {
        self.commits.get(id).ok_or(DagError::NoSuchCommit(*id))
    }

    pub fn contains(&self, id: &CommitId) -> bool {
        self.commits.contains_key(id)
    }

    /// Resolve a hex prefix (case-insensitive, any non-empty length) to the
    /// unique commit it names.
    pub fn resolve_abbreviated(&self, prefix: &str) -> DagResult<CommitId> {
        let mut matches = self
            .commits
            .keys()
            .filter(|id| id.matches_prefix(prefix));
        match (matches.next(), matches.next()) {
            (Some(id), None) => Ok(*id),
            _ => Err(DagError::AmbiguousOrNoSuchCommit(prefix.to_string())),
        }
    }

    /// Ids of every commit whose message equals `message`, sorted.
    pub fn find_by_message(&self, message: &str) -> Vec<CommitId> {
        let mut ids: Vec<CommitId> = self
            .commits
            .values()
            .filter(|c| c.message() == message)
            .map(Commit::id)
            .collect();
        ids.sort();
        ids
    }

    /// Every commit exactly once, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Commit> {
        self.commits.values()
    }

    // ---------------------------------------------------------------
    // Ancestry
    // ---------------------------------------------------------------

    /// First-parent chain from the root to `head`, oldest first.
    pub fn ancestor_chain(&self, head: &CommitId) -> DagResult<Vec<&Commit>> {
        let mut chain = Vec::new();
        let mut current = Some(*head);
        while let Some(id) = current {
            let commit = self.get(&id)?;
            chain.push(commit);
            current = commit.parent();
        }
        chain.reverse();
        Ok(chain)
    }

    /// Returns `true` if `ancestor` is reachable from `descendant` through
    /// any parent edges. A commit is its own ancestor.
    pub fn is_ancestor(&self, ancestor: &CommitId, descendant: &CommitId) -> bool {
        self.ancestors_set(descendant).contains(ancestor)
    }

    /// Nearest common ancestor of `current` and `given`.
    ///
    /// Collects every ancestor of `given`, then walks breadth-first from
    /// `current` and returns the first commit found in that set. Both walks
    /// follow first and merge parents.
    pub fn merge_base(&self, current: &CommitId, given: &CommitId) -> DagResult<CommitId> {
        self.get(current)?;
        self.get(given)?;
        let given_ancestors = self.ancestors_set(given);

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(*current);
        queue.push_back(*current);

        while let Some(id) = queue.pop_front() {
            if given_ancestors.contains(&id) {
                debug!(
                    current = %current.short_hex(12),
                    given = %given.short_hex(12),
                    base = %id.short_hex(12),
                    "found merge base"
                );
                return Ok(id);
            }
            if let Some(commit) = self.commits.get(&id) {
                for parent in commit.parents() {
                    if visited.insert(parent) {
                        queue.push_back(parent);
                    }
                }
            }
        }

        // Every commit descends from the single root, so this only happens
        // for graphs assembled from several unrelated roots.
        Err(DagError::NoSuchCommit(*given))
    }

    /// `id` and all of its ancestors.
    fn ancestors_set(&self, id: &CommitId) -> HashSet<CommitId> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        if !self.commits.contains_key(id) {
            return visited;
        }
        visited.insert(*id);
        queue.push_back(*id);

        while let Some(current) = queue.pop_front() {
            if let Some(commit) = self.commits.get(&current) {
                for parent in commit.parents() {
                    if visited.insert(parent) {
                        queue.push_back(parent);
                    }
                }
            }
        }

        visited
    }

    // ---------------------------------------------------------------
    // Serialization
    // ---------------------------------------------------------------

    /// Serialize the graph to bincode bytes.
    pub fn to_bytes(&self) -> DagResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| DagError::Serialization(e.to_string()))
    }

    /// Deserialize a graph from bincode bytes.
    pub fn from_bytes(data: &[u8]) -> DagResult<Self> {
        bincode::deserialize(data).map_err(|e| DagError::Serialization(e.to_string()))
    }
}
