//! Commit graph for Twig.
//!
//! Commits are immutable snapshots of the tracked file tree, linked to their
//! parents. The graph answers history queries (first-parent chains, ancestry,
//! merge bases) and resolves abbreviated commit ids.

pub mod commit;
pub mod error;
pub mod graph;

pub use commit::{snapshot_digest, Commit, CommitId, Snapshot, INITIAL_COMMIT_MESSAGE};
pub use error::{DagError, DagResult};
pub use graph::CommitGraph;
