//! Error types for the commit graph.

use crate::commit::CommitId;

/// Errors that can occur during commit graph operations.
#[derive(Debug, thiserror::Error)]
pub enum DagError {
    /// No commit with the given id exists.
    #[error("No commit with that id exists.")]
    NoSuchCommit(CommitId),

    /// An abbreviated id matched zero or several commits.
    #[error("No commit with that id exists.")]
    AmbiguousOrNoSuchCommit(String),

    #[error("Please enter a commit message.")]
    EmptyCommitMessage,

    /// The new snapshot is identical to the parent's.
    #[error("No changes added to the commit.")]
    NothingToCommit,

    /// A commit references a parent that is not in the graph.
    #[error("dangling parent reference: commit {commit:?} references missing parent {parent:?}")]
    DanglingParent { commit: CommitId, parent: CommitId },

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for graph results.
pub type DagResult<T> = Result<T, DagError>;
