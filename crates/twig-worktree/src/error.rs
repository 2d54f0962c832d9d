//! Error types for working-tree operations.

use twig_dag::DagError;
use twig_refs::RefError;
use twig_store::StoreError;

/// Errors that can occur while reading or rewriting the working tree.
#[derive(Debug, thiserror::Error)]
pub enum WorktreeError {
    #[error("No such branch exists.")]
    NoSuchBranch { name: String },

    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch { name: String },

    #[error("File does not exist in that commit.")]
    FileNotInCommit { path: String },

    /// A file not tracked by the current head would be overwritten.
    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileConflict { path: String },

    #[error("invalid working-tree path: {0:?}")]
    InvalidPath(String),

    #[error(transparent)]
    Dag(#[from] DagError),

    #[error(transparent)]
    Ref(#[from] RefError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for working-tree results.
pub type WorktreeResult<T> = Result<T, WorktreeError>;
