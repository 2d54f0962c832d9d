//! Error types for branch operations.

use thiserror::Error;
use twig_dag::DagError;

/// Errors that can occur during branch operations.
#[derive(Debug, Error)]
pub enum RefError {
    #[error("A branch with that name does not exist.")]
    NoSuchBranch { name: String },

    #[error("A branch with that name already exists.")]
    BranchAlreadyExists { name: String },

    #[error("Cannot remove the current branch.")]
    CannotDeleteCurrentBranch { name: String },

    #[error("invalid branch name {name:?}: {reason}")]
    InvalidBranchName { name: String, reason: String },

    /// A branch head could not be walked in the commit graph.
    #[error(transparent)]
    Dag(#[from] DagError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for branch operations.
pub type RefResult<T> = Result<T, RefError>;
