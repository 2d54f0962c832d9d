//! Error types for the staging area.

/// Errors that can occur during staging operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The path is neither staged nor tracked by the head commit.
    #[error("No reason to remove the file.")]
    NothingToRemove(String),

    /// An invalid path was provided.
    #[error("invalid path: {0:?}")]
    InvalidPath(String),

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for staging results.
pub type IndexResult<T> = Result<T, IndexError>;
