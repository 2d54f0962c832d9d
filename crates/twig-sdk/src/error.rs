use thiserror::Error;

use twig_dag::DagError;
use twig_index::IndexError;
use twig_refs::RefError;
use twig_store::StoreError;
use twig_types::TypeError;
use twig_worktree::WorktreeError;

/// Broad classes of failure, used by front ends to decide how to report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input or a command run outside a repository.
    Usage,
    /// A named commit, branch or file does not exist.
    NotFound,
    /// The request is well-formed but the repository state forbids it.
    StateConflict,
    /// I/O failure or corrupt repository data.
    Fatal,
}

#[derive(Debug, Error)]
pub enum TwigError {
    #[error("A Twig version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("Not in an initialized Twig directory.")]
    NotInitialized,

    #[error("File does not exist.")]
    FileNotFound(String),

    #[error("Found no commit with that message.")]
    NoCommitWithMessage(String),

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error("Cannot merge a branch with itself.")]
    CannotMergeWithSelf,

    #[error(transparent)]
    Dag(#[from] DagError),

    #[error(transparent)]
    Ref(#[from] RefError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Worktree(#[from] WorktreeError),

    #[error("invalid value: {0}")]
    Type(#[from] TypeError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("corrupt repository record {key}: {reason}")]
    CorruptRecord { key: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TwigError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotInitialized => ErrorKind::Usage,
            Self::FileNotFound(_) | Self::NoCommitWithMessage(_) => ErrorKind::NotFound,
            Self::AlreadyInitialized | Self::UncommittedChanges | Self::CannotMergeWithSelf => {
                ErrorKind::StateConflict
            }
            Self::Dag(e) => dag_kind(e),
            Self::Ref(e) => ref_kind(e),
            Self::Index(e) => match e {
                IndexError::NothingToRemove(_) => ErrorKind::StateConflict,
                IndexError::InvalidPath(_) => ErrorKind::Usage,
                IndexError::Serialization(_) => ErrorKind::Fatal,
            },
            Self::Worktree(e) => match e {
                WorktreeError::NoSuchBranch { .. } | WorktreeError::FileNotInCommit { .. } => {
                    ErrorKind::NotFound
                }
                WorktreeError::AlreadyOnBranch { .. }
                | WorktreeError::UntrackedFileConflict { .. } => ErrorKind::StateConflict,
                WorktreeError::InvalidPath(_) => ErrorKind::Usage,
                WorktreeError::Dag(e) => dag_kind(e),
                WorktreeError::Ref(e) => ref_kind(e),
                WorktreeError::Store(_) | WorktreeError::Walk(_) | WorktreeError::Io(_) => {
                    ErrorKind::Fatal
                }
            },
            Self::Type(_)
            | Self::Store(_)
            | Self::Config(_)
            | Self::CorruptRecord { .. }
            | Self::Io(_) => ErrorKind::Fatal,
        }
    }

    /// Returns `true` for errors caused by the user rather than the system.
    pub fn is_user_error(&self) -> bool {
        self.kind() != ErrorKind::Fatal
    }
}

fn dag_kind(e: &DagError) -> ErrorKind {
    match e {
        DagError::NoSuchCommit(_) | DagError::AmbiguousOrNoSuchCommit(_) => ErrorKind::NotFound,
        DagError::EmptyCommitMessage | DagError::NothingToCommit => ErrorKind::StateConflict,
        DagError::DanglingParent { .. } | DagError::Serialization(_) => ErrorKind::Fatal,
    }
}

fn ref_kind(e: &RefError) -> ErrorKind {
    match e {
        RefError::NoSuchBranch { .. } => ErrorKind::NotFound,
        RefError::BranchAlreadyExists { .. }
        | RefError::CannotDeleteCurrentBranch { .. }
        | RefError::InvalidBranchName { .. } => ErrorKind::StateConflict,
        RefError::Dag(e) => dag_kind(e),
        RefError::Serialization(_) => ErrorKind::Fatal,
    }
}

pub type TwigResult<T> = Result<T, TwigError>;
