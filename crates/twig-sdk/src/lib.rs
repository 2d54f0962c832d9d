//! High-level API for Twig.
//!
//! [`Repository`] is the entry point: one method per user command. Each call
//! loads the persisted [`RepoState`], applies the operation in memory and,
//! if it succeeds, writes the state back. A failed call leaves every record
//! untouched.

pub mod config;
pub mod error;
pub mod history;
pub mod merge;
pub mod record;
pub mod repository;
pub mod state;

pub use config::{LogConfig, RepoConfig};
pub use error::{ErrorKind, TwigError, TwigResult};
pub use history::LogEntry;
pub use merge::MergeReport;
pub use record::{FsRecordStore, MemoryRecordStore, RecordKey, RecordStore};
pub use repository::{Repository, CONFIG_FILE, META_DIR, OBJECTS_DIR};
pub use state::RepoState;

// Re-export key types
pub use twig_dag::{Commit, CommitId, Snapshot};
pub use twig_index::{RemovalOutcome, StageOutcome, StatusReport};
pub use twig_store::{FileObjectStore, InMemoryObjectStore, ObjectStore};
pub use twig_types::{ObjectId, Timestamp};
pub use twig_worktree::{FsWorkdir, MemoryWorkdir, Workdir};
