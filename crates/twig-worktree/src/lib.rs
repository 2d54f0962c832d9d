//! Working-tree access and synchronization for Twig.
//!
//! The working tree is a flat directory of plain files. [`Workdir`] abstracts
//! raw file I/O over it; [`Synchronizer`] rewrites it to match a commit when
//! checking out files or branches and when resetting.

pub mod error;
pub mod fs;
pub mod memory;
pub mod sync;
pub mod workdir;

pub use error::{WorktreeError, WorktreeResult};
pub use fs::FsWorkdir;
pub use memory::MemoryWorkdir;
pub use sync::Synchronizer;
pub use workdir::{working_blob_ids, Workdir};
