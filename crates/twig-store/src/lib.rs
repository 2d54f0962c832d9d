//! Content-addressed blob storage for Twig.
//!
//! Every file version that enters a repository is stored once, keyed by the
//! domain-separated BLAKE3 hash of its bytes. Identical contents share one
//! entry no matter how many paths or commits reference them.
//!
//! # Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//! - [`FileObjectStore`] -- on-disk store under `.twig/objects/`
//!
//! # Rules
//!
//! 1. Blobs are immutable once written.
//! 2. Writing existing content is a no-op that returns the same id.
//! 3. The store never interprets blob contents.
//! 4. All I/O errors are propagated.

pub mod error;
pub mod fs;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FileObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::Blob;
pub use traits::ObjectStore;
