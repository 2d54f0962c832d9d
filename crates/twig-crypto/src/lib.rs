//! Content hashing for Twig.
//!
//! Every identifier in a repository is a domain-separated BLAKE3 digest. The
//! domain tag keeps a blob and a commit with identical bytes from colliding.

pub mod hasher;

pub use hasher::{ContentHasher, HasherError};
