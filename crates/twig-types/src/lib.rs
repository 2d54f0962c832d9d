//! Foundation types for Twig.
//!
//! This crate provides the identifier and time types shared by every other
//! Twig crate.
//!
//! # Key Types
//!
//! - [`ObjectId`]: Content-addressed identifier (BLAKE3 hash), used for both
//!   blobs and commits
//! - [`Timestamp`]: UTC instant recorded on every commit

pub mod error;
pub mod object;
pub mod temporal;

pub use error::TypeError;
pub use object::ObjectId;
pub use temporal::Timestamp;
