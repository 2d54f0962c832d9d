//! Staging area for Twig.
//!
//! Records the changes that the next commit will apply on top of the current
//! head: files staged for addition (with the blob id of their staged content)
//! and files staged for removal.
//!
//! # Key Types
//!
//! - [`StagingArea`] -- pending additions and removals (BTreeMap-backed)
//! - [`StageOutcome`] / [`RemovalOutcome`] -- what a staging call did
//! - [`StatusReport`] -- the rendered `status` view

pub mod error;
pub mod staging;
pub mod status;

pub use error::{IndexError, IndexResult};
pub use staging::{RemovalOutcome, StageOutcome, StagingArea};
pub use status::{StatusReport, UnstagedChange, UnstagedKind};
