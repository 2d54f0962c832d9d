//! Branch management for Twig.
//!
//! A branch is a mutable name pointing at a commit. The [`BranchTable`] holds
//! every branch plus the name of the checked-out one (`HEAD`). Branch history
//! is never stored; it is derived from the commit graph on demand.

pub mod error;
pub mod names;
pub mod table;

pub use error::{RefError, RefResult};
pub use names::validate_branch_name;
pub use table::{Branch, BranchTable, DEFAULT_BRANCH};
