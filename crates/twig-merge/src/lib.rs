//! Merge engine for Twig.
//!
//! Implements whole-file three-way merge: each path is classified from its
//! blob ids in the merge base, the current head and the given head. Content
//! is never diffed line by line; two divergent versions of a file produce a
//! conflict whose markers enclose both versions in full.

pub mod classify;
pub mod conflict;

pub use classify::{classify, plan_merge, MergeAction, MergePlan};
pub use conflict::conflict_markers;
