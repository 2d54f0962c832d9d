//! Status computation and rendering.
//!
//! A [`StatusReport`] compares three views of every path: the head commit's
//! snapshot, the staging area, and the working tree (as blob ids computed by
//! the caller).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use twig_dag::Snapshot;
use twig_types::ObjectId;

use crate::staging::StagingArea;

/// Why a path shows up under "Modifications Not Staged For Commit".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum UnstagedKind {
    Modified,
    Deleted,
}

impl fmt::Display for UnstagedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Modified => write!(f, "modified"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnstagedChange {
    pub path: String,
    pub kind: UnstagedKind,
}

/// Everything `status` prints, each list sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusReport {
    /// Branch names with a flag marking the current one.
    pub branches: Vec<(String, bool)>,
    pub staged: Vec<String>,
    pub removed: Vec<String>,
    pub unstaged: Vec<UnstagedChange>,
    pub untracked: Vec<String>,
}

impl StatusReport {
    /// Build a report.
    ///
    /// `working` maps each plain file in the working tree to the blob id of
    /// its current content.
    pub fn compute<I, S>(
        branches: I,
        staging: &StagingArea,
        head: &Snapshot,
        working: &BTreeMap<String, ObjectId>,
    ) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        let mut branches: Vec<(String, bool)> = branches
            .into_iter()
            .map(|(name, current)| (name.into(), current))
            .collect();
        branches.sort();

        let mut unstaged = BTreeSet::new();
        let mut untracked = BTreeSet::new();

        for (path, staged_blob) in staging.additions() {
            match working.get(path) {
                None => {
                    unstaged.insert(change(path, UnstagedKind::Deleted));
                }
                Some(current) if current != staged_blob => {
                    unstaged.insert(change(path, UnstagedKind::Modified));
                }
                Some(_) => {}
            }
        }

        for (path, tracked_blob) in head {
            if staging.staged_addition(path).is_some() || staging.is_staged_for_removal(path) {
                continue;
            }
            match working.get(path) {
                None => {
                    unstaged.insert(change(path, UnstagedKind::Deleted));
                }
                Some(current) if current != tracked_blob => {
                    unstaged.insert(change(path, UnstagedKind::Modified));
                }
                Some(_) => {}
            }
        }

        for path in working.keys() {
            let staged = staging.staged_addition(path).is_some();
            let tracked = head.contains_key(path) && !staging.is_staged_for_removal(path);
            if !staged && !tracked {
                untracked.insert(path.clone());
            }
        }

        Self {
            branches,
            staged: staging.additions().keys().cloned().collect(),
            removed: staging.removals().keys().cloned().collect(),
            unstaged: unstaged.into_iter().collect(),
            untracked: untracked.into_iter().collect(),
        }
    }

    /// Returns `true` if nothing is staged, modified or untracked.
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty()
            && self.removed.is_empty()
            && self.unstaged.is_empty()
            && self.untracked.is_empty()
    }
}

fn change(path: &str, kind: UnstagedKind) -> UnstagedChange {
    UnstagedChange {
        path: path.to_string(),
        kind,
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Branches ===")?;
        for (name, current) in &self.branches {
            if *current {
                writeln!(f, "*{name}")?;
            } else {
                writeln!(f, "{name}")?;
            }
        }
        writeln!(f)?;

        writeln!(f, "=== Staged Files ===")?;
        for path in &self.staged {
            writeln!(f, "{path}")?;
        }
        writeln!(f)?;

        writeln!(f, "=== Removed Files ===")?;
        for path in &self.removed {
            writeln!(f, "{path}")?;
        }
        writeln!(f)?;

        writeln!(f, "=== Modifications Not Staged For Commit ===")?;
        for entry in &self.unstaged {
            writeln!(f, "{} ({})", entry.path, entry.kind)?;
        }
        writeln!(f)?;

        writeln!(f, "=== Untracked Files ===")?;
        for path in &self.untracked {
            writeln!(f, "{path}")?;
        }
        writeln!(f)
    }
}
