use std::fmt;

use twig_dag::CommitId;

/// Outcome of a successful `merge`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MergeReport {
    /// The given head is already in the current branch's history; nothing
    /// changed.
    GivenIsAncestor,
    /// The current branch was moved to the given head.
    FastForwarded(CommitId),
    /// A merge commit was created. `conflicts` lists the paths written with
    /// conflict markers, sorted.
    Merged {
        commit: CommitId,
        conflicts: Vec<String>,
    },
}

impl MergeReport {
    pub fn has_conflicts(&self) -> bool {
        matches!(self, Self::Merged { conflicts, .. } if !conflicts.is_empty())
    }

    /// The line printed for this outcome, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::GivenIsAncestor => Some("Given branch is an ancestor of the current branch."),
            Self::FastForwarded(_) => Some("Current branch fast-forwarded."),
            Self::Merged { .. } if self.has_conflicts() => Some("Encountered a merge conflict."),
            Self::Merged { .. } => None,
        }
    }
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twig_types::ObjectId;

    #[test]
    fn messages() {
        let id = ObjectId::from_hash([1; 32]);
        assert_eq!(
            MergeReport::GivenIsAncestor.to_string(),
            "Given branch is an ancestor of the current branch."
        );
        assert_eq!(
            MergeReport::FastForwarded(id).message(),
            Some("Current branch fast-forwarded.")
        );

        let clean = MergeReport::Merged {
            commit: id,
            conflicts: vec![],
        };
        assert!(!clean.has_conflicts());
        assert_eq!(clean.message(), None);

        let conflicted = MergeReport::Merged {
            commit: id,
            conflicts: vec!["a.txt".into()],
        };
        assert!(conflicted.has_conflicts());
        assert_eq!(conflicted.to_string(), "Encountered a merge conflict.");
    }
}
