use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use twig_dag::Snapshot;
use twig_types::ObjectId;

/// What a merge does to one path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeAction {
    /// Leave the current version (or absence) as is.
    KeepCurrent,
    /// Check out the given branch's version and stage it.
    TakeGiven(ObjectId),
    /// Delete the file and stage its removal.
    Remove,
    /// Both sides changed the file differently.
    Conflict {
        current: Option<ObjectId>,
        given: Option<ObjectId>,
    },
}

/// Classify one path from its blob id in the base, current and given
/// commits (`None` when absent).
///
/// | current vs base | given vs base | outcome |
/// |---|---|---|
/// | same | same | keep |
/// | same | changed | take given, or remove if absent |
/// | changed | same | keep |
/// | changed | changed, equal to current | keep |
/// | changed | changed, differs from current | conflict |
pub fn classify(
    base: Option<ObjectId>,
    current: Option<ObjectId>,
    given: Option<ObjectId>,
) -> MergeAction {
    let current_changed = current != base;
    let given_changed = given != base;

    match (current_changed, given_changed) {
        (false, true) => match given {
            Some(id) => MergeAction::TakeGiven(id),
            None => MergeAction::Remove,
        },
        (true, true) if current != given => MergeAction::Conflict { current, given },
        _ => MergeAction::KeepCurrent,
    }
}

/// Per-path actions for a merge, omitting paths that stay as they are.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergePlan {
    actions: BTreeMap<String, MergeAction>,
}

impl MergePlan {
    /// Actions sorted by path.
    pub fn actions(&self) -> impl Iterator<Item = (&str, MergeAction)> {
        self.actions.iter().map(|(path, action)| (path.as_str(), *action))
    }

    pub fn get(&self, path: &str) -> Option<MergeAction> {
        self.actions.get(path).copied()
    }

    pub fn has_conflicts(&self) -> bool {
        self.conflicts().next().is_some()
    }

    /// Paths in conflict, sorted.
    pub fn conflicts(&self) -> impl Iterator<Item = &str> {
        self.actions
            .iter()
            .filter(|(_, action)| matches!(action, MergeAction::Conflict { .. }))
            .map(|(path, _)| path.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }
}

/// Classify every path present in any of the three snapshots.
pub fn plan_merge(base: &Snapshot, current: &Snapshot, given: &Snapshot) -> MergePlan {
    let paths: BTreeSet<&String> = base.keys().chain(current.keys()).chain(given.keys()).collect();

    let mut actions = BTreeMap::new();
    for path in paths {
        let action = classify(
            base.get(path).copied(),
            current.get(path).copied(),
            given.get(path).copied(),
        );
        if action != MergeAction::KeepCurrent {
            debug!(path = %path, ?action, "merge action");
            actions.insert(path.clone(), action);
        }
    }
    MergePlan { actions }
}
