use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use twig_dag::{Commit, CommitGraph, CommitId};

use crate::error::{RefError, RefResult};
use crate::names::validate_branch_name;

/// Name of the branch created by `init` when no other name is configured.
pub const DEFAULT_BRANCH: &str = "master";

/// A branch name together with the commit it points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Branch<'a> {
    pub name: &'a str,
    pub head: CommitId,
    pub is_current: bool,
}

/// Every branch of a repository plus the checked-out one.
///
/// The current branch always names an entry of the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchTable {
    heads: BTreeMap<String, CommitId>,
    current: String,
}

impl BranchTable {
    /// Create a table holding a single branch, checked out.
    pub fn new(name: &str, head: CommitId) -> RefResult<Self> {
        validate_branch_name(name)?;
        let mut heads = BTreeMap::new();
        heads.insert(name.to_string(), head);
        Ok(Self {
            heads,
            current: name.to_string(),
        })
    }

    /// Create `name` pointing at the head of `from_branch`.
    pub fn create(&mut self, name: &str, from_branch: &str) -> RefResult<CommitId> {
        if self.heads.contains_key(name) {
            return Err(RefError::BranchAlreadyExists {
                name: name.to_string(),
            });
        }
        validate_branch_name(name)?;
        let head = self.head_of(from_branch)?;
        self.heads.insert(name.to_string(), head);
        debug!(branch = name, head = %head.short_hex(12), "created branch");
        Ok(head)
    }

    /// Remove a branch pointer. Commits are left untouched.
    pub fn delete(&mut self, name: &str) -> RefResult<()> {
        if !self.heads.contains_key(name) {
            return Err(RefError::NoSuchBranch {
                name: name.to_string(),
            });
        }
        if self.current == name {
            return Err(RefError::CannotDeleteCurrentBranch {
                name: name.to_string(),
            });
        }
        self.heads.remove(name);
        debug!(branch = name, "deleted branch");
        Ok(())
    }

    /// Move `name` to point at `new_head`.
    pub fn advance(&mut self, name: &str, new_head: CommitId) -> RefResult<()> {
        let head = self
            .heads
            .get_mut(name)
            .ok_or_else(|| RefError::NoSuchBranch {
                name: name.to_string(),
            })?;
        debug!(branch = name, from = %head.short_hex(12), to = %new_head.short_hex(12), "moved branch");
        *head = new_head;
        Ok(())
    }

    /// Move the checked-out branch to `new_head`.
    pub fn advance_current(&mut self, new_head: CommitId) -> RefResult<()> {
        let current = self.current.clone();
        self.advance(&current, new_head)
    }

    /// First-parent history of `name`, oldest first.
    pub fn ancestor_chain<'g>(
        &self,
        name: &str,
        graph: &'g CommitGraph,
    ) -> RefResult<Vec<&'g Commit>> {
        let head = self.head_of(name)?;
        Ok(graph.ancestor_chain(&head)?)
    }

    /// Name of the checked-out branch.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Head commit of the checked-out branch.
    pub fn current_head(&self) -> CommitId {
        // `current` always names an entry; see `set_current` and `delete`.
        self.heads[&self.current]
    }

    /// Check out `name`.
    pub fn set_current(&mut self, name: &str) -> RefResult<()> {
        if !self.heads.contains_key(name) {
            return Err(RefError::NoSuchBranch {
                name: name.to_string(),
            });
        }
        self.current = name.to_string();
        Ok(())
    }

    /// Head commit of `name`.
    pub fn head_of(&self, name: &str) -> RefResult<CommitId> {
        self.heads
            .get(name)
            .copied()
            .ok_or_else(|| RefError::NoSuchBranch {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.heads.contains_key(name)
    }

    /// All branch names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.heads.keys().map(String::as_str).collect()
    }

    /// All branches, sorted by name.
    pub fn branches(&self) -> impl Iterator<Item = Branch<'_>> {
        self.heads.iter().map(|(name, head)| Branch {
            name,
            head: *head,
            is_current: *name == self.current,
        })
    }

    /// Serialize the table to bincode bytes.
    pub fn to_bytes(&self) -> RefResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| RefError::Serialization(e.to_string()))
    }

    /// Deserialize a table from bincode bytes.
    ///
    /// Rejects tables whose current branch is missing.
    pub fn from_bytes(data: &[u8]) -> RefResult<Self> {
        let table: Self =
            bincode::deserialize(data).map_err(|e| RefError::Serialization(e.to_string()))?;
        if !table.heads.contains_key(&table.current) {
            return Err(RefError::Serialization(format!(
                "current branch {:?} has no head",
                table.current
            )));
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twig_dag::Snapshot;
    use twig_types::{ObjectId, Timestamp};

    fn id(byte: u8) -> CommitId {
        ObjectId::from_hash([byte; 32])
    }

    fn table() -> BranchTable {
        BranchTable::new(DEFAULT_BRANCH, id(1)).unwrap()
    }

    #[test]
    fn new_table_has_one_current_branch() {
        let t = table();
        assert_eq!(t.current(), "master");
        assert_eq!(t.current_head(), id(1));
        assert_eq!(t.names(), vec!["master"]);
    }

    #[test]
    fn new_rejects_invalid_name() {
        assert!(matches!(
            BranchTable::new("bad name", id(1)),
            Err(RefError::InvalidBranchName { .. })
        ));
    }

    #[test]
    fn create_copies_source_head() {
        let mut t = table();
        assert_eq!(t.create("dev", "master").unwrap(), id(1));
        assert_eq!(t.head_of("dev").unwrap(), id(1));
        assert_eq!(t.current(), "master");
    }

    #[test]
    fn create_existing_fails() {
        let mut t = table();
        assert!(matches!(
            t.create("master", "master"),
            Err(RefError::BranchAlreadyExists { .. })
        ));
    }

    #[test]
    fn create_from_unknown_source_fails() {
        let mut t = table();
        assert!(matches!(
            t.create("dev", "nope"),
            Err(RefError::NoSuchBranch { .. })
        ));
        assert!(!t.contains("dev"));
    }

    #[test]
    fn delete_rules() {
        let mut t = table();
        t.create("dev", "master").unwrap();
        assert!(matches!(
            t.delete("master"),
            Err(RefError::CannotDeleteCurrentBranch { .. })
        ));
        assert!(matches!(
            t.delete("nope"),
            Err(RefError::NoSuchBranch { .. })
        ));
        t.delete("dev").unwrap();
        assert!(!t.contains("dev"));
    }

    #[test]
    fn advance_moves_only_named_branch() {
        let mut t = table();
        t.create("dev", "master").unwrap();
        t.advance("dev", id(2)).unwrap();
        assert_eq!(t.head_of("dev").unwrap(), id(2));
        assert_eq!(t.head_of("master").unwrap(), id(1));

        t.advance_current(id(3)).unwrap();
        assert_eq!(t.current_head(), id(3));
    }

    #[test]
    fn set_current_switches_head() {
        let mut t = table();
        t.create("dev", "master").unwrap();
        t.advance("dev", id(5)).unwrap();
        t.set_current("dev").unwrap();
        assert_eq!(t.current(), "dev");
        assert_eq!(t.current_head(), id(5));
        assert!(t.set_current("nope").is_err());
        assert_eq!(t.current(), "dev");
    }

    #[test]
    fn branches_are_sorted_and_marked() {
        let mut t = table();
        t.create("zeta", "master").unwrap();
        t.create("alpha", "master").unwrap();
        let listed: Vec<(&str, bool)> = t.branches().map(|b| (b.name, b.is_current)).collect();
        assert_eq!(
            listed,
            vec![("alpha", false), ("master", true), ("zeta", false)]
        );
    }

    #[test]
    fn ancestor_chain_walks_graph() {
        let mut graph = CommitGraph::new();
        let root = graph.create_initial().unwrap();
        let mut snap = Snapshot::new();
        snap.insert("a.txt".into(), id(9));
        let c1 = graph
            .create_commit("first", root, snap, Timestamp::from_millis(5))
            .unwrap();

        let mut t = BranchTable::new(DEFAULT_BRANCH, root).unwrap();
        t.advance("master", c1).unwrap();
        let chain: Vec<CommitId> = t
            .ancestor_chain("master", &graph)
            .unwrap()
            .iter()
            .map(|c| c.id())
            .collect();
        assert_eq!(chain, vec![root, c1]);
    }

    #[test]
    fn bincode_roundtrip() {
        let mut t = table();
        t.create("dev", "master").unwrap();
        let restored = BranchTable::from_bytes(&t.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, t);
    }
}
