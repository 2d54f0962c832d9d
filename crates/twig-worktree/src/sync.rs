//! Rewriting the working tree to match a commit.

use tracing::{debug, info};

use twig_dag::{Commit, CommitGraph, CommitId, Snapshot};
use twig_index::StagingArea;
use twig_refs::{BranchTable, RefError};
use twig_store::{Blob, ObjectStore};

use crate::error::{WorktreeError, WorktreeResult};
use crate::workdir::Workdir;

/// Moves the working tree between commits.
///
/// Every operation that replaces more than one file checks for untracked
/// files in the way before it writes anything.
pub struct Synchronizer<'a> {
    store: &'a dyn ObjectStore,
    workdir: &'a dyn Workdir,
}

impl<'a> Synchronizer<'a> {
    pub fn new(store: &'a dyn ObjectStore, workdir: &'a dyn Workdir) -> Self {
        Self { store, workdir }
    }

    /// Overwrite `path` with its content in `commit`. Staging is untouched.
    pub fn restore_file(&self, commit: &Commit, path: &str) -> WorktreeResult<()> {
        let blob_id = commit
            .blob_for(path)
            .ok_or_else(|| WorktreeError::FileNotInCommit {
                path: path.to_string(),
            })?;
        let blob = self.store.get(&blob_id)?;
        self.workdir.write_file(path, blob.data())?;
        debug!(path, commit = %commit.id().short_hex(12), "restored file");
        Ok(())
    }

    /// Check out branch `name`: replace the tree with its head's snapshot,
    /// make it current and clear staging.
    pub fn restore_branch(
        &self,
        name: &str,
        graph: &CommitGraph,
        branches: &mut BranchTable,
        staging: &mut StagingArea,
    ) -> WorktreeResult<()> {
        let target_head = branches.head_of(name).map_err(|e| match e {
            RefError::NoSuchBranch { name } => WorktreeError::NoSuchBranch { name },
            other => other.into(),
        })?;
        if branches.current() == name {
            return Err(WorktreeError::AlreadyOnBranch {
                name: name.to_string(),
            });
        }

        let current = graph.get(&branches.current_head())?;
        let target = graph.get(&target_head)?;
        self.check_untracked(current.snapshot(), target.snapshot())?;
        self.materialize(current.snapshot(), target.snapshot())?;

        branches.set_current(name)?;
        staging.clear();
        info!(branch = name, head = %target_head.short_hex(12), "checked out branch");
        Ok(())
    }

    /// Resolve `commit` (full or abbreviated id) and move the current branch
    /// to it.
    pub fn reset(
        &self,
        commit: &str,
        graph: &CommitGraph,
        branches: &mut BranchTable,
        staging: &mut StagingArea,
    ) -> WorktreeResult<CommitId> {
        let target = graph.resolve_abbreviated(commit)?;
        self.move_current_to(target, graph, branches, staging)?;
        Ok(target)
    }

    /// Replace the tree with `target`'s snapshot, point the current branch
    /// at `target` and clear staging.
    pub fn move_current_to(
        &self,
        target: CommitId,
        graph: &CommitGraph,
        branches: &mut BranchTable,
        staging: &mut StagingArea,
    ) -> WorktreeResult<()> {
        let current = graph.get(&branches.current_head())?;
        let target_commit = graph.get(&target)?;
        self.check_untracked(current.snapshot(), target_commit.snapshot())?;
        self.materialize(current.snapshot(), target_commit.snapshot())?;

        branches.advance_current(target)?;
        staging.clear();
        info!(branch = branches.current(), head = %target.short_hex(12), "moved branch head");
        Ok(())
    }

    /// Fail if a working file that `current` does not track would be
    /// overwritten with different content from `target`.
    pub fn check_untracked(&self, current: &Snapshot, target: &Snapshot) -> WorktreeResult<()> {
        for path in self.workdir.list_files()? {
            if current.contains_key(&path) {
                continue;
            }
            let Some(target_blob) = target.get(&path) else {
                continue;
            };
            if self.workdir.blob_id(&path)? != Some(*target_blob) {
                return Err(WorktreeError::UntrackedFileConflict { path });
            }
        }
        Ok(())
    }

    /// Delete files tracked by `current` but not `target`, then write every
    /// file of `target`.
    pub fn materialize(&self, current: &Snapshot, target: &Snapshot) -> WorktreeResult<()> {
        // Load every blob first so that a missing object fails before any
        // file is touched.
        let blobs = target
            .iter()
            .map(|(path, id)| -> WorktreeResult<(&String, Blob)> {
                Ok((path, self.store.get(id)?))
            })
            .collect::<WorktreeResult<Vec<_>>>()?;

        for path in current.keys().filter(|p| !target.contains_key(*p)) {
            self.workdir.delete_file(path)?;
        }
        for (path, blob) in blobs {
            self.workdir.write_file(path, blob.data())?;
        }
        debug!(files = target.len(), "materialized snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryWorkdir;
    use twig_refs::DEFAULT_BRANCH;
    use twig_store::InMemoryObjectStore;
    use twig_types::Timestamp;

    struct Fixture {
        store: InMemoryObjectStore,
        workdir: MemoryWorkdir,
        graph: CommitGraph,
        branches: BranchTable,
        staging: StagingArea,
    }

    impl Fixture {
        /// master: root -> c1 {a.txt: "A", b.txt: "B"}
        /// dev:    root -> c1 -> c2 {a.txt: "A2", c.txt: "C"}
        /// Working tree matches master.
        fn new() -> Self {
            let store = InMemoryObjectStore::new();
            let mut graph = CommitGraph::new();
            let root = graph.create_initial().unwrap();

            let snap1 = Self::snap(&store, &[("a.txt", "A"), ("b.txt", "B")]);
            let c1 = graph
                .create_commit("c1", root, snap1, Timestamp::from_millis(1))
                .unwrap();
            let snap2 = Self::snap(&store, &[("a.txt", "A2"), ("c.txt", "C")]);
            let c2 = graph
                .create_commit("c2", c1, snap2, Timestamp::from_millis(2))
                .unwrap();

            let mut branches = BranchTable::new(DEFAULT_BRANCH, c1).unwrap();
            branches.create("dev", DEFAULT_BRANCH).unwrap();
            branches.advance("dev", c2).unwrap();

            Self {
                store,
                workdir: MemoryWorkdir::with_files([("a.txt", "A"), ("b.txt", "B")]),
                graph,
                branches,
                staging: StagingArea::new(),
            }
        }

        fn snap(store: &InMemoryObjectStore, files: &[(&str, &str)]) -> Snapshot {
            files
                .iter()
                .map(|(p, c)| (p.to_string(), store.write(&Blob::new(*c)).unwrap()))
                .collect()
        }

        fn checkout(&mut self, name: &str) -> WorktreeResult<()> {
            let sync = Synchronizer::new(&self.store, &self.workdir);
            sync.restore_branch(name, &self.graph, &mut self.branches, &mut self.staging)
        }

        fn reset(&mut self, commit: &str) -> WorktreeResult<CommitId> {
            let sync = Synchronizer::new(&self.store, &self.workdir);
            sync.reset(commit, &self.graph, &mut self.branches, &mut self.staging)
        }
    }

    // ---------------------------------------------------------------
    // restore_file
    // ---------------------------------------------------------------

    #[test]
    fn restore_file_overwrites_working_copy() {
        let f = Fixture::new();
        f.workdir.write_file("a.txt", b"edited").unwrap();
        let head = f.graph.get(&f.branches.current_head()).unwrap();
        Synchronizer::new(&f.store, &f.workdir)
            .restore_file(head, "a.txt")
            .unwrap();
        assert_eq!(f.workdir.read_string("a.txt").unwrap(), "A");
    }

    #[test]
    fn restore_file_missing_from_commit() {
        let f = Fixture::new();
        let head = f.graph.get(&f.branches.current_head()).unwrap();
        let err = Synchronizer::new(&f.store, &f.workdir)
            .restore_file(head, "c.txt")
            .unwrap_err();
        assert!(matches!(err, WorktreeError::FileNotInCommit { .. }));
    }

    #[test]
    fn restore_file_does_not_stage() {
        let mut f = Fixture::new();
        let head_snapshot = f.graph.get(&f.branches.current_head()).unwrap().snapshot().clone();
        f.staging
            .stage_addition("new.txt", Blob::id_of(b"n"), &head_snapshot)
            .unwrap();
        let dev_head = f.graph.get(&f.branches.head_of("dev").unwrap()).unwrap();
        Synchronizer::new(&f.store, &f.workdir)
            .restore_file(dev_head, "c.txt")
            .unwrap();
        assert_eq!(f.staging.additions().len(), 1);
        assert_eq!(f.workdir.read_string("c.txt").unwrap(), "C");
    }

    // ---------------------------------------------------------------
    // restore_branch
    // ---------------------------------------------------------------

    #[test]
    fn checkout_branch_replaces_tree() {
        let mut f = Fixture::new();
        f.checkout("dev").unwrap();
        assert_eq!(f.branches.current(), "dev");
        assert_eq!(f.workdir.read_string("a.txt").unwrap(), "A2");
        assert_eq!(f.workdir.read_string("c.txt").unwrap(), "C");
        assert!(f.workdir.read_file("b.txt").unwrap().is_none());
    }

    #[test]
    fn checkout_clears_staging() {
        let mut f = Fixture::new();
        f.staging
            .stage_addition("x.txt", Blob::id_of(b"x"), &Snapshot::new())
            .unwrap();
        f.checkout("dev").unwrap();
        assert!(f.staging.is_empty());
    }

    #[test]
    fn checkout_unknown_branch() {
        let mut f = Fixture::new();
        let err = f.checkout("nope").unwrap_err();
        assert!(matches!(err, WorktreeError::NoSuchBranch { .. }));
        assert_eq!(err.to_string(), "No such branch exists.");
    }

    #[test]
    fn checkout_current_branch() {
        let mut f = Fixture::new();
        let err = f.checkout("master").unwrap_err();
        assert!(matches!(err, WorktreeError::AlreadyOnBranch { .. }));
    }

    #[test]
    fn untracked_file_blocks_checkout_without_changes() {
        let mut f = Fixture::new();
        f.workdir.write_file("c.txt", b"mine").unwrap();
        let err = f.checkout("dev").unwrap_err();
        assert!(matches!(err, WorktreeError::UntrackedFileConflict { ref path } if path == "c.txt"));
        assert_eq!(f.branches.current(), "master");
        assert_eq!(f.workdir.read_string("c.txt").unwrap(), "mine");
        assert_eq!(f.workdir.read_string("b.txt").unwrap(), "B");
    }

    #[test]
    fn untracked_file_with_identical_content_is_fine() {
        let mut f = Fixture::new();
        f.workdir.write_file("c.txt", b"C").unwrap();
        f.checkout("dev").unwrap();
        assert_eq!(f.branches.current(), "dev");
    }

    #[test]
    fn untracked_file_absent_from_target_survives() {
        let mut f = Fixture::new();
        f.workdir.write_file("notes", b"keep").unwrap();
        f.checkout("dev").unwrap();
        assert_eq!(f.workdir.read_string("notes").unwrap(), "keep");
    }

    // ---------------------------------------------------------------
    // reset
    // ---------------------------------------------------------------

    #[test]
    fn reset_moves_current_branch() {
        let mut f = Fixture::new();
        let dev_head = f.branches.head_of("dev").unwrap();
        let prefix = dev_head.short_hex(10);
        assert_eq!(f.reset(&prefix).unwrap(), dev_head);
        assert_eq!(f.branches.current(), "master");
        assert_eq!(f.branches.current_head(), dev_head);
        assert_eq!(f.workdir.read_string("a.txt").unwrap(), "A2");
        assert!(f.workdir.read_file("b.txt").unwrap().is_none());
    }

    #[test]
    fn reset_unknown_commit() {
        let mut f = Fixture::new();
        let err = f.reset("ffffffffffffffffffff").unwrap_err();
        assert_eq!(err.to_string(), "No commit with that id exists.");
    }

    #[test]
    fn reset_checks_untracked_files() {
        let mut f = Fixture::new();
        f.workdir.write_file("c.txt", b"mine").unwrap();
        let dev_head = f.branches.head_of("dev").unwrap().to_hex();
        assert!(matches!(
            f.reset(&dev_head),
            Err(WorktreeError::UntrackedFileConflict { .. })
        ));
    }

    #[test]
    fn missing_blob_aborts_before_writing() {
        let mut f = Fixture::new();
        let dev = f.graph.get(&f.branches.head_of("dev").unwrap()).unwrap();
        let c_blob = dev.blob_for("c.txt").unwrap();
        f.store.delete(&c_blob).unwrap();
        assert!(matches!(f.checkout("dev"), Err(WorktreeError::Store(_))));
        assert_eq!(f.workdir.read_string("b.txt").unwrap(), "B");
        assert_eq!(f.workdir.read_string("a.txt").unwrap(), "A");
    }
}
