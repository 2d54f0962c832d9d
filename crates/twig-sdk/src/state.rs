use tracing::debug;

use twig_dag::{Commit, CommitGraph};
use twig_index::StagingArea;
use twig_refs::BranchTable;

use crate::error::{TwigError, TwigResult};
use crate::record::{RecordKey, RecordStore};

/// Everything a command reads or mutates, apart from blob bytes and the
/// working tree.
#[derive(Clone, Debug)]
pub struct RepoState {
    pub graph: CommitGraph,
    pub branches: BranchTable,
    pub staging: StagingArea,
}

impl RepoState {
    /// State of a freshly initialized repository: the root commit, one
    /// branch pointing at it, nothing staged.
    pub fn initial(default_branch: &str) -> TwigResult<Self> {
        let mut graph = CommitGraph::new();
        let root = graph.create_initial()?;
        let branches = BranchTable::new(default_branch, root)?;
        Ok(Self {
            graph,
            branches,
            staging: StagingArea::new(),
        })
    }

    /// Load all three records.
    pub fn load(records: &dyn RecordStore) -> TwigResult<Self> {
        if !records.is_initialized()? {
            return Err(TwigError::NotInitialized);
        }
        let graph = CommitGraph::from_bytes(&require(records, RecordKey::Graph)?)
            .map_err(|e| corrupt(RecordKey::Graph, e))?;
        let branches = BranchTable::from_bytes(&require(records, RecordKey::Branches)?)
            .map_err(|e| corrupt(RecordKey::Branches, e))?;
        let staging = StagingArea::from_bytes(&require(records, RecordKey::Staging)?)
            .map_err(|e| corrupt(RecordKey::Staging, e))?;

        if !graph.contains(&branches.current_head()) {
            return Err(corrupt(
                RecordKey::Branches,
                "current branch points outside the commit graph",
            ));
        }
        debug!(
            commits = graph.len(),
            branch = branches.current(),
            "loaded repository state"
        );
        Ok(Self {
            graph,
            branches,
            staging,
        })
    }

    /// Write all three records. The branch table goes last since its
    /// presence marks the repository as initialized.
    pub fn save(&self, records: &dyn RecordStore) -> TwigResult<()> {
        records.save(RecordKey::Graph, &self.graph.to_bytes()?)?;
        records.save(RecordKey::Staging, &self.staging.to_bytes()?)?;
        records.save(RecordKey::Branches, &self.branches.to_bytes()?)?;
        Ok(())
    }

    /// The commit the current branch points at.
    pub fn head_commit(&self) -> TwigResult<&Commit> {
        Ok(self.graph.get(&self.branches.current_head())?)
    }
}

fn require(records: &dyn RecordStore, key: RecordKey) -> TwigResult<Vec<u8>> {
    records
        .load(key)?
        .ok_or_else(|| corrupt(key, "record is missing"))
}

fn corrupt(key: RecordKey, reason: impl ToString) -> TwigError {
    TwigError::CorruptRecord {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MemoryRecordStore;

    #[test]
    fn empty_store_is_not_initialized() {
        let records = MemoryRecordStore::new();
        assert!(matches!(
            RepoState::load(&records),
            Err(TwigError::NotInitialized)
        ));
    }

    #[test]
    fn save_then_load() {
        let records = MemoryRecordStore::new();
        let state = RepoState::initial("main").unwrap();
        state.save(&records).unwrap();

        let loaded = RepoState::load(&records).unwrap();
        assert_eq!(loaded.branches.current(), "main");
        assert_eq!(loaded.graph.len(), 1);
        assert!(loaded.staging.is_empty());
        assert_eq!(loaded.head_commit().unwrap().message(), "initial commit");
    }

    #[test]
    fn missing_record_is_corrupt() {
        let records = MemoryRecordStore::new();
        let state = RepoState::initial("master").unwrap();
        records
            .save(RecordKey::Branches, &state.branches.to_bytes().unwrap())
            .unwrap();

        match RepoState::load(&records) {
            Err(TwigError::CorruptRecord { key, .. }) => assert_eq!(key, "graph"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn garbage_record_is_corrupt() {
        let records = MemoryRecordStore::new();
        RepoState::initial("master").unwrap().save(&records).unwrap();
        records.save(RecordKey::Staging, b"\xff\xff\xff").unwrap();

        let err = RepoState::load(&records).unwrap_err();
        assert!(matches!(err, TwigError::CorruptRecord { ref key, .. } if key == "staging"));
        assert!(!err.is_user_error());
    }
}
