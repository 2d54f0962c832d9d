use std::fs;
use std::path::Path;

use tracing::{debug, info};

use twig_dag::{CommitId, DagError};
use twig_index::{RemovalOutcome, StageOutcome, StatusReport};
use twig_merge::{conflict_markers, plan_merge, MergeAction};
use twig_store::{Blob, FileObjectStore, InMemoryObjectStore, ObjectStore};
use twig_types::{ObjectId, Timestamp};
use twig_worktree::{working_blob_ids, FsWorkdir, MemoryWorkdir, Synchronizer, Workdir};

use crate::config::RepoConfig;
use crate::error::{TwigError, TwigResult};
use crate::history::{self, LogEntry};
use crate::merge::MergeReport;
use crate::record::{FsRecordStore, MemoryRecordStore, RecordStore};
use crate::state::RepoState;

/// Name of the metadata directory at the root of the working tree.
pub const META_DIR: &str = ".twig";
/// Configuration file inside [`META_DIR`].
pub const CONFIG_FILE: &str = "config.toml";
/// Blob store directory inside [`META_DIR`].
pub const OBJECTS_DIR: &str = "objects";

/// A Twig repository: persisted state, blob store and working tree.
///
/// Every command loads [`RepoState`], mutates it and saves it back only if
/// the whole command succeeded.
pub struct Repository {
    records: Box<dyn RecordStore>,
    objects: Box<dyn ObjectStore>,
    workdir: Box<dyn Workdir>,
    config: RepoConfig,
}

impl Repository {
    pub fn new(
        records: Box<dyn RecordStore>,
        objects: Box<dyn ObjectStore>,
        workdir: Box<dyn Workdir>,
        config: RepoConfig,
    ) -> Self {
        Self {
            records,
            objects,
            workdir,
            config,
        }
    }

    /// A repository held entirely in memory. Call [`Repository::init`]
    /// before any other command.
    pub fn in_memory(config: RepoConfig) -> Self {
        Self::new(
            Box::new(MemoryRecordStore::new()),
            Box::new(InMemoryObjectStore::new()),
            Box::new(MemoryWorkdir::new()),
            config,
        )
    }

    /// Create `.twig` under `root` with a default configuration and
    /// initialize it.
    pub fn init_fs(root: &Path) -> TwigResult<Self> {
        let meta = root.join(META_DIR);
        if meta.exists() {
            return Err(TwigError::AlreadyInitialized);
        }
        fs::create_dir_all(&meta)?;
        let config = RepoConfig::default();
        config.save(&meta.join(CONFIG_FILE))?;

        let repo = Self::fs_backed(root, config)?;
        repo.init()?;
        Ok(repo)
    }

    /// Open the repository whose `.twig` directory is directly under `root`.
    pub fn open_fs(root: &Path) -> TwigResult<Self> {
        let meta = root.join(META_DIR);
        if !meta.is_dir() {
            return Err(TwigError::NotInitialized);
        }
        let config = RepoConfig::load(&meta.join(CONFIG_FILE))?;
        Self::fs_backed(root, config)
    }

    fn fs_backed(root: &Path, config: RepoConfig) -> TwigResult<Self> {
        let meta = root.join(META_DIR);
        Ok(Self::new(
            Box::new(FsRecordStore::new(&meta)),
            Box::new(FileObjectStore::open(meta.join(OBJECTS_DIR))?),
            Box::new(FsWorkdir::new(root, META_DIR)),
            config,
        ))
    }

    // ---- Accessors ----

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    pub fn workdir(&self) -> &dyn Workdir {
        self.workdir.as_ref()
    }

    pub fn objects(&self) -> &dyn ObjectStore {
        self.objects.as_ref()
    }

    /// Load the current persisted state.
    pub fn state(&self) -> TwigResult<RepoState> {
        RepoState::load(self.records.as_ref())
    }

    fn save(&self, state: &RepoState) -> TwigResult<()> {
        state.save(self.records.as_ref())
    }

    fn synchronizer(&self) -> Synchronizer<'_> {
        Synchronizer::new(self.objects.as_ref(), self.workdir.as_ref())
    }

    // ---- Setup ----

    /// Create the root commit and the default branch.
    pub fn init(&self) -> TwigResult<()> {
        if self.records.is_initialized()? {
            return Err(TwigError::AlreadyInitialized);
        }
        let state = RepoState::initial(&self.config.default_branch)?;
        self.save(&state)?;
        info!(branch = %self.config.default_branch, "initialized repository");
        Ok(())
    }

    // ---- Staging ----

    /// Store the working copy of `path` and stage it.
    pub fn add(&self, path: &str) -> TwigResult<StageOutcome> {
        let mut state = self.state()?;
        let data = self
            .workdir
            .read_file(path)?
            .ok_or_else(|| TwigError::FileNotFound(path.to_string()))?;
        let blob_id = self.objects.write(&Blob::new(data))?;

        let head = state.graph.get(&state.branches.current_head())?;
        let outcome = state.staging.stage_addition(path, blob_id, head.snapshot())?;
        self.save(&state)?;
        debug!(path, ?outcome, "add");
        Ok(outcome)
    }

    /// Unstage `path`, or stage its removal and delete it from the working
    /// tree if the head tracks it.
    pub fn rm(&self, path: &str) -> TwigResult<RemovalOutcome> {
        let mut state = self.state()?;
        let head = state.graph.get(&state.branches.current_head())?;
        let outcome = state.staging.stage_removal(path, head.snapshot())?;
        if outcome == RemovalOutcome::MarkedForRemoval {
            self.workdir.delete_file(path)?;
        }
        self.save(&state)?;
        debug!(path, ?outcome, "rm");
        Ok(outcome)
    }

    // ---- Commits ----

    /// Commit the staged changes on the current branch.
    pub fn commit(&self, message: &str) -> TwigResult<CommitId> {
        self.commit_at(message, Timestamp::now())
    }

    /// Like [`Repository::commit`] with an explicit timestamp.
    pub fn commit_at(&self, message: &str, timestamp: Timestamp) -> TwigResult<CommitId> {
        let mut state = self.state()?;
        if state.staging.is_empty() {
            return Err(DagError::NothingToCommit.into());
        }
        let parent = state.branches.current_head();
        let next = state
            .staging
            .reconcile_for_commit(state.graph.get(&parent)?.snapshot());

        let id = state.graph.create_commit(message, parent, next, timestamp)?;
        state.branches.advance_current(id)?;
        state.staging.clear();
        self.save(&state)?;
        info!(commit = %id.short_hex(12), branch = state.branches.current(), "committed");
        Ok(id)
    }

    // ---- Checkout ----

    /// Restore `path` from the current head. Staging is untouched.
    pub fn checkout_file(&self, path: &str) -> TwigResult<()> {
        let state = self.state()?;
        self.synchronizer().restore_file(state.head_commit()?, path)?;
        Ok(())
    }

    /// Restore `path` from the commit named by a full or abbreviated id.
    pub fn checkout_file_at(&self, commit: &str, path: &str) -> TwigResult<()> {
        let state = self.state()?;
        let id = state.graph.resolve_abbreviated(commit)?;
        self.synchronizer().restore_file(state.graph.get(&id)?, path)?;
        Ok(())
    }

    /// Switch to branch `name`, replacing the working tree.
    pub fn checkout_branch(&self, name: &str) -> TwigResult<()> {
        let mut state = self.state()?;
        self.synchronizer().restore_branch(
            name,
            &state.graph,
            &mut state.branches,
            &mut state.staging,
        )?;
        self.save(&state)
    }

    /// Move the current branch to `commit` and check it out.
    pub fn reset(&self, commit: &str) -> TwigResult<CommitId> {
        let mut state = self.state()?;
        let target = self.synchronizer().reset(
            commit,
            &state.graph,
            &mut state.branches,
            &mut state.staging,
        )?;
        self.save(&state)?;
        Ok(target)
    }

    // ---- Branches ----

    /// Create `name` at the current head without switching to it.
    pub fn branch(&self, name: &str) -> TwigResult<CommitId> {
        let mut state = self.state()?;
        let current = state.branches.current().to_string();
        let head = state.branches.create(name, &current)?;
        self.save(&state)?;
        info!(branch = name, head = %head.short_hex(12), "created branch");
        Ok(head)
    }

    /// Delete the pointer `name`. Its commits are kept.
    pub fn rm_branch(&self, name: &str) -> TwigResult<()> {
        let mut state = self.state()?;
        state.branches.delete(name)?;
        self.save(&state)?;
        info!(branch = name, "removed branch");
        Ok(())
    }

    // ---- History ----

    /// First-parent history of the current branch, newest first.
    pub fn log(&self) -> TwigResult<Vec<LogEntry>> {
        let state = self.state()?;
        let chain = state.graph.ancestor_chain(&state.branches.current_head())?;
        Ok(chain.into_iter().rev().map(LogEntry::from).collect())
    }

    /// Every commit once, newest first; equal timestamps order by id.
    pub fn global_log(&self) -> TwigResult<Vec<LogEntry>> {
        let state = self.state()?;
        let mut entries: Vec<LogEntry> = state.graph.iter().map(LogEntry::from).collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(a.id.cmp(&b.id)));
        Ok(entries)
    }

    /// Render entries in log format using this repository's settings.
    pub fn render_log(&self, entries: &[LogEntry]) -> TwigResult<String> {
        history::render_all(entries, &self.config)
    }

    /// Ids of every commit whose message is exactly `message`.
    pub fn find(&self, message: &str) -> TwigResult<Vec<CommitId>> {
        let state = self.state()?;
        let ids = state.graph.find_by_message(message);
        if ids.is_empty() {
            return Err(TwigError::NoCommitWithMessage(message.to_string()));
        }
        Ok(ids)
    }

    pub fn status(&self) -> TwigResult<StatusReport> {
        let state = self.state()?;
        let working = working_blob_ids(self.workdir.as_ref())?;
        Ok(StatusReport::compute(
            state.branches.branches().map(|b| (b.name, b.is_current)),
            &state.staging,
            state.head_commit()?.snapshot(),
            &working,
        ))
    }

    // ---- Merge ----

    /// Merge branch `given` into the current branch.
    pub fn merge(&self, given: &str) -> TwigResult<MergeReport> {
        let mut state = self.state()?;
        if !state.staging.is_empty() {
            return Err(TwigError::UncommittedChanges);
        }
        let given_head = state.branches.head_of(given)?;
        if state.branches.current() == given {
            return Err(TwigError::CannotMergeWithSelf);
        }
        let current_head = state.branches.current_head();
        let sync = self.synchronizer();

        let current_snapshot = state.graph.get(&current_head)?.snapshot().clone();
        let given_snapshot = state.graph.get(&given_head)?.snapshot().clone();
        sync.check_untracked(&current_snapshot, &given_snapshot)?;

        let base = state.graph.merge_base(&current_head, &given_head)?;
        if base == given_head {
            return Ok(MergeReport::GivenIsAncestor);
        }
        if base == current_head {
            sync.move_current_to(
                given_head,
                &state.graph,
                &mut state.branches,
                &mut state.staging,
            )?;
            self.save(&state)?;
            info!(branch = given, head = %given_head.short_hex(12), "fast-forwarded");
            return Ok(MergeReport::FastForwarded(given_head));
        }

        let base_snapshot = state.graph.get(&base)?.snapshot().clone();
        let plan = plan_merge(&base_snapshot, &current_snapshot, &given_snapshot);

        // Resolve every new file's content before the working tree changes.
        let mut writes: Vec<(&str, ObjectId, Vec<u8>)> = Vec::new();
        let mut removals: Vec<&str> = Vec::new();
        for (path, action) in plan.actions() {
            match action {
                MergeAction::KeepCurrent => {}
                MergeAction::TakeGiven(id) => {
                    writes.push((path, id, self.objects.get(&id)?.into_data()));
                }
                MergeAction::Remove => removals.push(path),
                MergeAction::Conflict { current, given } => {
                    let content =
                        conflict_markers(&self.content_of(current)?, &self.content_of(given)?);
                    let id = self.objects.write(&Blob::new(content.clone()))?;
                    writes.push((path, id, content));
                }
            }
        }

        for (path, id, content) in &writes {
            self.workdir.write_file(path, content)?;
            state.staging.stage_addition(path, *id, &current_snapshot)?;
        }
        for path in removals {
            self.workdir.delete_file(path)?;
            state.staging.stage_removal(path, &current_snapshot)?;
        }

        let message = format!("Merged {given} into {}.", state.branches.current());
        let next = state.staging.reconcile_for_commit(&current_snapshot);
        let commit = state.graph.create_merge_commit(
            &message,
            current_head,
            given_head,
            next,
            Timestamp::now(),
        )?;
        state.branches.advance_current(commit)?;
        state.staging.clear();
        self.save(&state)?;

        let conflicts: Vec<String> = plan.conflicts().map(str::to_string).collect();
        info!(
            commit = %commit.short_hex(12),
            conflicts = conflicts.len(),
            "merged {given}"
        );
        Ok(MergeReport::Merged { commit, conflicts })
    }

    fn content_of(&self, blob: Option<ObjectId>) -> TwigResult<Vec<u8>> {
        match blob {
            Some(id) => Ok(self.objects.get(&id)?.into_data()),
            None => Ok(Vec::new()),
        }
    }
}
