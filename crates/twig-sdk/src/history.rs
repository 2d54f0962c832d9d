use std::fmt::Write;

use twig_dag::{Commit, CommitId};
use twig_types::Timestamp;

use crate::config::RepoConfig;
use crate::error::TwigResult;

/// Summary of one commit for `log` and `global-log`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub id: CommitId,
    pub parent: Option<CommitId>,
    pub merge_parent: Option<CommitId>,
    pub timestamp: Timestamp,
    pub message: String,
}

impl LogEntry {
    pub fn is_merge(&self) -> bool {
        self.merge_parent.is_some()
    }

    /// Render in log format, including the trailing blank line.
    ///
    /// ```text
    /// ===
    /// commit <id>
    /// Merge: <parent> <merge parent>
    /// Date: Thu Jan 1 00:00:00 1970 +0000
    /// <message>
    ///
    /// ```
    ///
    /// The `Merge:` line appears for merge commits only.
    pub fn render(&self, config: &RepoConfig) -> TwigResult<String> {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "===");
        let _ = writeln!(out, "commit {}", self.id);
        if let (Some(parent), Some(merge_parent)) = (self.parent, self.merge_parent) {
            let _ = writeln!(
                out,
                "Merge: {} {}",
                parent.short_hex(config.short_id_len),
                merge_parent.short_hex(config.short_id_len)
            );
        }
        let _ = writeln!(out, "Date: {}", self.timestamp.format_log(config.log.utc)?);
        let _ = writeln!(out, "{}", self.message);
        out.push('\n');
        Ok(out)
    }
}

impl From<&Commit> for LogEntry {
    fn from(commit: &Commit) -> Self {
        Self {
            id: commit.id(),
            parent: commit.parent(),
            merge_parent: commit.merge_parent(),
            timestamp: commit.timestamp(),
            message: commit.message().to_string(),
        }
    }
}

/// Render a sequence of entries back to back.
pub fn render_all(entries: &[LogEntry], config: &RepoConfig) -> TwigResult<String> {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&entry.render(config)?);
    }
    Ok(out)
}
