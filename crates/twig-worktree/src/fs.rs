use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::error::{WorktreeError, WorktreeResult};
use crate::workdir::Workdir;

/// Working tree backed by a directory on disk.
///
/// Only the top level of `root` is tracked. Subdirectories, including the
/// metadata directory, are ignored.
#[derive(Debug, Clone)]
pub struct FsWorkdir {
    root: PathBuf,
    meta_dir: String,
}

impl FsWorkdir {
    /// Working tree at `root`, hiding the `meta_dir` entry (e.g. `.twig`).
    pub fn new(root: impl Into<PathBuf>, meta_dir: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            meta_dir: meta_dir.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> WorktreeResult<PathBuf> {
        let plain = !path.is_empty()
            && path != "."
            && path != ".."
            && path != self.meta_dir
            && !path.contains(['/', '\\', '\0']);
        if !plain {
            return Err(WorktreeError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(path))
    }
}

impl Workdir for FsWorkdir {
    fn read_file(&self, path: &str) -> WorktreeResult<Option<Vec<u8>>> {
        let full = self.resolve(path)?;
        if !full.is_file() {
            return Ok(None);
        }
        match fs::read(&full) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_file(&self, path: &str, data: &[u8]) -> WorktreeResult<()> {
        let full = self.resolve(path)?;
        fs::write(full, data)?;
        Ok(())
    }

    fn delete_file(&self, path: &str) -> WorktreeResult<bool> {
        let full = self.resolve(path)?;
        if !full.is_file() {
            return Ok(false);
        }
        match fs::remove_file(full) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list_files(&self) -> WorktreeResult<Vec<String>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) if name != self.meta_dir => files.push(name.to_string()),
                Some(_) => {}
                None => warn!(path = %entry.path().display(), "skipping non-UTF-8 file name"),
            }
        }
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_workdir() -> (tempfile::TempDir, FsWorkdir) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".twig")).unwrap();
        let wd = FsWorkdir::new(dir.path(), ".twig");
        (dir, wd)
    }

    #[test]
    fn write_then_read() {
        let (_dir, wd) = temp_workdir();
        wd.write_file("hello.txt", b"hello\n").unwrap();
        assert_eq!(wd.read_file("hello.txt").unwrap(), Some(b"hello\n".to_vec()));
    }

    #[test]
    fn missing_file_reads_as_none() {
        let (_dir, wd) = temp_workdir();
        assert!(wd.read_file("nope").unwrap().is_none());
        assert!(!wd.delete_file("nope").unwrap());
    }

    #[test]
    fn listing_skips_directories_and_metadata() {
        let (dir, wd) = temp_workdir();
        wd.write_file("b.txt", b"b").unwrap();
        wd.write_file("a.txt", b"a").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("inner.txt"), b"x").unwrap();
        fs::write(dir.path().join(".twig").join("graph"), b"x").unwrap();

        assert_eq!(wd.list_files().unwrap(), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn delete_removes_file() {
        let (dir, wd) = temp_workdir();
        wd.write_file("gone.txt", b"bye").unwrap();
        assert!(wd.delete_file("gone.txt").unwrap());
        assert!(!dir.path().join("gone.txt").exists());
    }

    #[test]
    fn nested_and_metadata_paths_are_rejected() {
        let (_dir, wd) = temp_workdir();
        assert!(matches!(
            wd.write_file("sub/x", b""),
            Err(WorktreeError::InvalidPath(_))
        ));
        assert!(matches!(
            wd.read_file(".twig"),
            Err(WorktreeError::InvalidPath(_))
        ));
        assert!(matches!(wd.read_file(""), Err(WorktreeError::InvalidPath(_))));
    }

    #[test]
    fn directory_is_not_a_file() {
        let (dir, wd) = temp_workdir();
        fs::create_dir(dir.path().join("folder")).unwrap();
        assert!(wd.read_file("folder").unwrap().is_none());
        assert!(!wd.delete_file("folder").unwrap());
    }
}
