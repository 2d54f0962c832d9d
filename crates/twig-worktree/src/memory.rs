use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::error::WorktreeResult;
use crate::workdir::Workdir;

/// In-memory working tree for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryWorkdir {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryWorkdir {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a working tree holding the given files.
    pub fn with_files<I, P, D>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, D)>,
        P: Into<String>,
        D: Into<Vec<u8>>,
    {
        let files = files
            .into_iter()
            .map(|(p, d)| (p.into(), d.into()))
            .collect();
        Self {
            files: RwLock::new(files),
        }
    }

    /// Read a file as UTF-8 text, for assertions.
    pub fn read_string(&self, path: &str) -> Option<String> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .map(|data| String::from_utf8_lossy(data).into_owned())
    }
}

impl Workdir for MemoryWorkdir {
    fn read_file(&self, path: &str) -> WorktreeResult<Option<Vec<u8>>> {
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
        Ok(files.get(path).cloned())
    }

    fn write_file(&self, path: &str, data: &[u8]) -> WorktreeResult<()> {
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);
        files.insert(path.to_string(), data.to_vec());
        Ok(())
    }

    fn delete_file(&self, path: &str) -> WorktreeResult<bool> {
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);
        Ok(files.remove(path).is_some())
    }

    fn list_files(&self) -> WorktreeResult<Vec<String>> {
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
        Ok(files.keys().cloned().collect())
    }
}
