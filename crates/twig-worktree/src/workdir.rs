use std::collections::BTreeMap;

use twig_store::Blob;
use twig_types::ObjectId;

use crate::error::WorktreeResult;

/// Raw file I/O over a flat working tree.
///
/// Paths are bare file names relative to the working-tree root. The
/// repository metadata directory is never visible through this trait.
pub trait Workdir: Send + Sync {
    /// Read a file. Returns `Ok(None)` if it does not exist.
    fn read_file(&self, path: &str) -> WorktreeResult<Option<Vec<u8>>>;

    /// Create or overwrite a file.
    fn write_file(&self, path: &str, data: &[u8]) -> WorktreeResult<()>;

    /// Delete a file. Returns `true` if it existed.
    fn delete_file(&self, path: &str) -> WorktreeResult<bool>;

    /// Names of all plain files in the working tree, sorted.
    fn list_files(&self) -> WorktreeResult<Vec<String>>;

    fn exists(&self, path: &str) -> WorktreeResult<bool> {
        Ok(self.read_file(path)?.is_some())
    }

    /// Blob id the file's current content would have, if the file exists.
    fn blob_id(&self, path: &str) -> WorktreeResult<Option<ObjectId>> {
        Ok(self.read_file(path)?.map(|data| Blob::id_of(&data)))
    }
}

/// Blob id of every file in the working tree.
pub fn working_blob_ids(workdir: &dyn Workdir) -> WorktreeResult<BTreeMap<String, ObjectId>> {
    let mut ids = BTreeMap::new();
    for path in workdir.list_files()? {
        if let Some(id) = workdir.blob_id(&path)? {
            ids.insert(path, id);
        }
    }
    Ok(ids)
}
