use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use twig_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::Blob;
use crate::traits::ObjectStore;

/// On-disk object store.
///
/// Blobs live at `<root>/<first 2 hex>/<remaining 62 hex>`. Writes go to a
/// temp file in the same directory and are renamed into place, so a reader
/// never sees a partially written blob.
#[derive(Debug, Clone)]
pub struct FileObjectStore {
    root: PathBuf,
}

impl FileObjectStore {
    /// Open (or create) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, id: &ObjectId) -> PathBuf {
        let hex = id.to_hex();
        let (dir, file) = hex.split_at(2);
        self.root.join(dir).join(file)
    }
}

impl ObjectStore for FileObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<Blob>> {
        let path = self.object_path(id);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let blob = Blob::new(data);
        let computed = blob.id();
        if computed != *id {
            return Err(StoreError::HashMismatch { id: *id, computed });
        }
        Ok(Some(blob))
    }

    fn write(&self, blob: &Blob) -> StoreResult<ObjectId> {
        let id = blob.id();
        let path = self.object_path(&id);
        if path.exists() {
            return Ok(id);
        }
        let dir = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(blob.data())?;
        tmp.as_file().sync_data()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        tracing::debug!(blob = %id.short_hex(12), size = blob.size(), "wrote blob");
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).is_file())
    }

    fn delete(&self, id: &ObjectId) -> StoreResult<bool> {
        match fs::remove_file(self.object_path(id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, FileObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileObjectStore::open(dir.path().join("objects")).unwrap();
        (dir, store)
    }

    #[test]
    fn write_and_read() {
        let (_dir, store) = temp_store();
        let blob = Blob::new("file contents\n");
        let id = store.write(&blob).unwrap();
        assert_eq!(store.read(&id).unwrap(), Some(blob));
    }

    #[test]
    fn uses_two_level_layout() {
        let (_dir, store) = temp_store();
        let id = store.write(&Blob::new("layout")).unwrap();
        let hex = id.to_hex();
        let expected = store.root().join(&hex[..2]).join(&hex[2..]);
        assert!(expected.is_file());
    }

    #[test]
    fn write_is_idempotent() {
        let (_dir, store) = temp_store();
        let id1 = store.write(&Blob::new("same")).unwrap();
        let id2 = store.write(&Blob::new("same")).unwrap();
        assert_eq!(id1, id2);
    }

    #[test]
    fn missing_blob_reads_as_none() {
        let (_dir, store) = temp_store();
        let id = Blob::id_of(b"absent");
        assert!(store.read(&id).unwrap().is_none());
        assert!(!store.exists(&id).unwrap());
        assert!(!store.delete(&id).unwrap());
    }

    #[test]
    fn corrupted_blob_is_detected() {
        let (_dir, store) = temp_store();
        let id = store.write(&Blob::new("original")).unwrap();
        fs::write(store.object_path(&id), b"tampered").unwrap();
        assert!(matches!(
            store.read(&id),
            Err(StoreError::HashMismatch { .. })
        ));
    }

    #[test]
    fn reopen_sees_existing_blobs() {
        let (dir, store) = temp_store();
        let id = store.write(&Blob::new("persisted")).unwrap();
        drop(store);
        let reopened = FileObjectStore::open(dir.path().join("objects")).unwrap();
        assert!(reopened.exists(&id).unwrap());
    }

    #[test]
    fn delete_removes_file() {
        let (_dir, store) = temp_store();
        let id = store.write(&Blob::new("gone")).unwrap();
        assert!(store.delete(&id).unwrap());
        assert!(store.read(&id).unwrap().is_none());
    }
}
