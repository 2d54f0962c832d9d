use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use twig_types::ObjectId;

use crate::error::StoreResult;
use crate::object::Blob;
use crate::traits::ObjectStore;

/// Blob store held in a map, for tests and embedding.
#[derive(Default)]
pub struct InMemoryObjectStore {
    blobs: RwLock<HashMap<ObjectId, Blob>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct blobs held.
    pub fn len(&self) -> usize {
        self.blobs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<Blob>> {
        let blobs = self.blobs.read().unwrap_or_else(PoisonError::into_inner);
        Ok(blobs.get(id).cloned())
    }

    fn write(&self, blob: &Blob) -> StoreResult<ObjectId> {
        let id = blob.id();
        self.blobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id)
            .or_insert_with(|| blob.clone());
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        let blobs = self.blobs.read().unwrap_or_else(PoisonError::into_inner);
        Ok(blobs.contains_key(id))
    }

    fn delete(&self, id: &ObjectId) -> StoreResult<bool> {
        let mut blobs = self.blobs.write().unwrap_or_else(PoisonError::into_inner);
        Ok(blobs.remove(id).is_some())
    }
}

impl fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InMemoryObjectStore({} blobs)", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn stored_blob_reads_back_under_its_id() {
        let store = InMemoryObjectStore::new();
        let blob = Blob::new("hello world");
        let id = store.write(&blob).unwrap();
        assert_eq!(id, Blob::id_of(b"hello world"));
        assert_eq!(store.get(&id).unwrap(), blob);
    }

    #[test]
    fn unknown_id() {
        let store = InMemoryObjectStore::new();
        let id = Blob::id_of(b"never written");
        assert_eq!(store.read(&id).unwrap(), None);
        assert!(!store.exists(&id).unwrap());
        assert!(matches!(store.get(&id), Err(StoreError::NotFound(missing)) if missing == id));
    }

    #[test]
    fn equal_content_deduplicates() {
        let store = InMemoryObjectStore::new();
        assert!(store.is_empty());
        let a = store.write(&Blob::new("same")).unwrap();
        let b = store.write(&Blob::from(b"same".to_vec())).unwrap();
        store.write(&Blob::new("other")).unwrap();
        assert_eq!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn delete_is_reported_once() {
        let store = InMemoryObjectStore::new();
        let id = store.write(&Blob::new("short-lived")).unwrap();
        assert!(store.delete(&id).unwrap());
        assert!(!store.delete(&id).unwrap());
        assert_eq!(store.read(&id).unwrap(), None);
    }

    #[test]
    fn shared_across_threads() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryObjectStore::new());
        let workers: Vec<_> = (0..4u8)
            .map(|n| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.write(&Blob::new(vec![n; 16])).unwrap())
            })
            .collect();
        let ids: Vec<ObjectId> = workers.into_iter().map(|w| w.join().unwrap()).collect();

        assert_eq!(store.len(), 4);
        for id in ids {
            assert!(store.exists(&id).unwrap());
        }
    }
}
