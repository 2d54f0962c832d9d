use twig_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::Blob;

/// Content-addressed blob store.
///
/// Implementations must satisfy these invariants:
/// - A blob's id is always `Blob::id()` of its bytes.
/// - Writing a blob that already exists is a no-op.
/// - Reads are safe to run concurrently.
pub trait ObjectStore: Send + Sync {
    /// Read a blob by id.
    ///
    /// Returns `Ok(None)` if the blob does not exist.
    fn read(&self, id: &ObjectId) -> StoreResult<Option<Blob>>;

    /// Write a blob and return its id.
    fn write(&self, blob: &Blob) -> StoreResult<ObjectId>;

    /// Check whether a blob exists.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Delete a blob by id. Returns `true` if the blob existed.
    fn delete(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Read a blob that must exist.
    fn get(&self, id: &ObjectId) -> StoreResult<Blob> {
        self.read(id)?.ok_or(StoreError::NotFound(*id))
    }
}
