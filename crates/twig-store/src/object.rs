use twig_crypto::ContentHasher;
use twig_types::ObjectId;

/// Immutable file contents, addressed by hash.
#[derive(Clone, PartialEq, Eq)]
pub struct Blob {
    data: Vec<u8>,
}

impl Blob {
    /// Create a new blob from raw bytes.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    /// The content-addressed id of this blob.
    pub fn id(&self) -> ObjectId {
        Self::id_of(&self.data)
    }

    /// Compute the id raw bytes would have as a blob, without allocating one.
    pub fn id_of(data: &[u8]) -> ObjectId {
        ContentHasher::BLOB.hash(data)
    }

    /// The blob's bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the blob and return its bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

impl std::fmt::Debug for Blob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blob")
            .field("id", &self.id())
            .field("size", &self.size())
            .finish()
    }
}

impl From<Vec<u8>> for Blob {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}
