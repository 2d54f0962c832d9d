use twig_types::ObjectId;

/// Domain-separated BLAKE3 content hasher.
///
/// The domain tag (e.g. `"twig-blob-v1"`) is fed to the hasher ahead of the
/// payload, followed by a `:` separator.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for file contents.
    pub const BLOB: Self = Self {
        domain: "twig-blob-v1",
    };
    /// Hasher for commit records.
    pub const COMMIT: Self = Self {
        domain: "twig-commit-v1",
    };
    /// Hasher for the path-to-blob mapping carried by a commit.
    pub const SNAPSHOT: Self = Self {
        domain: "twig-snapshot-v1",
    };

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> ObjectId {
        let mut hasher = self.start();
        hasher.update(data);
        ObjectId::from_hash(*hasher.finalize().as_bytes())
    }

    /// Hash a sequence of byte fields.
    ///
    /// Each part is length-prefixed, so `["ab", "c"]` and `["a", "bc"]`
    /// produce different ids.
    pub fn hash_parts<I, P>(&self, parts: I) -> ObjectId
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let mut hasher = self.start();
        for part in parts {
            let part = part.as_ref();
            hasher.update(&(part.len() as u64).to_le_bytes());
            hasher.update(part);
        }
        ObjectId::from_hash(*hasher.finalize().as_bytes())
    }

    /// Hash a serializable value as JSON with domain separation.
    pub fn hash_json<T: serde::Serialize>(&self, value: &T) -> Result<ObjectId, HasherError> {
        let data =
            serde_json::to_vec(value).map_err(|e| HasherError::Serialization(e.to_string()))?;
        Ok(self.hash(&data))
    }

    fn start(&self) -> blake3::Hasher {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let a = ContentHasher::BLOB.hash(b"hello world");
        let b = ContentHasher::BLOB.hash(b"hello world");
        assert_eq!(a, b);
    }

    #[test]
    fn domains_separate_hashes() {
        let data = b"same content";
        let blob = ContentHasher::BLOB.hash(data);
        let commit = ContentHasher::COMMIT.hash(data);
        let snapshot = ContentHasher::SNAPSHOT.hash(data);
        assert_ne!(blob, commit);
        assert_ne!(blob, snapshot);
        assert_ne!(commit, snapshot);
    }

    #[test]
    fn blob_hash_matches_manual_blake3() {
        let mut manual = blake3::Hasher::new();
        manual.update(b"twig-blob-v1:");
        manual.update(b"content");
        let expected = ObjectId::from_hash(*manual.finalize().as_bytes());
        assert_eq!(ContentHasher::BLOB.hash(b"content"), expected);
    }

    #[test]
    fn parts_are_length_prefixed() {
        let a = ContentHasher::COMMIT.hash_parts(["ab", "c"]);
        let b = ContentHasher::COMMIT.hash_parts(["a", "bc"]);
        assert_ne!(a, b);
        assert_eq!(a, ContentHasher::COMMIT.hash_parts(["ab", "c"]));
    }

    #[test]
    fn hash_json_is_stable() {
        let value = serde_json::json!({"message": "m", "parent": null});
        let a = ContentHasher::COMMIT.hash_json(&value).unwrap();
        let b = ContentHasher::COMMIT.hash_json(&value).unwrap();
        assert_eq!(a, b);
    }
}
