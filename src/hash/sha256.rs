use sha2::{Digest, Sha256};

use super::{HashError, NodeHasher};

/// SHA-256 backend, the default hash function of the library.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Sha256Hasher {
    /// Creates a new SHA-256 backend.
    pub fn new() -> Self {
        Self
    }
}

impl NodeHasher for Sha256Hasher {
    fn hash(&self, bytes: &[u8]) -> Result<Vec<u8>, HashError> {
        Ok(Sha256::digest(bytes).to_vec())
    }
}
