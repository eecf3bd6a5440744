use blake2::{Blake2s256, Digest};

use super::{HashError, NodeHasher};

/// Blake2s-256 backend, an alternate to the SHA-256 default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake2sHasher;

impl Blake2sHasher {
    /// Creates a new Blake2s-256 backend.
    pub fn new() -> Self {
        Self
    }
}

impl NodeHasher for Blake2sHasher {
    fn hash(&self, bytes: &[u8]) -> Result<Vec<u8>, HashError> {
        Ok(Blake2s256::digest(bytes).to_vec())
    }
}
