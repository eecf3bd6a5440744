//! Hashing backends for the Merkle commitment layer.
//!
//! The tree consumes a [`NodeHasher`] handle injected through the
//! configuration; SHA-256 is the default backend and Blake2s-256 ships as an
//! alternate. Any `Fn(&[u8]) -> Result<Vec<u8>, HashError>` closure also
//! satisfies the trait.

mod blake2s;
mod sha256;

pub use blake2s::Blake2sHasher;
pub use sha256::Sha256Hasher;

use std::fmt;

/// Error surfaced by a hashing backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashError {
    reason: String,
}

impl HashError {
    /// Creates a hashing error with the supplied reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Returns the failure reason.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Consumes the error and returns the owned reason.
    pub fn into_reason(self) -> String {
        self.reason
    }
}

impl fmt::Display for HashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hash invocation failed: {}", self.reason)
    }
}

impl std::error::Error for HashError {}

/// Hash abstraction used for leaves and internal nodes.
///
/// The output length MUST be constant across invocations; the tree records
/// the first observed length and rejects divergent ones. Implementations
/// MUST be re-entrant and side-effect free: the tree invokes the hasher
/// concurrently from multiple workers without synchronisation.
pub trait NodeHasher: Send + Sync {
    /// Hashes the supplied bytes into a digest.
    fn hash(&self, bytes: &[u8]) -> Result<Vec<u8>, HashError>;
}

impl<F> NodeHasher for F
where
    F: Fn(&[u8]) -> Result<Vec<u8>, HashError> + Send + Sync,
{
    fn hash(&self, bytes: &[u8]) -> Result<Vec<u8>, HashError> {
        self(bytes)
    }
}
