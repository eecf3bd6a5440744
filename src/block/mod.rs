//! Data-block capability consumed during leaf construction.
//!
//! The tree never inspects block content; it only asks each block for its
//! canonical byte representation, exactly once per construction.

use std::fmt;

/// Error surfaced by a block whose canonical byte form cannot be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockError {
    reason: String,
}

impl BlockError {
    /// Creates a serialization error with the supplied reason.
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

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block serialization failed: {}", self.reason)
    }
}

impl std::error::Error for BlockError {}

/// Capability producing the canonical bytes of a data block.
///
/// Implementations are invoked at most once per block during construction;
/// they need not be idempotent but SHOULD be. Blocks are shared across
/// workers during parallel leaf hashing, hence the `Send + Sync` bound.
pub trait DataBlock: Send + Sync {
    /// Returns the canonical byte representation of the block.
    fn serialize(&self) -> Result<Vec<u8>, BlockError>;
}

impl DataBlock for Vec<u8> {
    fn serialize(&self) -> Result<Vec<u8>, BlockError> {
        Ok(self.clone())
    }
}

impl DataBlock for &[u8] {
    fn serialize(&self) -> Result<Vec<u8>, BlockError> {
        Ok(self.to_vec())
    }
}

impl DataBlock for String {
    fn serialize(&self) -> Result<Vec<u8>, BlockError> {
        Ok(self.as_bytes().to_vec())
    }
}
