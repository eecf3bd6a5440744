//! Construction-time configuration for [`MerkleTree`](crate::MerkleTree).
//!
//! The configuration is consumed once at construction and never mutated
//! afterwards; the tree keeps its own copy so post-construction operations
//! (`generate_proof`, `verify`) run under the exact convention the tree was
//! built with.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::hash::{NodeHasher, Sha256Hasher};

/// Operating mode selecting which intermediate state a construction retains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeMode {
    /// Materialise all per-leaf proofs during reduction and discard the
    /// intermediate levels.
    ProofGen,
    /// Retain the full level matrix; proofs are generated on demand.
    TreeBuild,
    /// Retain both the level matrix and all per-leaf proofs.
    ProofAndTreeBuild,
}

impl TreeMode {
    /// Whether a construction under this mode keeps the level matrix.
    pub fn retains_levels(&self) -> bool {
        matches!(self, TreeMode::TreeBuild | TreeMode::ProofAndTreeBuild)
    }

    /// Whether a construction under this mode materialises per-leaf proofs.
    pub fn retains_proofs(&self) -> bool {
        matches!(self, TreeMode::ProofGen | TreeMode::ProofAndTreeBuild)
    }
}

/// Immutable configuration record consumed by the constructor.
#[derive(Clone)]
pub struct MerkleConfig {
    /// Hash backend applied to leaves and internal nodes.
    pub hasher: Arc<dyn NodeHasher>,
    /// Retention mode, see [`TreeMode`].
    pub mode: TreeMode,
    /// Run per-level map operations on a bounded worker pool.
    pub parallel: bool,
    /// Worker count for the pool; `0` defers to the number of available
    /// CPUs. Only read when `parallel` is set.
    pub num_workers: usize,
    /// Order every sibling pair lexicographically before concatenation.
    pub sort_siblings: bool,
    /// Treat block bytes as already-hashed digests of the hash length.
    pub disable_leaf_hashing: bool,
}

impl Default for MerkleConfig {
    fn default() -> Self {
        Self {
            hasher: Arc::new(Sha256Hasher::new()),
            mode: TreeMode::ProofGen,
            parallel: false,
            num_workers: 0,
            sort_siblings: false,
            disable_leaf_hashing: false,
        }
    }
}

impl fmt::Debug for MerkleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerkleConfig")
            .field("mode", &self.mode)
            .field("parallel", &self.parallel)
            .field("num_workers", &self.num_workers)
            .field("sort_siblings", &self.sort_siblings)
            .field("disable_leaf_hashing", &self.disable_leaf_hashing)
            .finish_non_exhaustive()
    }
}
