//! Proof extraction from retained levels and stateless verification.

use std::fmt;
use std::sync::Arc;

use crate::block::DataBlock;
use crate::hash::{NodeHasher, Sha256Hasher};
use crate::MerkleResult;

use super::types::{Digest, MerkleError, PathBits, Proof};

/// Convention subset consumed by the stateless verifier.
///
/// `hasher` falls back to SHA-256 when absent. The two flags are not read
/// from any tree: they restate the convention the proof was built under,
/// which prover and verifier negotiate out of band.
#[derive(Clone, Default)]
pub struct VerifyOptions {
    /// Hash backend; `None` selects SHA-256.
    pub hasher: Option<Arc<dyn NodeHasher>>,
    /// The proof was built under the sorted-sibling convention.
    pub sort_siblings: bool,
    /// Block bytes are already-hashed digests.
    pub disable_leaf_hashing: bool,
}

impl fmt::Debug for VerifyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyOptions")
            .field("sort_siblings", &self.sort_siblings)
            .field("disable_leaf_hashing", &self.disable_leaf_hashing)
            .finish_non_exhaustive()
    }
}

/// Recomputes the root from `block` and `proof` and compares it to `root`.
///
/// The routine is pure and never touches a tree object. Returns `Ok(false)`
/// on a digest mismatch; structural defects (sibling length disagreement,
/// hash failures) surface as errors instead.
pub fn verify<Q>(
    block: &Q,
    proof: &Proof,
    root: &Digest,
    options: &VerifyOptions,
) -> MerkleResult<bool>
where
    Q: DataBlock + ?Sized,
{
    let default_hasher;
    let hasher: &dyn NodeHasher = match options.hasher.as_deref() {
        Some(hasher) => hasher,
        None => {
            default_hasher = Sha256Hasher::new();
            &default_hasher
        }
    };

    let bytes = block
        .serialize()
        .map_err(|err| MerkleError::BlockSerialize {
            index: 0,
            reason: err.into_reason(),
        })?;
    let mut running = if options.disable_leaf_hashing {
        if bytes.len() != root.len() {
            return Err(MerkleError::MalformedLeaf {
                index: 0,
                expected: root.len(),
                got: bytes.len(),
            });
        }
        bytes
    } else {
        hasher.hash(&bytes).map_err(|err| MerkleError::Hash {
            level: 0,
            position: 0,
            reason: err.into_reason(),
        })?
    };

    for (level, sibling) in proof.siblings.iter().enumerate() {
        if sibling.len() != running.len() {
            return Err(MerkleError::ProofMalformed {
                reason: "sibling length disagrees with recomputed digest",
            });
        }
        let sibling_is_left = proof.path_bits.bit(level);
        let (mut x, mut y) = if sibling_is_left {
            (sibling.as_bytes(), running.as_slice())
        } else {
            (running.as_slice(), sibling.as_bytes())
        };
        if options.sort_siblings && x > y {
            std::mem::swap(&mut x, &mut y);
        }
        let mut buf = Vec::with_capacity(x.len() + y.len());
        buf.extend_from_slice(x);
        buf.extend_from_slice(y);
        let digest = hasher.hash(&buf).map_err(|err| MerkleError::Hash {
            level: level + 1,
            position: 0,
            reason: err.into_reason(),
        })?;
        if digest.len() != running.len() {
            return Err(MerkleError::HashLengthMismatch {
                expected: running.len(),
                got: digest.len(),
            });
        }
        running = digest;
    }

    Ok(running.as_slice() == root.as_bytes())
}

/// Walks the retained padded levels upward from `leaf`, collecting the
/// sibling and placement bit at every generation below the root.
pub(super) fn extract_proof(levels: &[Vec<Digest>], leaf: usize, depth: usize) -> Proof {
    let mut siblings = Vec::with_capacity(depth);
    let mut path_bits = PathBits::with_depth(depth);
    let mut index = leaf;
    for level in 0..depth {
        let nodes = &levels[level];
        siblings.push(nodes[index ^ 1].clone());
        if index & 1 == 1 {
            path_bits.set(level);
        }
        index >>= 1;
    }
    Proof {
        siblings,
        path_bits,
    }
}
