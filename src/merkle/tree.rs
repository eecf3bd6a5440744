use std::collections::HashMap;

use crate::block::DataBlock;
use crate::config::MerkleConfig;
use crate::MerkleResult;

use super::proof::{extract_proof, verify, VerifyOptions};
use super::types::{Digest, MerkleError, PathBits, Proof};

/// Merkle tree committing to an ordered block sequence.
///
/// Construction consumes the configuration and the blocks; the resulting
/// tree is read-only and may be shared across threads. Which intermediate
/// state survives construction is governed by
/// [`TreeMode`](crate::config::TreeMode).
#[derive(Debug)]
pub struct MerkleTree<B: DataBlock> {
    config: MerkleConfig,
    blocks: Vec<B>,
    root: Digest,
    depth: usize,
    leaf_count: usize,
    digest_len: usize,
    proofs: Option<Vec<Proof>>,
    levels: Option<Vec<Vec<Digest>>>,
    leaf_index: Option<HashMap<Vec<u8>, usize>>,
}

impl<B: DataBlock> MerkleTree<B> {
    /// Builds a tree over `blocks` under the supplied configuration.
    ///
    /// Fails with [`MerkleError::EmptyOrSingleBlock`] for fewer than two
    /// blocks; a single-block tree has no sibling structure to prove
    /// against.
    pub fn new(config: MerkleConfig, blocks: Vec<B>) -> MerkleResult<Self> {
        if blocks.len() < 2 {
            return Err(MerkleError::EmptyOrSingleBlock {
                count: blocks.len(),
            });
        }

        let digest_len = probe_digest_len(&config)?;
        let engine = Engine::new(&config, digest_len)?;
        let leaves = engine.leaf_layer(&blocks)?;
        let leaf_count = leaves.len();
        let depth = tree_depth(leaf_count);

        let mut accumulator = config
            .mode
            .retains_proofs()
            .then(|| ProofAccumulator::new(leaf_count, depth));
        let mut levels: Option<Vec<Vec<Digest>>> = config.mode.retains_levels().then(Vec::new);

        let mut current = leaves;
        let mut level_no = 0usize;
        while current.len() > 1 {
            if current.len() % 2 == 1 {
                if let Some(last) = current.last().cloned() {
                    current.push(last);
                }
            }
            if let Some(accumulator) = accumulator.as_mut() {
                accumulator.absorb(level_no, &current);
            }
            let next = engine.reduce_level(&current, level_no + 1)?;
            match levels.as_mut() {
                Some(levels) => levels.push(std::mem::replace(&mut current, next)),
                None => current = next,
            }
            level_no += 1;
        }
        drop(engine);

        let root = current
            .first()
            .cloned()
            .ok_or(MerkleError::InvalidTreeState {
                reason: "missing root after reduction",
            })?;
        if let Some(levels) = levels.as_mut() {
            levels.push(current);
        }

        let leaf_index = levels
            .as_ref()
            .and_then(|levels| levels.first())
            .map(|leaves| {
                let mut map = HashMap::with_capacity(leaf_count);
                for (index, digest) in leaves.iter().take(leaf_count).enumerate() {
                    map.entry(digest.as_bytes().to_vec()).or_insert(index);
                }
                map
            });
        let proofs = accumulator.map(ProofAccumulator::into_proofs);

        Ok(Self {
            config,
            blocks,
            root,
            depth,
            leaf_count,
            digest_len,
            proofs,
            levels,
            leaf_index,
        })
    }

    /// Builds a tree under the default configuration: SHA-256, proof
    /// generation mode, serial, unsorted siblings, hashed leaves.
    pub fn with_defaults(blocks: Vec<B>) -> MerkleResult<Self> {
        Self::new(MerkleConfig::default(), blocks)
    }

    /// Root digest of the committed sequence.
    pub fn root(&self) -> &Digest {
        &self.root
    }

    /// The ordered input blocks.
    pub fn blocks(&self) -> &[B] {
        &self.blocks
    }

    /// Number of leaves, equal to the number of input blocks.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Tree depth after odd-padding, equal to every proof's sibling count.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Byte length of every digest in the tree.
    pub fn digest_len(&self) -> usize {
        self.digest_len
    }

    /// Configuration the tree was built with.
    pub fn config(&self) -> &MerkleConfig {
        &self.config
    }

    /// Per-leaf proofs, index-aligned with the input blocks.
    ///
    /// `None` unless the mode materialises proofs during construction.
    pub fn proofs(&self) -> Option<&[Proof]> {
        self.proofs.as_deref()
    }

    /// Extracts the inclusion proof for `block` from the retained levels.
    ///
    /// Requires a mode that keeps the level matrix; the block is located by
    /// its leaf digest.
    pub fn generate_proof<Q>(&self, block: &Q) -> MerkleResult<Proof>
    where
        Q: DataBlock + ?Sized,
    {
        let levels = match &self.levels {
            Some(levels) => levels,
            None => {
                return Err(MerkleError::ModeNotSupported {
                    mode: self.config.mode,
                })
            }
        };
        let leaf = leaf_digest(&self.config, self.digest_len, 0, block)?;
        let index = self
            .leaf_index
            .as_ref()
            .and_then(|map| map.get(leaf.as_bytes()))
            .copied()
            .ok_or(MerkleError::BlockNotFound)?;
        Ok(extract_proof(levels, index, self.depth))
    }

    /// Verifies `proof` for `block` against this tree's root, under this
    /// tree's configuration.
    pub fn verify<Q>(&self, block: &Q, proof: &Proof) -> MerkleResult<bool>
    where
        Q: DataBlock + ?Sized,
    {
        let options = VerifyOptions {
            hasher: Some(self.config.hasher.clone()),
            sort_siblings: self.config.sort_siblings,
            disable_leaf_hashing: self.config.disable_leaf_hashing,
        };
        verify(block, proof, &self.root, &options)
    }
}

/// Number of reduction steps for `leaf_count` leaves under odd-padding.
fn tree_depth(leaf_count: usize) -> usize {
    let mut depth = 0;
    let mut width = leaf_count;
    while width > 1 {
        width = width.div_ceil(2);
        depth += 1;
    }
    depth
}

/// Learns the digest length by probing the hash function once with empty
/// input; every later output must match it.
fn probe_digest_len(config: &MerkleConfig) -> MerkleResult<usize> {
    let digest = config.hasher.hash(&[]).map_err(|err| MerkleError::Hash {
        level: 0,
        position: 0,
        reason: err.into_reason(),
    })?;
    Ok(digest.len())
}

/// Computes the level-0 digest of one block.
pub(super) fn leaf_digest<B>(
    config: &MerkleConfig,
    digest_len: usize,
    index: usize,
    block: &B,
) -> MerkleResult<Digest>
where
    B: DataBlock + ?Sized,
{
    let bytes = block
        .serialize()
        .map_err(|err| MerkleError::BlockSerialize {
            index,
            reason: err.into_reason(),
        })?;
    if config.disable_leaf_hashing {
        if bytes.len() != digest_len {
            return Err(MerkleError::MalformedLeaf {
                index,
                expected: digest_len,
                got: bytes.len(),
            });
        }
        return Ok(Digest::new(bytes));
    }
    let digest = config.hasher.hash(&bytes).map_err(|err| MerkleError::Hash {
        level: 0,
        position: index,
        reason: err.into_reason(),
    })?;
    if digest.len() != digest_len {
        return Err(MerkleError::HashLengthMismatch {
            expected: digest_len,
            got: digest.len(),
        });
    }
    Ok(Digest::new(digest))
}

/// Level-by-level executor over the configured scheduling strategy.
struct Engine<'a> {
    config: &'a MerkleConfig,
    digest_len: usize,
    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
}

impl<'a> Engine<'a> {
    fn new(config: &'a MerkleConfig, digest_len: usize) -> MerkleResult<Self> {
        #[cfg(feature = "parallel")]
        let pool = if config.parallel {
            Some(crate::utils::parallel::build_worker_pool(
                config.num_workers,
            )?)
        } else {
            None
        };
        Ok(Self {
            config,
            digest_len,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    /// Maps the block sequence into the level-0 digest vector.
    fn leaf_layer<B: DataBlock>(&self, blocks: &[B]) -> MerkleResult<Vec<Digest>> {
        #[cfg(feature = "parallel")]
        if let Some(pool) = &self.pool {
            use rayon::prelude::*;
            let chunk = crate::utils::parallel::preferred_chunk_size(blocks.len());
            let results: Vec<MerkleResult<Digest>> = pool.install(|| {
                blocks
                    .par_iter()
                    .enumerate()
                    .with_min_len(chunk)
                    .with_max_len(chunk)
                    .map(|(index, block)| {
                        leaf_digest(self.config, self.digest_len, index, block)
                    })
                    .collect()
            });
            return collect_indexed(results);
        }
        blocks
            .iter()
            .enumerate()
            .map(|(index, block)| leaf_digest(self.config, self.digest_len, index, block))
            .collect()
    }

    /// Reduces one even-length level into the next; `level` names the
    /// produced generation.
    fn reduce_level(&self, current: &[Digest], level: usize) -> MerkleResult<Vec<Digest>> {
        let pairs = current.len() / 2;
        #[cfg(feature = "parallel")]
        if let Some(pool) = &self.pool {
            use rayon::prelude::*;
            let chunk = crate::utils::parallel::preferred_chunk_size(pairs);
            let results: Vec<MerkleResult<Digest>> = pool.install(|| {
                (0..pairs)
                    .into_par_iter()
                    .with_min_len(chunk)
                    .with_max_len(chunk)
                    .map(|k| self.combine(&current[2 * k], &current[2 * k + 1], level, k))
                    .collect()
            });
            return collect_indexed(results);
        }
        (0..pairs)
            .map(|k| self.combine(&current[2 * k], &current[2 * k + 1], level, k))
            .collect()
    }

    /// Hashes one sibling pair, honouring the ordering policy.
    fn combine(
        &self,
        left: &Digest,
        right: &Digest,
        level: usize,
        position: usize,
    ) -> MerkleResult<Digest> {
        let (x, y) = if self.config.sort_siblings && left.as_bytes() > right.as_bytes() {
            (right, left)
        } else {
            (left, right)
        };
        let mut buf = Vec::with_capacity(x.len() + y.len());
        buf.extend_from_slice(x.as_bytes());
        buf.extend_from_slice(y.as_bytes());
        let digest = self.config.hasher.hash(&buf).map_err(|err| MerkleError::Hash {
            level,
            position,
            reason: err.into_reason(),
        })?;
        if digest.len() != self.digest_len {
            return Err(MerkleError::HashLengthMismatch {
                expected: self.digest_len,
                got: digest.len(),
            });
        }
        Ok(Digest::new(digest))
    }
}

/// Folds indexed worker results, surfacing the lowest-index failure so the
/// outcome matches the serial order.
#[cfg(feature = "parallel")]
fn collect_indexed(results: Vec<MerkleResult<Digest>>) -> MerkleResult<Vec<Digest>> {
    let mut digests = Vec::with_capacity(results.len());
    for result in results {
        digests.push(result?);
    }
    Ok(digests)
}

/// Per-leaf proof state threaded through the reduction in proof-generating
/// modes, so intermediate levels never need to be retained.
struct ProofAccumulator {
    indices: Vec<usize>,
    siblings: Vec<Vec<Digest>>,
    bits: Vec<PathBits>,
}

impl ProofAccumulator {
    fn new(leaf_count: usize, depth: usize) -> Self {
        Self {
            indices: (0..leaf_count).collect(),
            siblings: (0..leaf_count).map(|_| Vec::with_capacity(depth)).collect(),
            bits: vec![PathBits::with_depth(depth); leaf_count],
        }
    }

    /// Records, for every tracked leaf, its sibling and placement within
    /// the padded level.
    fn absorb(&mut self, level: usize, padded: &[Digest]) {
        for leaf in 0..self.indices.len() {
            let index = self.indices[leaf];
            self.siblings[leaf].push(padded[index ^ 1].clone());
            if index & 1 == 1 {
                self.bits[leaf].set(level);
            }
            self.indices[leaf] = index >> 1;
        }
    }

    fn into_proofs(self) -> Vec<Proof> {
        self.siblings
            .into_iter()
            .zip(self.bits)
            .map(|(siblings, path_bits)| Proof {
                siblings,
                path_bits,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::tree_depth;

    #[test]
    fn depth_follows_padded_log2() {
        assert_eq!(tree_depth(2), 1);
        assert_eq!(tree_depth(3), 2);
        assert_eq!(tree_depth(4), 2);
        assert_eq!(tree_depth(5), 3);
        assert_eq!(tree_depth(10), 4);
        assert_eq!(tree_depth(1024), 10);
    }
}
