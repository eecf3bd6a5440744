#![cfg(feature = "parallel")]

use merkle_commit::{BlockError, DataBlock, MerkleConfig, MerkleError, MerkleTree, TreeMode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_blocks(count: usize, len: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| (0..len).map(|_| rng.gen()).collect())
        .collect()
}

#[derive(Clone, Debug)]
struct FlakyBlock {
    bytes: Vec<u8>,
    fail: bool,
}

impl DataBlock for FlakyBlock {
    fn serialize(&self) -> Result<Vec<u8>, BlockError> {
        if self.fail {
            Err(BlockError::new("refused"))
        } else {
            Ok(self.bytes.clone())
        }
    }
}

#[test]
fn parallel_matches_serial_at_every_worker_count() {
    let blocks = random_blocks(257, 64, 11);
    let baseline = MerkleTree::new(
        MerkleConfig {
            mode: TreeMode::ProofAndTreeBuild,
            ..MerkleConfig::default()
        },
        blocks.clone(),
    )
    .unwrap();

    for workers in [1usize, 2, 3, 8] {
        let config = MerkleConfig {
            mode: TreeMode::ProofAndTreeBuild,
            parallel: true,
            num_workers: workers,
            ..MerkleConfig::default()
        };
        let tree = MerkleTree::new(config, blocks.clone()).unwrap();
        assert_eq!(baseline.root(), tree.root());
        assert_eq!(baseline.proofs().unwrap(), tree.proofs().unwrap());
        assert_eq!(baseline.depth(), tree.depth());
    }
}

#[test]
fn thousand_block_equivalence() {
    let blocks = random_blocks(1000, 100, 23);
    let serial = MerkleTree::with_defaults(blocks.clone()).unwrap();
    let config = MerkleConfig {
        parallel: true,
        num_workers: 8,
        ..MerkleConfig::default()
    };
    let parallel = MerkleTree::new(config, blocks).unwrap();
    assert_eq!(serial.root(), parallel.root());
    assert_eq!(serial.proofs().unwrap(), parallel.proofs().unwrap());
}

#[test]
fn zero_workers_defaults_to_available_cpus() {
    let blocks = random_blocks(64, 32, 5);
    let config = MerkleConfig {
        parallel: true,
        num_workers: 0,
        ..MerkleConfig::default()
    };
    let tree = MerkleTree::new(config, blocks.clone()).unwrap();
    let serial = MerkleTree::with_defaults(blocks).unwrap();
    assert_eq!(serial.root(), tree.root());
}

#[test]
fn parallel_error_selection_is_lowest_index() {
    let blocks: Vec<FlakyBlock> = (0..32)
        .map(|i| FlakyBlock {
            bytes: vec![i as u8; 16],
            fail: i == 9 || i == 3,
        })
        .collect();
    let config = MerkleConfig {
        parallel: true,
        num_workers: 4,
        ..MerkleConfig::default()
    };
    let err = MerkleTree::new(config, blocks).unwrap_err();
    assert!(matches!(err, MerkleError::BlockSerialize { index: 3, .. }));
}

#[test]
fn sorted_siblings_survive_parallel_construction() {
    let blocks = random_blocks(100, 48, 31);
    let sorted = |parallel: bool| {
        let config = MerkleConfig {
            sort_siblings: true,
            parallel,
            num_workers: 4,
            ..MerkleConfig::default()
        };
        MerkleTree::new(config, blocks.clone()).unwrap()
    };
    assert_eq!(sorted(false).root(), sorted(true).root());
}
