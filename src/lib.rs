#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

//! Binary Merkle tree commitments over opaque data blocks.
//!
//! The crate builds a binary Merkle tree from an ordered sequence of
//! [`DataBlock`]s, producing a root digest and per-block inclusion proofs.
//! The hash function is injected through [`MerkleConfig`] (SHA-256 by
//! default), construction optionally fans out level-by-level work across a
//! bounded worker pool, and the sorted-sibling concatenation convention is
//! supported for interoperability. Three operating modes trade memory for
//! reusable intermediate state: proofs materialised during construction,
//! the full level matrix for on-demand proofs, or both.
//!
//! ```
//! use merkle_commit::MerkleTree;
//!
//! let blocks: Vec<Vec<u8>> = vec![b"alpha".to_vec(), b"beta".to_vec(), b"gamma".to_vec()];
//! let tree = MerkleTree::with_defaults(blocks.clone())?;
//! let proof = &tree.proofs().expect("default mode materialises proofs")[1];
//! assert!(tree.verify(&blocks[1], proof)?);
//! # Ok::<(), merkle_commit::MerkleError>(())
//! ```
//!
//! Verification is also available without a tree object through the
//! package-level [`verify`] function.

pub mod block;
pub mod config;
pub mod hash;
pub mod merkle;
pub mod utils;

pub use block::{BlockError, DataBlock};
pub use config::{MerkleConfig, TreeMode};
pub use hash::{Blake2sHasher, HashError, NodeHasher, Sha256Hasher};
pub use merkle::{
    decode_proof, encode_proof, verify, Digest, MerkleError, MerkleTree, PathBits, Proof,
    VerifyOptions,
};

/// Result type used throughout the library to surface deterministic errors.
pub type MerkleResult<T> = core::result::Result<T, MerkleError>;
