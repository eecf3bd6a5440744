//! Binary Merkle commitment layer.
//!
//! The module fixes the following commitment knobs:
//!
//! * **Odd padding:** a level of odd length duplicates its last digest so
//!   the rightmost node pairs with itself. The self-pair hashes identically
//!   regardless of operand order, a second-preimage caveat callers of the
//!   sorted-sibling convention should weigh.
//! * **Sibling ordering:** pairs hash in positional order unless
//!   `sort_siblings` is set, in which case both construction and
//!   verification order each pair lexicographically before concatenation.
//! * **Path bits:** bit `i` of a proof records whether the sibling at
//!   level `i` is the left operand. Under sorted siblings verification
//!   ignores the bits but they remain deterministic.
//! * **Hash backend:** injected through
//!   [`MerkleConfig`](crate::config::MerkleConfig); SHA-256 by default.
//!
//! The public API re-exports the most relevant types for convenience.

mod proof;
mod ser;
mod tree;
mod types;

pub use proof::{verify, VerifyOptions};
pub use ser::{decode_proof, encode_proof};
pub use tree::MerkleTree;
pub use types::{Digest, MerkleError, PathBits, Proof};
