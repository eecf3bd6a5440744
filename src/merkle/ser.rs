//! Canonical byte codec for inclusion proofs.

use super::types::{Digest, MerkleError, PathBits, Proof};

/// Serialises a [`Proof`] into the canonical wire layout.
///
/// Layout, little-endian throughout: `u32` sibling count, `u16` digest
/// size, the raw sibling digests leaf-to-root, then `ceil(count / 8)`
/// path-bit bytes. Depth is implied by the sibling count.
pub fn encode_proof(proof: &Proof) -> Result<Vec<u8>, MerkleError> {
    let count = proof.siblings.len();
    if count > u32::MAX as usize {
        return Err(MerkleError::ProofMalformed {
            reason: "sibling count exceeds wire limit",
        });
    }
    let digest_size = proof.siblings.first().map(Digest::len).unwrap_or(0);
    if digest_size > u16::MAX as usize {
        return Err(MerkleError::ProofMalformed {
            reason: "digest size exceeds wire limit",
        });
    }

    let mut out = Vec::new();
    out.extend_from_slice(&(count as u32).to_le_bytes());
    out.extend_from_slice(&(digest_size as u16).to_le_bytes());
    for sibling in &proof.siblings {
        if sibling.len() != digest_size {
            return Err(MerkleError::ProofMalformed {
                reason: "non-uniform sibling lengths",
            });
        }
        out.extend_from_slice(sibling.as_bytes());
    }
    let path = proof.path_bits.as_bytes();
    for i in 0..count.div_ceil(8) {
        out.push(path.get(i).copied().unwrap_or(0));
    }
    Ok(out)
}

/// Deserialises a [`Proof`] from its canonical byte representation.
pub fn decode_proof(bytes: &[u8]) -> Result<Proof, MerkleError> {
    let mut cursor = 0usize;
    let mut take = |len: usize| -> Result<&[u8], MerkleError> {
        if cursor + len > bytes.len() {
            return Err(MerkleError::ProofMalformed {
                reason: "truncated proof bytes",
            });
        }
        let slice = &bytes[cursor..cursor + len];
        cursor += len;
        Ok(slice)
    };

    let mut count_bytes = [0u8; 4];
    count_bytes.copy_from_slice(take(4)?);
    let count = u32::from_le_bytes(count_bytes) as usize;
    let mut size_bytes = [0u8; 2];
    size_bytes.copy_from_slice(take(2)?);
    let digest_size = u16::from_le_bytes(size_bytes) as usize;

    let mut siblings = Vec::new();
    for _ in 0..count {
        let raw = take(digest_size)?;
        siblings.push(Digest::new(raw.to_vec()));
    }
    let path_bits = PathBits::from_bytes(take(count.div_ceil(8))?.to_vec());

    drop(take);
    if cursor != bytes.len() {
        return Err(MerkleError::ProofMalformed {
            reason: "trailing proof bytes",
        });
    }

    Ok(Proof {
        siblings,
        path_bits,
    })
}

#[cfg(test)]
mod tests {
    use super::{decode_proof, encode_proof};
    use crate::merkle::types::{Digest, MerkleError, PathBits, Proof};

    fn sample_proof() -> Proof {
        let mut path_bits = PathBits::with_depth(3);
        path_bits.set(1);
        Proof {
            siblings: vec![
                Digest::new(vec![0x11; 32]),
                Digest::new(vec![0x22; 32]),
                Digest::new(vec![0x33; 32]),
            ],
            path_bits,
        }
    }

    #[test]
    fn wire_round_trip() {
        let proof = sample_proof();
        let encoded = encode_proof(&proof).unwrap();
        assert_eq!(encoded.len(), 4 + 2 + 3 * 32 + 1);
        let decoded = decode_proof(&encoded).unwrap();
        assert_eq!(proof, decoded);
    }

    #[test]
    fn truncated_input_rejected() {
        let encoded = encode_proof(&sample_proof()).unwrap();
        for len in 0..encoded.len() {
            let err = decode_proof(&encoded[..len]).unwrap_err();
            assert!(matches!(err, MerkleError::ProofMalformed { .. }));
        }
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut encoded = encode_proof(&sample_proof()).unwrap();
        encoded.push(0);
        let err = decode_proof(&encoded).unwrap_err();
        assert!(matches!(err, MerkleError::ProofMalformed { .. }));
    }

    #[test]
    fn mixed_sibling_lengths_rejected() {
        let mut proof = sample_proof();
        proof.siblings[1] = Digest::new(vec![0x22; 16]);
        let err = encode_proof(&proof).unwrap_err();
        assert!(matches!(err, MerkleError::ProofMalformed { .. }));
    }
}
