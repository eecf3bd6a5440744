//! Worker-pool plumbing for per-level map operations.

#[cfg(feature = "parallel")]
use crate::merkle::MerkleError;

const DEFAULT_CHUNK_SIZE: usize = 64;

/// Contiguous range size handed to a worker per dispatch.
///
/// Granularity is at least one pair; small levels collapse to a single task.
pub fn preferred_chunk_size(total_items: usize) -> usize {
    if total_items == 0 {
        1
    } else {
        DEFAULT_CHUNK_SIZE.min(total_items.max(1))
    }
}

/// Builds the bounded pool executing per-level maps.
///
/// `num_workers == 0` defers the sizing to the runtime default, the number
/// of available CPUs.
#[cfg(feature = "parallel")]
pub(crate) fn build_worker_pool(num_workers: usize) -> Result<rayon::ThreadPool, MerkleError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_workers)
        .build()
        .map_err(|_| MerkleError::InvalidConfig {
            reason: "failed to build worker pool",
        })
}

#[cfg(test)]
mod tests {
    use super::preferred_chunk_size;

    #[test]
    fn chunk_size_is_bounded() {
        assert_eq!(preferred_chunk_size(0), 1);
        assert_eq!(preferred_chunk_size(7), 7);
        assert_eq!(preferred_chunk_size(10_000), 64);
    }
}
