use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use merkle_commit::{verify, MerkleConfig, MerkleTree, TreeMode, VerifyOptions};

const BLOCK_LEN: usize = 64;

fn make_blocks(count: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| (0..BLOCK_LEN).map(|j| ((i * 31 + j * 7) % 251) as u8).collect())
        .collect()
}

fn bench_construct(c: &mut Criterion) {
    let sizes = [1024usize, 8192, 65_536];
    for &size in &sizes {
        let blocks = make_blocks(size);
        let bytes = (size * BLOCK_LEN) as u64;

        let mut group = c.benchmark_group("construct_serial");
        group.throughput(Throughput::Bytes(bytes));
        group.bench_with_input(BenchmarkId::from_parameter(size), &blocks, |b, blocks| {
            b.iter(|| MerkleTree::with_defaults(blocks.clone()).unwrap());
        });
        group.finish();

        #[cfg(feature = "parallel")]
        {
            let mut group = c.benchmark_group("construct_parallel");
            group.throughput(Throughput::Bytes(bytes));
            group.bench_with_input(BenchmarkId::from_parameter(size), &blocks, |b, blocks| {
                b.iter(|| {
                    let config = MerkleConfig {
                        parallel: true,
                        ..MerkleConfig::default()
                    };
                    MerkleTree::new(config, blocks.clone()).unwrap()
                });
            });
            group.finish();
        }
    }
}

fn bench_generate_proof(c: &mut Criterion) {
    let blocks = make_blocks(1 << 12);
    let config = MerkleConfig {
        mode: TreeMode::TreeBuild,
        ..MerkleConfig::default()
    };
    let tree = MerkleTree::new(config, blocks.clone()).unwrap();
    c.bench_function("generate_proof", |b| {
        b.iter(|| tree.generate_proof(&blocks[1717]).unwrap());
    });
}

fn bench_verify(c: &mut Criterion) {
    let blocks = make_blocks(1 << 12);
    let tree = MerkleTree::with_defaults(blocks.clone()).unwrap();
    let proofs = tree.proofs().unwrap();
    c.bench_function("verify_single", |b| {
        b.iter(|| verify(&blocks[17], &proofs[17], tree.root(), &VerifyOptions::default()).unwrap());
    });
}

fn merkle_benches(c: &mut Criterion) {
    bench_construct(c);
    bench_generate_proof(c);
    bench_verify(c);
}

criterion_group!(benches, merkle_benches);
criterion_main!(benches);
