//! Sampling and assembly benchmarks using Criterion.
//!
//! Coverage:
//! 1. WeightedSampler drain cost across pool sizes
//! 2. PrefixSumTree construction
//! 3. Full feed assembly over realistic dataset sizes
//!
//! Run: cargo bench --bench sampling

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use feedmix::{Config, FeedAssembler, Post, PrefixSumTree, WeightedSampler};

fn random_weights(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0.1..1.0)).collect()
}

fn random_posts(n: usize, seed: u64) -> Vec<Post> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let last = if rng.gen_bool(0.3) {
                rng.gen_range(0.0..20.0)
            } else {
                -1.0
            };
            Post::new(
                Uuid::new_v4(),
                rng.gen_range(0..100),
                rng.gen_range(0..40),
                rng.gen_range(0.0..720.0),
                last,
            )
        })
        .collect()
}

// ============================================
// Benchmark 1: Weighted sampler drain
// ============================================

fn benchmark_sampler_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("weighted_sampler");

    for n in [64usize, 1024, 8192] {
        let weights = random_weights(n, 7);
        group.bench_with_input(BenchmarkId::new("drain", n), &n, |b, _| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(99);
                let mut sampler = WeightedSampler::from_weights(black_box(&weights));
                sampler.drain(&mut rng).len()
            });
        });
    }

    group.finish();
}

// ============================================
// Benchmark 2: Prefix-sum tree construction
// ============================================

fn benchmark_tree_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("prefix_sum_tree");

    for n in [1024usize, 16384] {
        let weights = random_weights(n, 13);
        group.bench_with_input(BenchmarkId::new("from_weights", n), &n, |b, _| {
            b.iter(|| PrefixSumTree::from_weights(black_box(&weights)).total());
        });
    }

    group.finish();
}

// ============================================
// Benchmark 3: Full feed assembly
// ============================================

fn benchmark_feed_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("feed_assembly");

    for n in [100usize, 1000, 5000] {
        let posts = random_posts(n, 21);
        let assembler = FeedAssembler::new(Config::default());
        group.bench_with_input(BenchmarkId::new("assemble", n), &n, |b, _| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(5);
                assembler.assemble(black_box(&posts), &mut rng).len()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_sampler_drain,
    benchmark_tree_build,
    benchmark_feed_assembly
);
criterion_main!(benches);
