//! FlyClient proof benchmarks.
//!
//! Benchmarks:
//! - Sampling (query count, targets and leaf selection)
//! - Proof construction
//! - Proof verification (single vs parallel batch)
//! - Proof serialization

// Link mimalloc global allocator from the bench library
use flyclient_bench as _;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use flyclient_core::{hash, Weight};
use flyclient_light::{FlyClientConfig, Proof, ProofBuilder, ProofVerifier, Sampler};
use flyclient_mmr::Accumulator;

const CHAIN_SIZES: [u64; 4] = [100, 1_000, 10_000, 100_000];

fn tail() -> Weight {
    Weight::from(100_000u32)
}

fn config() -> FlyClientConfig {
    FlyClientConfig::builder().checkpoint_interval(1_000).build()
}

fn build_chain(size: u64) -> Accumulator {
    let mut acc = Accumulator::in_memory();
    for i in 0..size {
        let difficulty = Weight::from(100_000 + i % 1_000);
        acc.append(hash(&i.to_be_bytes()), difficulty).unwrap();
    }
    acc
}

fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("flyclient/sample");
    let sampler = Sampler::new(config()).unwrap();

    for &size in &CHAIN_SIZES {
        let acc = build_chain(size);
        group.bench_with_input(BenchmarkId::new("leaves", size), &acc, |b, acc| {
            b.iter(|| sampler.sample(black_box(acc), &tail()).unwrap())
        });
    }

    group.finish();
}

fn bench_prove(c: &mut Criterion) {
    let mut group = c.benchmark_group("flyclient/prove");
    let builder = ProofBuilder::new(config()).unwrap();

    for &size in &CHAIN_SIZES {
        let acc = build_chain(size);
        group.bench_with_input(BenchmarkId::new("leaves", size), &acc, |b, acc| {
            b.iter(|| builder.prove(black_box(acc), &tail()).unwrap())
        });
    }

    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("flyclient/verify");
    let builder = ProofBuilder::new(config()).unwrap();
    let verifier = ProofVerifier::new(config()).unwrap();

    for &size in &CHAIN_SIZES {
        let proof = builder.prove(&build_chain(size), &tail()).unwrap();
        group.bench_with_input(BenchmarkId::new("single", size), &proof, |b, proof| {
            b.iter(|| assert!(verifier.verify(black_box(proof), &tail()).unwrap()))
        });
    }

    // Batch of proofs for successive chain heads
    let mut acc = build_chain(1_000);
    let mut proofs = Vec::with_capacity(16);
    for i in 0..16u64 {
        proofs.push(builder.prove(&acc, &tail()).unwrap());
        acc.append(hash(&(1_000_000 + i).to_be_bytes()), tail())
            .unwrap();
    }
    group.throughput(Throughput::Elements(proofs.len() as u64));
    group.bench_with_input(
        BenchmarkId::new("batch", proofs.len()),
        &proofs,
        |b, proofs| {
            b.iter(|| {
                proofs
                    .iter()
                    .all(|p| verifier.verify(black_box(p), &tail()).unwrap())
            })
        },
    );
    group.bench_with_input(
        BenchmarkId::new("batch_parallel", proofs.len()),
        &proofs,
        |b, proofs| b.iter(|| verifier.verify_batch(black_box(proofs), &tail()).unwrap()),
    );

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("flyclient/serialize");
    let builder = ProofBuilder::new(config()).unwrap();
    let proof = builder.prove(&build_chain(10_000), &tail()).unwrap();
    let bytes = proof.to_bytes().unwrap();

    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("encode", |b| b.iter(|| black_box(&proof).to_bytes().unwrap()));
    group.bench_function("decode", |b| {
        b.iter(|| Proof::from_bytes(black_box(&bytes)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_sample, bench_prove, bench_verify, bench_serialize);

criterion_main!(benches);
