//! Benchmarks for SLH-DSA key generation, signing and verification
//!
//! The `f` sets and a reduced SHAKE set are measured; the `s` sets take
//! seconds per signature and are left to manual runs.

use criterion::{BenchmarkId, Criterion, criterion_main};
use cryypt_slhdsa::{HashFamily, ParameterSet, Params, PrivateKey};

fn bench_params() -> Vec<(String, Params)> {
    let mut sets: Vec<(String, Params)> = [ParameterSet::Shake128f, ParameterSet::Sha2_128f]
        .into_iter()
        .map(|set| (set.to_string(), set.params()))
        .collect();
    if let Ok(reduced) = Params::new(HashFamily::Shake, 16, 20, 5, 6, 10) {
        sets.push(("SHAKE-16-reduced".to_string(), reduced));
    }
    sets
}

fn signing_key(params: Params) -> PrivateKey {
    let n = params.n;
    PrivateKey::from_seeds(params, &vec![1u8; n], &vec![2u8; n], &vec![3u8; n])
        .expect("benchmark key generation should succeed")
}

/// Benchmark key generation (top-layer XMSS root computation)
fn benchmark_keygen(c: &mut Criterion) {
    let mut group = c.benchmark_group("slhdsa_keygen");
    group.sample_size(10);

    for (name, params) in bench_params() {
        group.bench_with_input(BenchmarkId::from_parameter(&name), &params, |b, params| {
            b.iter(|| {
                let key = signing_key(*params);
                std::hint::black_box(key);
            });
        });
    }
    group.finish();
}

/// Benchmark deterministic signing of a short message
fn benchmark_sign(c: &mut Criterion) {
    let mut group = c.benchmark_group("slhdsa_sign");
    group.sample_size(10);
    let message = vec![0x5au8; 64];

    for (name, params) in bench_params() {
        let key = signing_key(params);
        group.bench_with_input(BenchmarkId::from_parameter(&name), &message, |b, message| {
            b.iter(|| {
                let sig = key
                    .sign_deterministic(message, b"bench")
                    .expect("signing should succeed");
                std::hint::black_box(sig);
            });
        });
    }
    group.finish();
}

/// Benchmark verification of a valid signature
fn benchmark_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("slhdsa_verify");
    let message = vec![0x5au8; 64];

    for (name, params) in bench_params() {
        let key = signing_key(params);
        let public = key.public_key();
        let sig = key
            .sign_deterministic(&message, b"bench")
            .expect("signing should succeed");
        group.bench_with_input(BenchmarkId::from_parameter(&name), &sig, |b, sig| {
            b.iter(|| {
                let ok = public.verify(&message, b"bench", sig);
                std::hint::black_box(ok);
            });
        });
    }
    group.finish();
}

/// Keygen, sign and verify groups in one run
pub fn benches() {
    let mut criterion = Criterion::default().configure_from_args();
    benchmark_keygen(&mut criterion);
    benchmark_sign(&mut criterion);
    benchmark_verify(&mut criterion);
}

criterion_main!(benches);
