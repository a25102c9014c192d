//! # Ledger Benchmarks
//!
//! Expected costs:
//! - Address derivation: one Keccak-256 over < 128 bytes
//! - Create: three guarded writes (record, then mint + account batch)
//! - Read: one lookup plus decode
//! - List: linear in stored accounts

use crate::fixtures::{alice, draft, ledger, random_identity};
use criterion::{black_box, BatchSize, BenchmarkId, Criterion, Throughput};
use review_ledger::prelude::*;
use std::time::Duration;

pub fn bench_address_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger/derive");
    let deriver = AddressDeriver::default();
    let mut rng = rand::thread_rng();
    let owner = random_identity(&mut rng);

    group.bench_function("review_address", |b| {
        b.iter(|| black_box(deriver.review_address(black_box(&owner), "Just a test movie")))
    });
    group.bench_function("mint_address", |b| {
        b.iter(|| black_box(deriver.mint_address()))
    });
    group.finish();
}

pub fn bench_create_with_reward(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger/create");
    group.measurement_time(Duration::from_secs(10));

    // Fresh owner per iteration: every create opens a reward account.
    group.bench_function("first_review", |b| {
        let ledger = ledger();
        let mut rng = rand::thread_rng();
        b.iter_batched(
            || random_identity(&mut rng),
            |owner| black_box(ledger.create_review(owner, draft("Bench", "first", 5))),
            BatchSize::SmallInput,
        )
    });

    // Same owner: every create credits an existing account.
    group.bench_function("repeat_reviewer", |b| {
        let ledger = ledger();
        let mut n = 0u64;
        b.iter(|| {
            n += 1;
            black_box(ledger.create_review(alice(), draft(&format!("bench-{n}"), "again", 4)))
        })
    });
    group.finish();
}

pub fn bench_read_and_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger/read_update");
    let ledger = ledger();
    let record = ledger
        .create_review(alice(), draft("Hot", "contended", 3))
        .expect("seed review");

    group.bench_function("read", |b| {
        b.iter(|| black_box(ledger.read_review(black_box(record.address))))
    });
    group.bench_function("update", |b| {
        let mut rating = 1u8;
        b.iter(|| {
            rating = rating % 5 + 1;
            black_box(ledger.update_review(
                alice(),
                record.address,
                ReviewPatch::new("rewritten", rating),
            ))
        })
    });
    group.finish();
}

pub fn bench_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger/list");

    for count in [100usize, 1_000] {
        let ledger = ledger();
        for i in 0..count {
            ledger
                .create_review(alice(), draft(&format!("m{i}"), "listed", 3))
                .expect("seed review");
        }
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("all", count), &count, |b, _| {
            b.iter(|| black_box(ledger.list_reviews(None)))
        });
        group.bench_with_input(BenchmarkId::new("lazy_count", count), &count, |b, _| {
            b.iter(|| black_box(ledger.list().map(Iterator::count)))
        });
    }
    group.finish();
}

/// Register all ledger benchmarks.
pub fn register_benchmarks(c: &mut Criterion) {
    bench_address_derivation(c);
    bench_create_with_reward(c);
    bench_read_and_update(c);
    bench_list(c);
}
