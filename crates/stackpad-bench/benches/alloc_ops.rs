//! Criterion micro-benchmarks: stack trampoline vs heap `Vec` for scratch
//! buffers of known and runtime-only sizes, uninitialised and zeroed.

use std::mem::MaybeUninit;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;
use stackpad::{with_bytes, with_bytes_zeroed};

const KNOWN_SIZE: usize = 1024;

/// A size the optimiser cannot see through: drawn once per process.
fn runtime_size() -> usize {
    let mut rng = rand::rng();
    rng.random_range(1024..2048)
}

fn bench_uninit_scratch(c: &mut Criterion) {
    let unknown = runtime_size();
    let mut group = c.benchmark_group("uninit_scratch");

    group.bench_function("stack_known", |b| {
        b.iter(|| {
            with_bytes(black_box(KNOWN_SIZE), |buf| {
                black_box(buf.len());
            });
        })
    });
    group.bench_function("stack_unknown", |b| {
        b.iter(|| {
            with_bytes(black_box(unknown), |buf| {
                black_box(buf.len());
            });
        })
    });
    group.bench_function("heap_known", |b| {
        b.iter(|| {
            black_box(vec![MaybeUninit::<u8>::uninit(); KNOWN_SIZE]);
        })
    });
    group.bench_function("heap_unknown", |b| {
        b.iter(|| {
            black_box(vec![MaybeUninit::<u8>::uninit(); unknown]);
        })
    });
    group.finish();
}

fn bench_zeroed_scratch(c: &mut Criterion) {
    let unknown = runtime_size();
    let mut group = c.benchmark_group("zeroed_scratch");

    group.bench_function("stack_known", |b| {
        b.iter(|| {
            with_bytes_zeroed(black_box(KNOWN_SIZE), |buf| {
                black_box(buf[KNOWN_SIZE / 2]);
            });
        })
    });
    group.bench_function("stack_unknown", |b| {
        b.iter(|| {
            with_bytes_zeroed(black_box(unknown), |buf| {
                black_box(buf[0]);
            });
        })
    });
    group.bench_function("heap_known", |b| {
        b.iter(|| {
            black_box(vec![0u8; KNOWN_SIZE]);
        })
    });
    group.bench_function("heap_unknown", |b| {
        b.iter(|| {
            black_box(vec![0u8; unknown]);
        })
    });
    group.finish();
}

fn bench_nested_use(c: &mut Criterion) {
    c.bench_function("nested_three_levels", |b| {
        b.iter(|| {
            with_bytes(256, |outer| {
                with_bytes(128, |mid| {
                    with_bytes(64, |inner| {
                        black_box((outer.len(), mid.len(), inner.len()));
                    });
                });
            });
        })
    });
}

criterion_group!(
    benches,
    bench_uninit_scratch,
    bench_zeroed_scratch,
    bench_nested_use
);
criterion_main!(benches);
