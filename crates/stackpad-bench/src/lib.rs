//! Benchmark-only crate; see `benches/alloc_ops.rs`.
