//! Benchmarks for the waveshaping engine.
//!
//! Run with: cargo bench
//!
//! Table generation runs at control rate (once per SKIP_SAMPLES while a
//! parameter moves), lookups and DC blocking run per sample. Both have to fit
//! comfortably inside a realtime block.
//!
//! Reference timing at 48kHz sample rate:
//!   - 64 samples  = 1.33ms deadline
//!   - 128 samples = 2.67ms deadline
//!   - 256 samples = 5.33ms deadline
//!   - 512 samples = 10.67ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Curve generation, table lookup, DC blocking
//!   - scenarios/*  Instances with moving parameters and multi-channel managers

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

/// Sine-like test signal spanning most of the table.
pub fn test_signal(size: usize) -> Vec<f32> {
    (0..size).map(|i| (i as f32 * 0.1).sin() * 0.9).collect()
}

criterion_group!(
    benches,
    // Low-level DSP primitives
    dsp::bench_curves,
    dsp::bench_table,
    dsp::bench_dc_block,
    // Real-world scenarios
    scenarios::bench_instance,
    scenarios::bench_manager,
);
criterion_main!(benches);
