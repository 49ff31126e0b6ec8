//! Benchmarks for the rolling-average DC blocker.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use waveshaper_dsp::dsp::DcBlocker;

use crate::{test_signal, BLOCK_SIZES};

pub fn bench_dc_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/dc_block");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = test_signal(size).iter().map(|s| s.abs()).collect();
        let mut buffer = input.clone();

        // Window full: every sample pushes one and evicts one
        let mut dc = DcBlocker::new(48_000.0);
        let mut warmup = vec![0.5; dc.window() + 1];
        dc.render(&mut warmup);

        group.bench_with_input(BenchmarkId::new("render", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                dc.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
