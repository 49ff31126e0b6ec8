//! Benchmarks for interpolated table lookup.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use waveshaper_dsp::dsp::{curves, LookupTable};
use waveshaper_dsp::{CurveType, Params};

use crate::{test_signal, BLOCK_SIZES};

pub fn bench_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/table");

    let mut table = LookupTable::new();
    curves::generate(&Params::new(CurveType::SoftClip), table.as_mut_slice());

    for &size in BLOCK_SIZES {
        let input = test_signal(size);
        let mut buffer = input.clone();

        group.bench_with_input(BenchmarkId::new("lookup_buffer", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                table.lookup_buffer(black_box(&mut buffer));
            })
        });

        // Out-of-range input exercises the clamped edges
        let hot: Vec<f32> = input.iter().map(|s| s * 3.0).collect();
        group.bench_with_input(BenchmarkId::new("lookup_clamped", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&hot);
                table.lookup_buffer(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
