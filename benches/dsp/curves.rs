//! Benchmarks for table generation.
//!
//! One iteration fills a whole table, which is what a parameter change costs.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use waveshaper_dsp::dsp::{curves, LookupTable};
use waveshaper_dsp::{CurveType, Params};

pub fn bench_curves(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/curves");
    let mut table = LookupTable::new();

    for curve in CurveType::ALL {
        let params = Params::new(curve);
        group.bench_with_input(BenchmarkId::new("generate", curve.key()), &params, |b, params| {
            b.iter(|| curves::generate(black_box(params), table.as_mut_slice()))
        });
    }

    // Iterated curves scale with the number of passes
    for repeats in [0, 5] {
        let params = Params::new(CurveType::Leveller).with_repeats(repeats);
        group.bench_with_input(BenchmarkId::new("leveller_repeats", repeats), &params, |b, params| {
            b.iter(|| curves::generate(black_box(params), table.as_mut_slice()))
        });
    }

    group.finish();
}
