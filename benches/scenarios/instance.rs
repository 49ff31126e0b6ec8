//! Benchmarks for a single processing instance.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use waveshaper_dsp::{CurveType, Params, ProcessingInstance};

use crate::{test_signal, BLOCK_SIZES};

pub fn bench_instance(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/instance");

    for &size in BLOCK_SIZES {
        let input = test_signal(size);
        let mut output = vec![0.0f32; size];

        // === STEADY STATE ===
        // Table already matches the parameters: lookup + output stage only
        let params = Params::new(CurveType::SoftClip);
        let mut steady = ProcessingInstance::new(48_000.0, &params).unwrap();
        group.bench_with_input(BenchmarkId::new("steady", size), &size, |b, _| {
            b.iter(|| steady.process_block(black_box(&params), black_box(&input), &mut output))
        });

        // === DC BLOCKED RECTIFIER ===
        let params = Params::new(CurveType::Rectifier)
            .with_param1(100.0)
            .with_dc_block(true);
        let mut rectifier = ProcessingInstance::new(48_000.0, &params).unwrap();
        group.bench_with_input(BenchmarkId::new("rectifier_dc", size), &size, |b, _| {
            b.iter(|| rectifier.process_block(black_box(&params), black_box(&input), &mut output))
        });

        // === MOVING KNOB ===
        // param1 changes every block, so a rebuild lands every SKIP_SAMPLES
        let base = Params::new(CurveType::Leveller).with_repeats(3);
        let mut moving = ProcessingInstance::new(48_000.0, &base).unwrap();
        let mut step = 0u32;
        group.bench_with_input(BenchmarkId::new("moving_knob", size), &size, |b, _| {
            b.iter(|| {
                step = (step + 1) % 100;
                let params = base.with_param1(step as f64);
                moving.process_block(black_box(&params), black_box(&input), &mut output)
            })
        });
    }

    group.finish();
}
