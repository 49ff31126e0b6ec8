//! Benchmarks for multi-channel realtime processing through the manager.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use waveshaper_dsp::presets;
use waveshaper_dsp::InstanceManager;

use crate::{test_signal, BLOCK_SIZES};

pub fn bench_manager(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/manager");

    let Ok(preset) = presets::by_name("Valve Overdrive") else {
        return;
    };
    let params = preset.params;

    for &size in BLOCK_SIZES {
        let input = test_signal(size);
        let mut output = vec![0.0f32; size];

        // === STEREO ===
        let mut manager = InstanceManager::new();
        manager.realtime_initialize();
        for _ in 0..2 {
            manager.realtime_add_processor(48_000.0, &params).unwrap();
        }

        group.bench_with_input(BenchmarkId::new("stereo", size), &size, |b, _| {
            b.iter(|| {
                for ch in 0..2 {
                    manager
                        .realtime_process(ch, black_box(&params), black_box(&input), &mut output)
                        .unwrap();
                }
            })
        });
    }

    group.finish();
}
