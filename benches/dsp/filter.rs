//! Benchmarks for the lowpass state-variable filter.

use std::hint::black_box;

use chordpad::dsp::filter::SVFilter;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        // Fixed coefficients
        let mut filter = SVFilter::lowpass(1000.0, 6.0, SAMPLE_RATE);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });

        // Coefficients recomputed every 32 samples, as the effects bus does
        // while a knob is moving
        let mut filter = SVFilter::lowpass(1000.0, 6.0, SAMPLE_RATE);
        let mut buffer = input.clone();
        let mut cutoff = 1000.0f32;
        group.bench_with_input(BenchmarkId::new("lowpass_swept", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                for chunk in buffer.chunks_mut(32) {
                    cutoff = if cutoff > 8000.0 { 1000.0 } else { cutoff * 1.01 };
                    filter.set_params(black_box(cutoff), 6.0, SAMPLE_RATE);
                    filter.render(chunk);
                }
            })
        });
    }

    group.finish();
}
