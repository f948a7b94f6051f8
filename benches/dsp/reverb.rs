//! Benchmarks for convolution reverb processing.

use std::hint::black_box;

use chordpad::dsp::{convolution::Convolver, reverb::ConvolutionReverb};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");

    let sample_rate = 48_000.0;

    for &size in BLOCK_SIZES {
        // Generate a test signal (impulse-like with some content)
        let input: Vec<f32> = (0..size)
            .map(|i| {
                if i < 10 {
                    1.0 - (i as f32 / 10.0) // Initial impulse
                } else {
                    (i as f32 * 0.05).sin() * 0.1 // Quiet tail
                }
            })
            .collect();

        // Short room, single channel
        let ir: Vec<f32> = (0..4_800).map(|i| (-(i as f32) / 800.0).exp()).collect();
        let mut convolver = Convolver::new(&ir, 256);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("mono_100ms", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                convolver.render(black_box(&mut buffer));
            })
        });

        // The instrument's default: stereo, two seconds of decay
        let mut reverb = ConvolutionReverb::new(sample_rate, 2.0, 7);
        group.bench_with_input(BenchmarkId::new("stereo_2s", size), &size, |b, _| {
            b.iter(|| {
                let mut acc = 0.0f32;
                for &x in &input {
                    let (l, r) = reverb.process(black_box(x));
                    acc += l + r;
                }
                black_box(acc)
            })
        });
    }

    group.finish();
}
