//! Benchmarks for complete chords.
//!
//! Voices are created through the voice manager so each benchmark pays for
//! envelope automation, per-voice gain, and the effects bus.

use std::hint::black_box;

use chordpad::{
    graph::AudioContext,
    music::{self, ChordType},
    synth::VoiceManager,
    SynthConfig,
};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

fn chord_context(config: &SynthConfig, preset: &str, chord: ChordType) -> AudioContext {
    let mut context = AudioContext::new(SAMPLE_RATE, config);
    let mut voices = VoiceManager::from_config(config);
    for note in music::resolve(60, chord, 0) {
        voices.trigger(&mut context, note, preset);
    }
    context
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let config = SynthConfig::default();

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        // Effects bus alone, no voices
        let mut idle = AudioContext::new(SAMPLE_RATE, &config);
        group.bench_with_input(BenchmarkId::new("idle_bus", size), &size, |b, _| {
            b.iter(|| {
                idle.render_block(black_box(&mut left), black_box(&mut right));
            })
        });

        // Three saw voices: the default sound
        let mut saw = chord_context(&config, "saw", ChordType::Major);
        group.bench_with_input(BenchmarkId::new("saw_triad", size), &size, |b, _| {
            b.iter(|| {
                saw.render_block(black_box(&mut left), black_box(&mut right));
            })
        });

        // FM: two oscillators per voice
        let mut fm = chord_context(&config, "fm", ChordType::Minor);
        group.bench_with_input(BenchmarkId::new("fm_triad", size), &size, |b, _| {
            b.iter(|| {
                fm.render_block(black_box(&mut left), black_box(&mut right));
            })
        });
    }

    group.finish();
}
