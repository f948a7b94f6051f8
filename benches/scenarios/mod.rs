//! Real-world scenario benchmarks.
//!
//! Chords are triggered exactly as a key press would, then rendered through
//! the audio context with all effects on.

mod voices;

pub use voices::bench_voices;
