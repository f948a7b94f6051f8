//! Low-level DSP primitives used by the graph layer.
//!
//! Everything here allocates at construction and never again, so the
//! components are safe to run inside the audio callback. They stay focused on
//! the signal math; scheduling and parameter automation live in `graph`.

/// Uniformly partitioned FFT convolution.
pub mod convolution;
/// Circular delay line with feedback.
pub mod delay;
/// Resonant state-variable lowpass.
pub mod filter;
/// Band-limited oscillator waveforms.
pub mod oscillator;
/// Synthetic impulse response and stereo convolution reverb.
pub mod reverb;

pub use oscillator::OscillatorWaveform;
