//! Reverb - Room Simulation via Convolution
//!
//! A room's reverb is fully described by its impulse response: what comes back
//! when you fire one click into it. Convolving dry audio with that response
//! places the audio in the room.
//!
//! # Synthetic Impulse Response
//!
//! We have no recorded room, so we invent one. Exponentially-shaped noise
//! is a good stand-in for a diffuse hall tail:
//!
//! ```text
//! ir[j] = noise[j] · (1 - j / length)^2.5        noise ∈ [-1, 1]
//!
//! amplitude
//!   1 ┤▇▆▅
//!     │   ▅▄▃
//!     │      ▃▂▂▁
//!   0 ┤          ▁▁▁▁▁▁▁▁____
//!     └──────────────────────▶ j
//! ```
//!
//! Left and right get independent noise so the tail is decorrelated and
//! sounds wide. The generator is seeded, so the same seed always builds the
//! same room.
//!
//! # Normalization
//!
//! Raw noise tails are loud: their energy grows with their length. Both
//! channels are scaled together so the tail sits at a fixed level regardless
//! of length or sample rate:
//!
//! ```text
//! power = sqrt(Σ ir² / (channels · length))
//! scale = (1 / power) · 10^(-58/20) · (44100 / sample_rate)
//! ```
//!
//! # Parameters
//!
//! - **Seconds**: Length of the tail (`length = sample_rate · seconds`)
//! - **Seed**: Which random room to build

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::convolution::Convolver;

/// Partition size for the reverb convolvers.
pub const REVERB_BLOCK: usize = 256;

const DECAY_EXPONENT: f32 = 2.5;
const GAIN_CALIBRATION_DB: f32 = -58.0;
const GAIN_CALIBRATION_SAMPLE_RATE: f32 = 44_100.0;
const MIN_POWER: f32 = 0.000_125;

/// Decaying noise burst of `sample_rate · seconds` samples.
pub fn synth_impulse_response<R: Rng + ?Sized>(
    rng: &mut R,
    sample_rate: f32,
    seconds: f32,
) -> Vec<f32> {
    let length = (sample_rate * seconds.max(0.0)) as usize;
    (0..length)
        .map(|j| {
            let envelope = (1.0 - j as f32 / length as f32).powf(DECAY_EXPONENT);
            rng.gen_range(-1.0f32..=1.0) * envelope
        })
        .collect()
}

/// Scale that brings a set of impulse responses to the calibrated level.
pub fn normalization_scale(channels: &[&[f32]], sample_rate: f32) -> f32 {
    let samples: usize = channels.iter().map(|ch| ch.len()).sum();
    if samples == 0 {
        return 1.0;
    }
    let energy: f32 = channels.iter().flat_map(|ch| ch.iter()).map(|s| s * s).sum();
    let power = (energy / samples as f32).sqrt().max(MIN_POWER);

    (1.0 / power)
        * 10f32.powf(GAIN_CALIBRATION_DB / 20.0)
        * (GAIN_CALIBRATION_SAMPLE_RATE / sample_rate)
}

/// Stereo reverb: one mono input, two decorrelated convolution tails.
pub struct ConvolutionReverb {
    left: Convolver,
    right: Convolver,
}

impl ConvolutionReverb {
    pub fn new(sample_rate: f32, seconds: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut left_ir = synth_impulse_response(&mut rng, sample_rate, seconds);
        let mut right_ir = synth_impulse_response(&mut rng, sample_rate, seconds);

        let scale = normalization_scale(&[left_ir.as_slice(), right_ir.as_slice()], sample_rate);
        for s in left_ir.iter_mut().chain(right_ir.iter_mut()) {
            *s *= scale;
        }

        Self {
            left: Convolver::new(&left_ir, REVERB_BLOCK),
            right: Convolver::new(&right_ir, REVERB_BLOCK),
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> (f32, f32) {
        (self.left.process(input), self.right.process(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_response_decays_to_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        let ir = synth_impulse_response(&mut rng, 1_000.0, 2.0);
        assert_eq!(ir.len(), 2_000);
        assert!(ir.iter().all(|s| (-1.0..=1.0).contains(s)));

        let head: f32 = ir[..200].iter().map(|s| s.abs()).sum();
        let tail: f32 = ir[1_800..].iter().map(|s| s.abs()).sum();
        assert!(tail < head * 0.01, "tail should be far quieter: head={head}, tail={tail}");
    }

    #[test]
    fn same_seed_same_room() {
        let a = synth_impulse_response(&mut StdRng::seed_from_u64(42), 8_000.0, 0.1);
        let b = synth_impulse_response(&mut StdRng::seed_from_u64(42), 8_000.0, 0.1);
        let c = synth_impulse_response(&mut StdRng::seed_from_u64(43), 8_000.0, 0.1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn normalized_level_is_independent_of_length() {
        let mut rng = StdRng::seed_from_u64(1);
        let short = synth_impulse_response(&mut rng, 8_000.0, 0.5);
        let long = synth_impulse_response(&mut rng, 8_000.0, 2.0);

        let rms = |ir: &[f32], scale: f32| {
            (ir.iter().map(|s| (s * scale).powi(2)).sum::<f32>() / ir.len() as f32).sqrt()
        };
        let a = rms(&short, normalization_scale(&[short.as_slice()], 8_000.0));
        let b = rms(&long, normalization_scale(&[long.as_slice()], 8_000.0));
        assert!((a - b).abs() < 1e-4);
        assert_eq!(normalization_scale(&[], 8_000.0), 1.0);
    }

    #[test]
    fn reverb_produces_decorrelated_tail() {
        let mut reverb = ConvolutionReverb::new(8_000.0, 0.25, 0x5eed);

        let mut left = Vec::new();
        let mut right = Vec::new();
        for n in 0..4_000 {
            let input = if n == 0 { 1.0 } else { 0.0 };
            let (l, r) = reverb.process(input);
            assert!(l.is_finite() && r.is_finite());
            left.push(l);
            right.push(r);
        }

        let energy: f32 = left.iter().map(|s| s * s).sum();
        assert!(energy > 0.0, "reverb should produce a tail after an impulse");
        assert_ne!(left, right, "channels should use different noise");
    }
}
