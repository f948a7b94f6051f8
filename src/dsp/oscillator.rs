use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Phase-Accumulator Oscillator
============================

Every periodic waveform here is a function of a single number, the phase,
which walks from 0.0 to 1.0 once per cycle:

    phase[n+1] = frac(phase[n] + frequency / sample_rate)

The waveform is then a lookup on phase:

    sine      sin(2π·phase)
    saw       2·phase - 1                      (ramp up, snap down)
    square    +1 for phase < 0.5, -1 after
    triangle  1 - 4·|phase - 0.5|

Aliasing and PolyBLEP
---------------------

Saw and square jump instantaneously. A jump contains energy at every
frequency, and whatever lies above Nyquist folds back down as inharmonic
"aliasing" hiss. PolyBLEP (polynomial band-limited step) subtracts a small
two-sample polynomial correction at each discontinuity, which removes most of
the audible aliasing for the cost of a couple of multiplies.

The increment may be negative. Frequency modulation can push the carrier's
instantaneous frequency below zero, which simply runs the phase backwards.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorWaveform {
    Sine,
    Saw,
    Square,
    Triangle,
}

pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    phase: f32,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine)
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorWaveform::Saw)
    }

    pub fn square() -> Self {
        Self::new(OscillatorWaveform::Square)
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorWaveform::Triangle)
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    /// Output the current phase's value, then advance by one sample.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let dt = frequency / sample_rate;
        let phase = self.phase;

        let value = match self.waveform {
            OscillatorWaveform::Sine => (TAU * phase).sin(),
            OscillatorWaveform::Saw => 2.0 * phase - 1.0 - poly_blep(phase, dt.abs()),
            OscillatorWaveform::Square => {
                let naive = if phase < 0.5 { 1.0 } else { -1.0 };
                naive + poly_blep(phase, dt.abs()) - poly_blep((phase + 0.5).fract(), dt.abs())
            }
            OscillatorWaveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        };

        self.phase = (phase + dt).rem_euclid(1.0);
        value
    }

    /// Fill `out` at a constant frequency.
    pub fn render(&mut self, out: &mut [f32], frequency: f32, sample_rate: f32) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(frequency, sample_rate);
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[inline]
fn poly_blep(t: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    if t < dt {
        let t = t / dt;
        2.0 * t - t * t - 1.0
    } else if t > 1.0 - dt {
        let t = (t - 1.0) / dt;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}
