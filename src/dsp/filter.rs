use std::f32::consts::PI;

/*
State-Variable Lowpass
======================

The effects bus runs every voice through one resonant lowpass. We use the
topology-preserving-transform (TPT) state-variable filter: two trapezoidal
integrators in a feedback loop. It stays stable while cutoff and resonance
are swept quickly, which is exactly what a knob or XY pad does to it.

Coefficients
------------

    g = tan(π · cutoff / sample_rate)      integrator gain (pre-warped)
    k = 1 / Q                              damping

Resonance is given in decibels of peak gain at the cutoff, the way browser
biquads expose "Q" on a lowpass:

    Q_linear = 10^(resonance_db / 20)

    resonance_db   Q_linear   character
     0 dB            1.0      flat-ish corner, no peak
    12 dB            4.0      audible "squelch"
    30 dB           31.6      near self-oscillation

Cutoff is clamped to [10 Hz, 0.49 · sample_rate]. Below that the filter
would be silent; above it `tan` runs off to infinity.
*/

const MIN_CUTOFF_HZ: f32 = 10.0;
const MAX_CUTOFF_RATIO: f32 = 0.49;

/// Damping factor `k` for a resonance given in dB.
#[inline]
pub fn resonance_to_damping(resonance_db: f32) -> f32 {
    let q = 10.0_f32.powf(resonance_db.max(0.0) / 20.0);
    1.0 / q
}

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    g: f32,
    k: f32,
}

impl SVFilter {
    pub fn lowpass(cutoff_hz: f32, resonance_db: f32, sample_rate: f32) -> Self {
        let mut filter = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            g: 0.0,
            k: 1.0,
        };
        filter.set_params(cutoff_hz, resonance_db, sample_rate);
        filter
    }

    /// Recompute coefficients. Cheap enough for control rate, not per sample.
    pub fn set_params(&mut self, cutoff_hz: f32, resonance_db: f32, sample_rate: f32) {
        let cutoff = cutoff_hz.clamp(MIN_CUTOFF_HZ, sample_rate * MAX_CUTOFF_RATIO);
        self.g = (PI * cutoff / sample_rate).tan();
        self.k = resonance_to_damping(resonance_db);
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let h = 1.0 / (1.0 + self.g * (self.g + self.k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + self.g * v3);
        let v2 = self.ic2eq + self.g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        v2
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::OscillatorBlock;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len().min(256);
        buffer[skip..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    fn filtered_sine_peak(filter: &mut SVFilter, freq: f32) -> f32 {
        let mut osc = OscillatorBlock::sine();
        let mut buffer = vec![0.0f32; 2048];
        osc.render(&mut buffer, freq, SAMPLE_RATE);
        filter.render(&mut buffer);
        peak_after_transient(&buffer)
    }

    #[test]
    fn passes_dc() {
        let mut filter = SVFilter::lowpass(500.0, 0.0, SAMPLE_RATE);
        let mut buffer = vec![1.0; 4096];
        filter.render(&mut buffer);
        assert!((buffer[4095] - 1.0).abs() < 0.01, "got {}", buffer[4095]);
    }

    #[test]
    fn attenuates_above_cutoff() {
        let mut filter = SVFilter::lowpass(500.0, 0.0, SAMPLE_RATE);
        let peak = filtered_sine_peak(&mut filter, 5_000.0);
        assert!(peak < 0.05, "expected high freq attenuation, got peak: {peak}");
    }

    #[test]
    fn raising_cutoff_opens_filter() {
        let mut filter = SVFilter::lowpass(200.0, 0.0, SAMPLE_RATE);
        let closed = filtered_sine_peak(&mut filter, 1_000.0);

        filter.reset();
        filter.set_params(5_000.0, 0.0, SAMPLE_RATE);
        let open = filtered_sine_peak(&mut filter, 1_000.0);

        assert!(
            open > closed * 2.0,
            "high cutoff should pass more signal: open={open}, closed={closed}"
        );
    }

    #[test]
    fn resonance_boosts_cutoff_frequency() {
        let mut filter = SVFilter::lowpass(1_000.0, 0.0, SAMPLE_RATE);
        let flat = filtered_sine_peak(&mut filter, 1_000.0);

        filter.reset();
        filter.set_params(1_000.0, 12.0, SAMPLE_RATE);
        let resonant = filtered_sine_peak(&mut filter, 1_000.0);

        assert!(
            resonant > flat * 2.0,
            "12 dB resonance should boost the cutoff: flat={flat}, resonant={resonant}"
        );
    }

    #[test]
    fn extreme_settings_stay_finite() {
        // cutoff 0 and 20 kHz both clamp, 30 dB is the top of the knob
        for cutoff in [0.0, 20_000.0] {
            let mut filter = SVFilter::lowpass(cutoff, 30.0, 44_100.0);
            let mut buffer = vec![0.5f32; 8192];
            filter.render(&mut buffer);
            assert!(buffer.iter().all(|s| s.is_finite()));
        }
    }

    #[test]
    fn damping_from_db() {
        assert!((resonance_to_damping(0.0) - 1.0).abs() < 1e-6);
        assert!((resonance_to_damping(20.0) - 0.1).abs() < 1e-6);
    }
}
