use crate::{config::SynthConfig, graph::AudioParam};

/*
Attack / Release Envelope
=========================

Voices have no decay stage: they ramp up to a fixed sustain level, hold, and
ramp back down when released. Both ramps are written into the voice's gain
automation on the audio clock rather than computed sample by sample here.

    gain
    sustain ┤      ┌──────────────────┐
            │     ╱                    ╲
            │    ╱                      ╲
          0 ┼───┘                        └──·······  (oscillator stops after tail)
            └───┬──┬──────────────────┬───┬──┬──────▶ t
              start attack_end      release   stop_at
                                         ramp end

Attack: set 0 at now, linear ramp to sustain at now + attack_time.

Release: the ramp must start from whatever the gain is RIGHT NOW. If the key
comes up halfway through the attack, the gain is somewhere below sustain, and
ramping "from sustain" would produce an audible jump. So:

    1. snapshot  = gain(now)
    2. cancel everything scheduled at or after now
    3. set snapshot at now
    4. linear ramp to 0 at now + release_time

The oscillators keep running for a short tail_margin after the ramp lands on
zero, so the stop itself never cuts a non-zero sample.
*/

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeGenerator {
    pub attack_time: f64,
    pub release_time: f64,
    pub sustain_level: f32,
    pub tail_margin: f64,
}

impl EnvelopeGenerator {
    pub fn new(attack_time: f64, release_time: f64, sustain_level: f32, tail_margin: f64) -> Self {
        Self {
            attack_time: attack_time.max(0.0),
            release_time: release_time.max(0.0),
            sustain_level,
            tail_margin: tail_margin.max(0.0),
        }
    }

    pub fn from_config(config: &SynthConfig) -> Self {
        Self::new(
            config.attack_time,
            config.release_time,
            config.sustain_level,
            config.tail_margin,
        )
    }

    /// Schedule the attack ramp. Returns when the voice reaches sustain.
    pub fn apply_attack(&self, gain: &mut AudioParam, now: f64) -> f64 {
        let attack_end = now + self.attack_time;
        gain.cancel_scheduled_values(now);
        gain.set_value_at_time(0.0, now);
        gain.linear_ramp_to_value_at_time(self.sustain_level, attack_end);
        attack_end
    }

    /// Schedule the release ramp from the current value. Returns the time at
    /// which the oscillators should stop.
    pub fn apply_release(&self, gain: &mut AudioParam, now: f64) -> f64 {
        let snapshot = gain.value_at(now);
        gain.cancel_scheduled_values(now);
        gain.set_value_at_time(snapshot, now);
        gain.linear_ramp_to_value_at_time(0.0, now + self.release_time);
        self.stop_time(now)
    }

    pub fn stop_time(&self, release_at: f64) -> f64 {
        release_at + self.release_time + self.tail_margin
    }
}

impl Default for EnvelopeGenerator {
    fn default() -> Self {
        Self::from_config(&SynthConfig::default())
    }
}
