//! Session configuration.
//!
//! Every timing and level constant the instrument uses lives here, so a session
//! can be tuned from a YAML file without touching code.
//!
//! ```yaml
//! attack_time: 0.02
//! release_time: 0.4
//! default_preset: fm
//! effects:
//!   cutoff: 0.6
//!   reverb_mix: 0.4
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Normalized ([0, 1]) controller positions for the effects bus.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectParams {
    pub cutoff: f32,
    pub resonance: f32,
    pub delay_mix: f32,
    pub reverb_mix: f32,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            cutoff: 1.0,
            resonance: 0.0,
            delay_mix: 0.2,
            reverb_mix: 0.2,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    /// Seconds for the gain ramp 0 → sustain.
    pub attack_time: f64,
    /// Seconds for the gain ramp current → 0.
    pub release_time: f64,
    /// Gain held once the attack ramp completes.
    pub sustain_level: f32,
    /// Extra time oscillators keep running after the release ramp ends.
    pub tail_margin: f64,

    pub reference_freq: f32,
    pub reference_note: i32,

    /// Velocity for note-on messages sent to an external device.
    pub velocity: u8,
    pub default_preset: String,
    pub default_octave: i32,

    pub delay_time: f64,
    pub delay_feedback: f32,
    pub reverb_seconds: f32,
    pub reverb_seed: u64,
    /// Time constant (seconds) for effect parameter smoothing.
    pub smoothing: f64,
    pub master_gain: f32,

    pub effects: EffectParams,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            attack_time: 0.01,
            release_time: 0.2,
            sustain_level: 0.5,
            tail_margin: 0.05,
            reference_freq: 440.0,
            reference_note: 69,
            velocity: 100,
            default_preset: "saw".to_string(),
            default_octave: 4,
            delay_time: 0.3,
            delay_feedback: 0.5,
            reverb_seconds: 2.0,
            reverb_seed: 0x5eed,
            smoothing: 0.01,
            master_gain: 0.4,
            effects: EffectParams::default(),
        }
    }
}

#[cfg(feature = "serde")]
impl SynthConfig {
    /// Parse a YAML document. Missing keys keep their defaults.
    pub fn from_yaml_str(source: &str) -> crate::error::Result<Self> {
        serde_yml::from_str(source)
            .map_err(|e| crate::error::SynthError::InvalidConfig(e.to_string()))
    }
}
