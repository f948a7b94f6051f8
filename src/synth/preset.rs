//! Preset engine: a timbre name plus a frequency becomes an oscillator
//! topology. The engine only describes; the audio context builds.

use crate::{
    dsp::OscillatorWaveform,
    error::{Result, SynthError},
    graph::OscillatorTopology,
};

/// Presets in cycling order.
pub const PRESET_NAMES: [&str; 5] = ["saw", "sine", "square", "triangle", "fm"];

/// Used whenever a requested preset is unknown.
pub const DEFAULT_PRESET: &str = "saw";

pub fn build_topology(preset_name: &str, frequency: f32) -> Result<OscillatorTopology> {
    let waveform = match preset_name {
        "saw" => OscillatorWaveform::Saw,
        "sine" => OscillatorWaveform::Sine,
        "square" => OscillatorWaveform::Square,
        "triangle" => OscillatorWaveform::Triangle,
        "fm" => return Ok(OscillatorTopology::fm(frequency)),
        other => return Err(SynthError::UnknownPreset(other.to_string())),
    };
    Ok(OscillatorTopology::simple(waveform, frequency))
}

/// The topology of the default preset, which cannot fail.
pub fn default_topology(frequency: f32) -> OscillatorTopology {
    OscillatorTopology::simple(OscillatorWaveform::Saw, frequency)
}

pub fn is_known(preset_name: &str) -> bool {
    PRESET_NAMES.contains(&preset_name)
}

/// Next preset in cycling order. Unknown names restart the cycle.
pub fn next_preset(current: &str) -> &'static str {
    match PRESET_NAMES.iter().position(|&name| name == current) {
        Some(i) => PRESET_NAMES[(i + 1) % PRESET_NAMES.len()],
        None => PRESET_NAMES[0],
    }
}
