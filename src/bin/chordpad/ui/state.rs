//! Display state copied out of the instrument once per frame
//!
//! Rendering never touches the instrument directly: the lock is held only
//! while the snapshot is taken, so the audio callback is never kept waiting
//! on terminal I/O.

use chordpad::{
    graph::EffectParam,
    io::OutputMode,
    music::{ChordType, Note},
    Instrument,
};

/// Everything the widgets draw
#[derive(Clone, Debug)]
pub struct UiSnapshot {
    /// Status line from the router, or the audio failure message
    pub status: String,
    pub mode: OutputMode,
    pub preset: String,
    pub chord_type: ChordType,
    pub octave: i32,
    /// Notes of the chord currently held down
    pub held: Vec<Note>,
    /// Normalized controller positions, in `EffectParam::ALL` order
    pub controllers: [(EffectParam, f32); 4],
    /// Voices still sounding, held or releasing
    pub voices: usize,
    pub synthesis_enabled: bool,
    /// Audio sample rate in Hz
    pub sample_rate: f32,
}

impl UiSnapshot {
    pub fn capture(instrument: &Instrument) -> Self {
        Self {
            status: instrument.status().to_string(),
            mode: instrument.output_mode(),
            preset: instrument.preset().to_string(),
            chord_type: instrument.chord_type(),
            octave: instrument.octave(),
            held: instrument.held_notes().to_vec(),
            controllers: EffectParam::ALL.map(|param| (param, instrument.controller(param))),
            voices: instrument.voices().live_count() + instrument.voices().releasing_count(),
            synthesis_enabled: instrument.synthesis_enabled(),
            sample_rate: instrument.sample_rate(),
        }
    }

    pub fn controller(&self, param: EffectParam) -> f32 {
        self.controllers
            .iter()
            .find(|(p, _)| *p == param)
            .map(|&(_, value)| value)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordpad::{io::OutputRouter, SynthConfig};

    #[test]
    fn snapshot_reflects_instrument() {
        let config = SynthConfig {
            reverb_seconds: 0.05,
            ..SynthConfig::default()
        };
        let mut inst = Instrument::new(&config, 8_000.0, OutputRouter::internal());
        inst.play_chord(60);
        inst.set_controller(EffectParam::DelayMix, 0.25);

        let snap = UiSnapshot::capture(&inst);
        assert_eq!(snap.held, vec![60, 64, 67]);
        assert_eq!(snap.voices, 3);
        assert_eq!(snap.mode, OutputMode::Internal);
        assert_eq!(snap.controller(EffectParam::DelayMix), 0.25);
    }
}
