//! Session façade: the only thing a front end talks to.
//!
//! An `Instrument` holds the audio context, the voices, the output route, and
//! the musical selection (chord type, octave, preset). UI gestures map
//! one-to-one onto its methods; the audio callback only calls `render`.

use tracing::{debug, info, warn};

use crate::{
    config::SynthConfig,
    controls::{ControllerBank, XyPad},
    error::{Result, SynthError},
    graph::{AudioBackend, AudioContext, EffectParam},
    io::{NoteOutput, OutputMode, OutputRouter},
    music::{self, ChordType, Note},
    synth::{preset, VoiceManager},
};

pub const MIN_OCTAVE: i32 = 0;
pub const MAX_OCTAVE: i32 = 8;
/// The octave at which chords sound untransposed.
pub const REFERENCE_OCTAVE: i32 = 4;

pub struct Instrument {
    context: AudioContext,
    voices: VoiceManager,
    router: OutputRouter,
    controllers: ControllerBank,
    pad: XyPad,

    chord_type: ChordType,
    octave: i32,
    preset: String,
    held: Vec<Note>,

    synthesis_enabled: bool,
    status_override: Option<String>,
}

impl Instrument {
    pub fn new(config: &SynthConfig, sample_rate: f32, router: OutputRouter) -> Self {
        if !preset::is_known(&config.default_preset) {
            warn!(preset = %config.default_preset, "unknown default preset, notes will use saw");
        }

        Self {
            context: AudioContext::new(sample_rate, config),
            voices: VoiceManager::from_config(config),
            router,
            controllers: ControllerBank::new(config.effects),
            pad: XyPad::filter(),
            chord_type: ChordType::Major,
            octave: config.default_octave.clamp(MIN_OCTAVE, MAX_OCTAVE),
            preset: config.default_preset.clone(),
            held: Vec::new(),
            synthesis_enabled: true,
            status_override: None,
        }
    }

    /// Audio output could not be opened. Keep accepting gestures, but stop
    /// creating voices nobody will ever render.
    pub fn disable_synthesis(&mut self, err: &SynthError) {
        warn!(%err, "internal synthesis disabled");
        self.voices.dispose_all(&mut self.context);
        self.synthesis_enabled = false;
        self.status_override = Some(format!("Audio unavailable: {err}"));
    }

    /// Play the chord on `root` with the current type and octave. Any chord
    /// still held is stopped first.
    pub fn play_chord(&mut self, root: Note) -> Vec<Note> {
        self.stop_chord();

        let notes = music::resolve(root, self.chord_type, self.octave - REFERENCE_OCTAVE);
        debug!(root, chord = %self.chord_type, ?notes, "play chord");

        self.route(|out| {
            for &note in &notes {
                out.note_on(note);
            }
        });
        self.held = notes.clone();
        notes
    }

    /// Stop exactly the notes the last `play_chord` started.
    pub fn stop_chord(&mut self) {
        if self.held.is_empty() {
            return;
        }
        let held = std::mem::take(&mut self.held);
        self.route(|out| {
            for &note in &held {
                out.note_off(note);
            }
        });
    }

    /// Panic button: stop the held chord and every other live voice.
    pub fn all_notes_off(&mut self) {
        self.stop_chord();
        self.voices.release_all(&mut self.context);
        info!("all notes off");
    }

    pub fn set_chord_type(&mut self, chord_type: ChordType) {
        self.chord_type = chord_type;
    }

    pub fn octave_up(&mut self) -> i32 {
        self.octave = (self.octave + 1).min(MAX_OCTAVE);
        self.octave
    }

    pub fn octave_down(&mut self) -> i32 {
        self.octave = (self.octave - 1).max(MIN_OCTAVE);
        self.octave
    }

    /// Select a preset for future notes. Sounding voices keep their timbre.
    pub fn set_preset(&mut self, name: &str) -> Result<()> {
        if !preset::is_known(name) {
            return Err(SynthError::UnknownPreset(name.to_string()));
        }
        self.preset = name.to_string();
        Ok(())
    }

    pub fn cycle_preset(&mut self) -> &str {
        self.preset = preset::next_preset(&self.preset).to_string();
        &self.preset
    }

    /// Absolute controller position. Returns the clamped value.
    pub fn set_controller(&mut self, param: EffectParam, value: f32) -> f32 {
        let value = self.controllers.set(param, value);
        self.apply_controller(param, value);
        value
    }

    /// Relative controller drag. Returns the clamped value.
    pub fn nudge_controller(&mut self, param: EffectParam, delta: f32) -> f32 {
        let value = self.controllers.nudge(param, delta);
        self.apply_controller(param, value);
        value
    }

    /// Pointer moved on the XY pad (normalized coordinates).
    pub fn pad_move(&mut self, x: f32, y: f32) {
        for (param, value) in self.pad.map(x, y) {
            self.set_controller(param, value);
        }
    }

    /// Audio callback entry: render stereo frames and retire finished voices.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        if !self.synthesis_enabled {
            left.fill(0.0);
            right.fill(0.0);
            return;
        }
        self.context.render_block(left, right);
        self.voices.reap(&mut self.context);
    }

    fn apply_controller(&mut self, param: EffectParam, value: f32) {
        let now = self.context.current_time();
        self.context.effects_mut().set_parameter(param, value, now);
    }

    fn route(&mut self, f: impl FnOnce(&mut dyn NoteOutput)) {
        if self.router.is_internal() && !self.synthesis_enabled {
            debug!("internal synthesis disabled, notes dropped");
            return;
        }
        let Self {
            router,
            voices,
            context,
            preset,
            ..
        } = self;
        router.with_output(voices, context, preset.as_str(), f);
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    pub fn chord_type(&self) -> ChordType {
        self.chord_type
    }

    pub fn preset(&self) -> &str {
        &self.preset
    }

    pub fn controller(&self, param: EffectParam) -> f32 {
        self.controllers.get(param)
    }

    pub fn status(&self) -> &str {
        self.status_override
            .as_deref()
            .unwrap_or_else(|| self.router.status())
    }

    pub fn output_mode(&self) -> OutputMode {
        self.router.mode()
    }

    pub fn held_notes(&self) -> &[Note] {
        &self.held
    }

    pub fn synthesis_enabled(&self) -> bool {
        self.synthesis_enabled
    }

    pub fn voices(&self) -> &VoiceManager {
        &self.voices
    }

    pub fn context(&self) -> &AudioContext {
        &self.context
    }

    pub fn current_time(&self) -> f64 {
        self.context.current_time()
    }

    pub fn sample_rate(&self) -> f32 {
        self.context.sample_rate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MockSink;

    fn config() -> SynthConfig {
        SynthConfig {
            reverb_seconds: 0.05,
            ..SynthConfig::default()
        }
    }

    fn internal() -> Instrument {
        Instrument::new(&config(), 8_000.0, OutputRouter::internal())
    }

    #[test]
    fn octave_is_clamped() {
        let mut inst = internal();
        assert_eq!(inst.octave(), 4);
        for _ in 0..10 {
            inst.octave_up();
        }
        assert_eq!(inst.octave(), MAX_OCTAVE);
        for _ in 0..20 {
            inst.octave_down();
        }
        assert_eq!(inst.octave(), MIN_OCTAVE);
    }

    #[test]
    fn octave_transposes_chord() {
        let mut inst = internal();
        inst.octave_up();
        assert_eq!(inst.play_chord(60), vec![72, 76, 79]);
    }

    #[test]
    fn new_chord_stops_the_previous_one() {
        let mut inst = internal();
        inst.play_chord(60);
        inst.set_chord_type(ChordType::Minor);
        inst.play_chord(62);

        assert_eq!(inst.held_notes(), &[62, 65, 69]);
        assert_eq!(inst.voices().live_notes(), vec![62, 65, 69]);
        assert_eq!(inst.voices().releasing_count(), 3);
    }

    #[test]
    fn stop_releases_what_was_played_after_type_change() {
        let mut inst = internal();
        inst.play_chord(60);
        inst.set_chord_type(ChordType::Sus4);
        inst.octave_down();
        inst.stop_chord();
        assert_eq!(inst.voices().live_count(), 0);
        assert!(inst.held_notes().is_empty());
    }

    #[test]
    fn presets_are_validated_and_cycle() {
        let mut inst = internal();
        assert_eq!(inst.preset(), "saw");
        assert!(inst.set_preset("bagpipes").is_err());
        assert_eq!(inst.preset(), "saw");
        inst.set_preset("fm").expect("known preset");
        assert_eq!(inst.cycle_preset(), "saw");
        assert_eq!(inst.cycle_preset(), "sine");
    }

    #[test]
    fn controllers_write_mapped_values_to_bus() {
        let mut inst = internal();
        assert_eq!(inst.set_controller(EffectParam::Cutoff, 0.5), 0.5);
        assert_eq!(inst.context().effects().target(EffectParam::Cutoff), 10_000.0);

        inst.nudge_controller(EffectParam::ReverbMix, 10.0);
        assert_eq!(inst.controller(EffectParam::ReverbMix), 1.0);
        assert_eq!(inst.context().effects().target(EffectParam::ReverbMix), 1.5);
    }

    #[test]
    fn pad_drives_filter() {
        let mut inst = internal();
        inst.pad_move(1.0, 0.0);
        assert_eq!(inst.context().effects().target(EffectParam::Cutoff), 20_000.0);
        assert_eq!(inst.context().effects().target(EffectParam::Resonance), 0.0);
        assert_eq!(inst.controller(EffectParam::Resonance), 0.0);
    }

    #[test]
    fn disabled_synthesis_renders_silence_and_keeps_running() {
        let mut inst = internal();
        inst.disable_synthesis(&SynthError::BackendInitFailure("no device".to_string()));
        assert!(inst.status().starts_with("Audio unavailable"));

        assert_eq!(inst.play_chord(60), vec![60, 64, 67]);
        assert_eq!(inst.voices().live_count(), 0);

        let mut left = vec![1.0f32; 64];
        let mut right = vec![1.0f32; 64];
        inst.render(&mut left, &mut right);
        assert!(left.iter().chain(&right).all(|&s| s == 0.0));
    }

    #[test]
    fn external_output_ignores_synthesis_state() {
        let sink = MockSink::new("keys");
        let mut inst = Instrument::new(
            &config(),
            8_000.0,
            OutputRouter::external(Box::new(sink.clone()), 100),
        );
        inst.disable_synthesis(&SynthError::BackendInitFailure("no device".to_string()));
        inst.play_chord(60);
        assert_eq!(sink.sent().len(), 3);
    }

    #[test]
    fn all_notes_off_clears_everything() {
        let mut inst = internal();
        inst.play_chord(60);
        inst.all_notes_off();
        assert_eq!(inst.voices().live_count(), 0);
        assert!(inst.held_notes().is_empty());
    }
}
