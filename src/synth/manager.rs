use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::{
    config::SynthConfig,
    graph::AudioBackend,
    music::{Note, Tuning},
    synth::{
        envelope::EnvelopeGenerator,
        preset,
        voice::{Voice, VoiceHandle, VoiceState},
    },
};

/// Owns every voice in the session.
///
/// At most one *live* voice exists per note. Released voices move to a
/// separate releasing set where they finish their tail; `reap` collects them
/// once the audio context reports their oscillators stopped.
pub struct VoiceManager {
    live: BTreeMap<Note, Voice>,
    releasing: Vec<Voice>,
    envelope: EnvelopeGenerator,
    tuning: Tuning,
}

impl VoiceManager {
    pub fn new(envelope: EnvelopeGenerator, tuning: Tuning) -> Self {
        Self {
            live: BTreeMap::new(),
            releasing: Vec::new(),
            envelope,
            tuning,
        }
    }

    pub fn from_config(config: &SynthConfig) -> Self {
        Self::new(
            EnvelopeGenerator::from_config(config),
            Tuning::new(config.reference_freq, config.reference_note),
        )
    }

    pub fn envelope(&self) -> &EnvelopeGenerator {
        &self.envelope
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Start a voice for `note`, releasing any voice already live for it.
    pub fn trigger<B: AudioBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        note: Note,
        preset_name: &str,
    ) -> VoiceHandle {
        self.release(backend, note);

        let frequency = self.tuning.frequency(note);
        let topology = match preset::build_topology(preset_name, frequency) {
            Ok(topology) => topology,
            Err(err) => {
                warn!(%err, fallback = preset::DEFAULT_PRESET, "using default waveform");
                preset::default_topology(frequency)
            }
        };

        let now = backend.current_time();
        let node = backend.create_voice(&topology);
        let attack_end = match backend.voice_gain_mut(node) {
            Some(gain) => self.envelope.apply_attack(gain, now),
            None => now + self.envelope.attack_time,
        };
        backend.start_voice(node, now);

        debug!(note, voice = node.0, frequency, "voice triggered");

        let voice = Voice::new(note, node, now, attack_end);
        let handle = voice.handle();
        self.live.insert(note, voice);
        handle
    }

    /// Release the live voice for `note`. No voice is a no-op.
    pub fn release<B: AudioBackend + ?Sized>(&mut self, backend: &mut B, note: Note) -> bool {
        let Some(mut voice) = self.live.remove(&note) else {
            return false;
        };

        let now = backend.current_time();
        let stop_at = match backend.voice_gain_mut(voice.node()) {
            Some(gain) => self.envelope.apply_release(gain, now),
            None => self.envelope.stop_time(now),
        };
        backend.stop_voice(voice.node(), stop_at);
        voice.begin_release(stop_at);

        debug!(note, voice = voice.node().0, stop_at, "voice releasing");
        self.releasing.push(voice);
        true
    }

    pub fn release_all<B: AudioBackend + ?Sized>(&mut self, backend: &mut B) {
        let notes: Vec<Note> = self.live.keys().copied().collect();
        for note in notes {
            self.release(backend, note);
        }
    }

    /// Drop every voice, live or releasing, without a release ramp. For when
    /// nothing will render them again.
    pub fn dispose_all<B: AudioBackend + ?Sized>(&mut self, backend: &mut B) {
        let live = std::mem::take(&mut self.live).into_values();
        for voice in live.chain(self.releasing.drain(..)) {
            backend.dispose_voice(voice.node());
        }
    }

    /// Dispose of voices whose scheduled stop has fired. Returns how many.
    pub fn reap<B: AudioBackend + ?Sized>(&mut self, backend: &mut B) -> usize {
        let finished = backend.take_finished();
        if finished.is_empty() {
            return 0;
        }

        let before = self.releasing.len();
        self.releasing.retain_mut(|voice| {
            if finished.contains(&voice.node()) {
                voice.dispose();
                debug!(note = voice.note(), voice = voice.node().0, "voice disposed");
                false
            } else {
                true
            }
        });
        before - self.releasing.len()
    }

    /// State of the live voice for `note`, or the newest releasing one.
    pub fn state(&self, note: Note, now: f64) -> Option<VoiceState> {
        self.live
            .get(&note)
            .or_else(|| self.releasing.iter().rev().find(|v| v.note() == note))
            .map(|voice| voice.state_at(now))
    }

    pub fn voice(&self, note: Note) -> Option<&Voice> {
        self.live.get(&note)
    }

    pub fn live_notes(&self) -> Vec<Note> {
        self.live.keys().copied().collect()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn releasing(&self) -> &[Voice] {
        &self.releasing
    }

    pub fn releasing_count(&self) -> usize {
        self.releasing.len()
    }

    /// Voices whose state at `now` is `state`, live and releasing alike.
    pub fn count_in_state(&self, note: Note, state: VoiceState, now: f64) -> usize {
        self.live
            .values()
            .chain(self.releasing.iter())
            .filter(|voice| voice.note() == note && voice.state_at(now) == state)
            .count()
    }
}

impl Default for VoiceManager {
    fn default() -> Self {
        Self::from_config(&SynthConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AudioContext;

    const SR: f32 = 8_000.0;

    fn setup() -> (VoiceManager, AudioContext) {
        let config = SynthConfig {
            reverb_seconds: 0.05,
            ..SynthConfig::default()
        };
        (VoiceManager::from_config(&config), AudioContext::new(SR, &config))
    }

    fn advance(ctx: &mut AudioContext, seconds: f64) {
        let frames = (seconds * SR as f64).ceil() as usize;
        let mut left = vec![0.0f32; frames];
        let mut right = vec![0.0f32; frames];
        ctx.render_block(&mut left, &mut right);
    }

    #[test]
    fn trigger_starts_attacking_then_sustains() {
        let (mut voices, mut ctx) = setup();
        let handle = voices.trigger(&mut ctx, 60, "saw");
        assert_eq!(handle.note, 60);
        assert_eq!(voices.state(60, ctx.current_time()), Some(VoiceState::Attacking));

        advance(&mut ctx, 0.02);
        assert_eq!(voices.state(60, ctx.current_time()), Some(VoiceState::Sustaining));
    }

    #[test]
    fn retrigger_keeps_one_live_voice() {
        let (mut voices, mut ctx) = setup();
        let first = voices.trigger(&mut ctx, 64, "sine");
        advance(&mut ctx, 0.05);
        let second = voices.trigger(&mut ctx, 64, "sine");
        assert_ne!(first.node, second.node);

        advance(&mut ctx, 0.05);
        let now = ctx.current_time();
        assert_eq!(voices.count_in_state(64, VoiceState::Sustaining, now), 1);
        assert_eq!(voices.count_in_state(64, VoiceState::Releasing, now), 1);
        assert_eq!(voices.live_count(), 1);
    }

    #[test]
    fn releasing_unknown_note_is_noop() {
        let (mut voices, mut ctx) = setup();
        assert!(!voices.release(&mut ctx, 42));
        assert_eq!(voices.releasing_count(), 0);
        assert_eq!(ctx.voice_count(), 0);
    }

    #[test]
    fn release_mid_attack_ramps_from_attack_value() {
        let (mut voices, mut ctx) = setup();
        let handle = voices.trigger(&mut ctx, 67, "square");
        advance(&mut ctx, 0.005); // 40 frames, half of the 10 ms attack

        voices.release(&mut ctx, 67);
        let now = ctx.current_time();
        let gain = ctx
            .voice(handle.node)
            .map(|voice| voice.gain().value_at(now))
            .expect("voice node still alive");
        assert!((gain - 0.25).abs() < 0.01, "release starts at {gain}");
    }

    #[test]
    fn released_voices_are_reaped_after_tail() {
        let (mut voices, mut ctx) = setup();
        voices.trigger(&mut ctx, 60, "fm");
        advance(&mut ctx, 0.1);
        voices.release(&mut ctx, 60);

        advance(&mut ctx, 0.2);
        assert_eq!(voices.reap(&mut ctx), 0, "tail margin not yet elapsed");
        assert_eq!(voices.releasing_count(), 1);

        advance(&mut ctx, 0.06);
        assert_eq!(voices.reap(&mut ctx), 1);
        assert_eq!(voices.releasing_count(), 0);
        assert_eq!(voices.state(60, ctx.current_time()), None);
        assert_eq!(ctx.voice_count(), 0);
    }

    #[test]
    fn unknown_preset_falls_back_to_saw() {
        let (mut voices, mut ctx) = setup();
        let handle = voices.trigger(&mut ctx, 60, "no-such-preset");
        assert!(ctx.voice(handle.node).is_some());
        assert_eq!(voices.live_notes(), vec![60]);
    }

    #[test]
    fn release_all_empties_live_set() {
        let (mut voices, mut ctx) = setup();
        for note in [60, 64, 67] {
            voices.trigger(&mut ctx, note, "saw");
        }
        voices.release_all(&mut ctx);
        assert_eq!(voices.live_count(), 0);
        assert_eq!(voices.releasing_count(), 3);
        assert!(voices
            .releasing()
            .iter()
            .all(|v| v.state_at(ctx.current_time()) == VoiceState::Releasing));
    }

    #[test]
    fn dispose_all_forgets_every_voice() {
        let (mut voices, mut ctx) = setup();
        voices.trigger(&mut ctx, 60, "saw");
        voices.trigger(&mut ctx, 64, "saw");
        voices.release(&mut ctx, 64);

        voices.dispose_all(&mut ctx);
        assert_eq!(voices.live_count(), 0);
        assert_eq!(voices.releasing_count(), 0);
        assert_eq!(ctx.voice_count(), 0);
        assert_eq!(voices.state(60, ctx.current_time()), None);
    }
}
