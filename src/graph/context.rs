//! The audio context: one sample clock, the live voice nodes, and the shared
//! effects bus.
//!
//! The clock is the number of frames rendered divided by the sample rate. It
//! only moves when `render_block` runs, so tests drive time simply by rendering.
//! Everything the control side does is expressed as "at clock time t": gain
//! automation, oscillator start and stop, and node disposal all share it.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    config::SynthConfig,
    engine::scheduler::{ScheduledAction, Scheduler},
    graph::{
        effects::EffectsBus,
        node::{GraphNode, RenderCtx},
        oscillator::OscillatorTopology,
        param::AudioParam,
        voice::VoiceNode,
    },
    MAX_BLOCK_SIZE,
};

/// Arena key for a voice node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceNodeId(pub u64);

/// What the voice manager needs from an audio engine.
pub trait AudioBackend {
    /// Current audio-clock time in seconds.
    fn current_time(&self) -> f64;

    /// Build the topology's oscillators behind a gain that starts at 0, wired
    /// into the effects bus input. Nothing sounds until the voice is started.
    fn create_voice(&mut self, topology: &OscillatorTopology) -> VoiceNodeId;

    fn voice_gain_mut(&mut self, id: VoiceNodeId) -> Option<&mut AudioParam>;

    fn start_voice(&mut self, id: VoiceNodeId, when: f64);

    /// Stop the voice's oscillators at `when` and dispose of the node once
    /// the clock has passed it.
    fn stop_voice(&mut self, id: VoiceNodeId, when: f64);

    /// Drop the voice now, without waiting for its scheduled stop. It is not
    /// reported by `take_finished`.
    fn dispose_voice(&mut self, id: VoiceNodeId);

    /// Voices disposed since the last call.
    fn take_finished(&mut self) -> Vec<VoiceNodeId>;
}

pub struct AudioContext {
    sample_rate: f32,
    frames: u64,
    next_id: u64,
    voices: BTreeMap<VoiceNodeId, VoiceNode>,
    scheduler: Scheduler,
    finished: Vec<VoiceNodeId>,
    effects: EffectsBus,
    mix: Vec<f32>,
    scratch: Vec<f32>,
}

impl AudioContext {
    pub fn new(sample_rate: f32, config: &SynthConfig) -> Self {
        Self {
            sample_rate,
            frames: 0,
            next_id: 0,
            voices: BTreeMap::new(),
            scheduler: Scheduler::new(),
            finished: Vec::new(),
            effects: EffectsBus::new(sample_rate, config),
            mix: vec![0.0; MAX_BLOCK_SIZE],
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn effects(&self) -> &EffectsBus {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut EffectsBus {
        &mut self.effects
    }

    pub fn voice(&self, id: VoiceNodeId) -> Option<&VoiceNode> {
        self.voices.get(&id)
    }

    /// Number of voice nodes still in the arena.
    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    /// Render stereo output, advancing the clock by `left.len()` frames.
    pub fn render_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        let frames = left.len().min(right.len());
        let mut offset = 0;

        while offset < frames {
            let n = (frames - offset).min(MAX_BLOCK_SIZE);
            let ctx = RenderCtx::new(self.sample_rate, self.current_time());

            let mix = &mut self.mix[..n];
            mix.fill(0.0);
            for voice in self.voices.values_mut() {
                let out = &mut self.scratch[..n];
                voice.render_block(out, &ctx);
                for (m, v) in mix.iter_mut().zip(out.iter()) {
                    *m += v;
                }
            }

            self.effects.process(
                &self.mix[..n],
                &mut left[offset..offset + n],
                &mut right[offset..offset + n],
                &ctx,
            );

            self.frames += n as u64;
            offset += n;
            self.run_due_actions();
        }
    }

    fn run_due_actions(&mut self) {
        let now = self.current_time();
        while let Some(action) = self.scheduler.pop_due(now) {
            match action {
                ScheduledAction::DisposeVoice(id) => {
                    if self.voices.remove(&id).is_some() {
                        debug!(voice = id.0, time = now, "voice node disposed");
                        self.finished.push(id);
                    }
                }
            }
        }

        for voice in self.voices.values_mut() {
            voice.collapse(now);
        }
        self.effects.collapse(now);
    }
}

impl AudioBackend for AudioContext {
    fn current_time(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    fn create_voice(&mut self, topology: &OscillatorTopology) -> VoiceNodeId {
        let id = VoiceNodeId(self.next_id);
        self.next_id += 1;
        self.voices.insert(id, VoiceNode::new(topology));
        id
    }

    fn voice_gain_mut(&mut self, id: VoiceNodeId) -> Option<&mut AudioParam> {
        self.voices.get_mut(&id).map(VoiceNode::gain_mut)
    }

    fn start_voice(&mut self, id: VoiceNodeId, when: f64) {
        if let Some(voice) = self.voices.get_mut(&id) {
            voice.start(when);
        }
    }

    fn stop_voice(&mut self, id: VoiceNodeId, when: f64) {
        if let Some(voice) = self.voices.get_mut(&id) {
            voice.stop(when);
            self.scheduler.schedule(when, ScheduledAction::DisposeVoice(id));
        }
    }

    fn dispose_voice(&mut self, id: VoiceNodeId) {
        if self.voices.remove(&id).is_some() {
            debug!(voice = id.0, "voice node dropped");
        }
    }

    fn take_finished(&mut self) -> Vec<VoiceNodeId> {
        std::mem::take(&mut self.finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::OscillatorWaveform;

    const SR: f32 = 8_000.0;

    fn context() -> AudioContext {
        let config = SynthConfig {
            reverb_seconds: 0.05,
            ..SynthConfig::default()
        };
        AudioContext::new(SR, &config)
    }

    fn render(ctx: &mut AudioContext, frames: usize) -> (Vec<f32>, Vec<f32>) {
        let mut left = vec![0.0f32; frames];
        let mut right = vec![0.0f32; frames];
        ctx.render_block(&mut left, &mut right);
        (left, right)
    }

    #[test]
    fn clock_advances_with_rendering() {
        let mut ctx = context();
        assert_eq!(ctx.current_time(), 0.0);
        render(&mut ctx, 4_000);
        assert!((ctx.current_time() - 0.5).abs() < 1e-12);
        // Longer than one internal block.
        render(&mut ctx, MAX_BLOCK_SIZE * 3 + 17);
        assert_eq!(ctx.frames_rendered(), 4_000 + (MAX_BLOCK_SIZE * 3 + 17) as u64);
    }

    #[test]
    fn new_voice_is_silent() {
        let mut ctx = context();
        let id = ctx.create_voice(&OscillatorTopology::simple(OscillatorWaveform::Saw, 220.0));
        ctx.start_voice(id, 0.0);
        let (left, right) = render(&mut ctx, 512);
        assert!(left.iter().chain(&right).all(|&s| s == 0.0));
    }

    #[test]
    fn gain_automation_makes_sound() {
        let mut ctx = context();
        let id = ctx.create_voice(&OscillatorTopology::simple(OscillatorWaveform::Square, 220.0));
        if let Some(gain) = ctx.voice_gain_mut(id) {
            gain.set_value_at_time(0.5, 0.0);
        }
        ctx.start_voice(id, 0.0);
        let (left, _) = render(&mut ctx, 512);
        assert!(left.iter().any(|s| s.abs() > 0.05));
    }

    #[test]
    fn stopped_voice_is_disposed_after_its_stop_time() {
        let mut ctx = context();
        let id = ctx.create_voice(&OscillatorTopology::fm(110.0));
        ctx.start_voice(id, 0.0);
        ctx.stop_voice(id, 0.1);

        render(&mut ctx, 400); // 0.05 s
        assert!(ctx.take_finished().is_empty());
        assert_eq!(ctx.voice_count(), 1);

        render(&mut ctx, 400); // 0.1 s
        assert_eq!(ctx.take_finished(), vec![id]);
        assert_eq!(ctx.voice_count(), 0);
        assert!(ctx.take_finished().is_empty(), "reported once");
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut ctx = context();
        let ghost = VoiceNodeId(99);
        ctx.start_voice(ghost, 0.0);
        ctx.stop_voice(ghost, 0.0);
        assert!(ctx.voice_gain_mut(ghost).is_none());
        render(&mut ctx, 64);
        assert!(ctx.take_finished().is_empty());
    }

    #[test]
    fn disposing_early_cancels_pending_disposal() {
        let mut ctx = context();
        let id = ctx.create_voice(&OscillatorTopology::simple(OscillatorWaveform::Saw, 220.0));
        ctx.start_voice(id, 0.0);
        ctx.stop_voice(id, 0.01);
        ctx.dispose_voice(id);
        assert_eq!(ctx.voice_count(), 0);

        render(&mut ctx, 256);
        assert!(ctx.take_finished().is_empty());
    }
}
