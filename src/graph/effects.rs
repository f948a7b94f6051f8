use crate::{
    config::SynthConfig,
    dsp::{delay::FeedbackDelay, filter::SVFilter, reverb::ConvolutionReverb},
    graph::{node::RenderCtx, param::AudioParam},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Effects Bus
===========

Every voice feeds one shared, fixed chain. The topology never changes after
construction; only parameter values move.

    voices ─▶ [lowpass] ─┬───────────────────────────────▶ (+) ─▶ [master] ─▶ L, R
                         ├─▶ [delay ⟲ fb] ─▶ [delay mix] ──▶ (+)
                         └─▶ [reverb L/R] ─▶ [reverb mix] ─▶ (+)

Controllers speak in normalized [0, 1] positions. Each parameter maps that
position to engineering units through a fixed curve:

    parameter    curve          units
    cutoff       v · 20000      Hz
    resonance    v · 30         dB of peak (Q)
    delay_mix    v · 1.0        wet gain
    reverb_mix   v · 1.5        wet gain

A new value never jumps. It becomes the target of an exponential approach
with a short time constant, which removes zipper noise from knob drags.

Filter coefficients are recomputed every CONTROL_INTERVAL frames; the gains
are evaluated per sample.
*/

pub const CONTROL_INTERVAL: usize = 32;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EffectParam {
    Cutoff,
    Resonance,
    DelayMix,
    ReverbMix,
}

impl EffectParam {
    pub const ALL: [EffectParam; 4] = [
        EffectParam::Cutoff,
        EffectParam::Resonance,
        EffectParam::DelayMix,
        EffectParam::ReverbMix,
    ];

    /// Normalized position → engineering units. Input is clamped to [0, 1];
    /// NaN reads as 0.
    pub fn map(self, normalized: f32) -> f32 {
        let v = if normalized.is_nan() { 0.0 } else { normalized.clamp(0.0, 1.0) };
        match self {
            EffectParam::Cutoff => v * 20_000.0,
            EffectParam::Resonance => v * 30.0,
            EffectParam::DelayMix => v,
            EffectParam::ReverbMix => v * 1.5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EffectParam::Cutoff => "Cutoff",
            EffectParam::Resonance => "Resonance",
            EffectParam::DelayMix => "Delay",
            EffectParam::ReverbMix => "Reverb",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            EffectParam::Cutoff => "Hz",
            EffectParam::Resonance => "dB",
            EffectParam::DelayMix | EffectParam::ReverbMix => "",
        }
    }
}

pub struct EffectsBus {
    sample_rate: f32,
    smoothing: f64,
    control_phase: usize,

    filter: SVFilter,
    cutoff: AudioParam,
    resonance: AudioParam,

    delay: FeedbackDelay,
    delay_mix: AudioParam,

    reverb: ConvolutionReverb,
    reverb_mix: AudioParam,

    master: AudioParam,
}

impl EffectsBus {
    pub fn new(sample_rate: f32, config: &SynthConfig) -> Self {
        let initial = config.effects;
        let cutoff = EffectParam::Cutoff.map(initial.cutoff);
        let resonance = EffectParam::Resonance.map(initial.resonance);

        Self {
            sample_rate,
            smoothing: config.smoothing,
            control_phase: 0,
            filter: SVFilter::lowpass(cutoff, resonance, sample_rate),
            cutoff: AudioParam::new(cutoff),
            resonance: AudioParam::new(resonance),
            delay: FeedbackDelay::new(config.delay_time as f32, config.delay_feedback, sample_rate),
            delay_mix: AudioParam::new(EffectParam::DelayMix.map(initial.delay_mix)),
            reverb: ConvolutionReverb::new(sample_rate, config.reverb_seconds, config.reverb_seed),
            reverb_mix: AudioParam::new(EffectParam::ReverbMix.map(initial.reverb_mix)),
            master: AudioParam::new(config.master_gain),
        }
    }

    pub fn param(&self, param: EffectParam) -> &AudioParam {
        match param {
            EffectParam::Cutoff => &self.cutoff,
            EffectParam::Resonance => &self.resonance,
            EffectParam::DelayMix => &self.delay_mix,
            EffectParam::ReverbMix => &self.reverb_mix,
        }
    }

    fn param_mut(&mut self, param: EffectParam) -> &mut AudioParam {
        match param {
            EffectParam::Cutoff => &mut self.cutoff,
            EffectParam::Resonance => &mut self.resonance,
            EffectParam::DelayMix => &mut self.delay_mix,
            EffectParam::ReverbMix => &mut self.reverb_mix,
        }
    }

    /// Clamp, map, and glide toward the new value starting at `now`.
    pub fn set_parameter(&mut self, param: EffectParam, normalized: f32, now: f64) {
        let value = param.map(normalized);
        let smoothing = self.smoothing;
        self.param_mut(param).set_target_at_time(value, now, smoothing);
    }

    /// The mapped value the parameter is heading to.
    pub fn target(&self, param: EffectParam) -> f32 {
        self.param(param).final_value()
    }

    pub fn master(&self) -> &AudioParam {
        &self.master
    }

    /// Run one block of mono input through the chain into stereo output.
    pub fn process(&mut self, input: &[f32], left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        let frames = input.len().min(left.len()).min(right.len());

        for i in 0..frames {
            let t = ctx.frame_time(i);

            if self.control_phase == 0 {
                self.filter.set_params(
                    self.cutoff.value_at(t),
                    self.resonance.value_at(t),
                    self.sample_rate,
                );
            }
            self.control_phase = (self.control_phase + 1) % CONTROL_INTERVAL;

            let dry = self.filter.process(input[i]);
            let echo = self.delay.process(dry) * self.delay_mix.value_at(t);
            let (room_l, room_r) = self.reverb.process(dry);
            let room_gain = self.reverb_mix.value_at(t);
            let master = self.master.value_at(t);

            left[i] = (dry + echo + room_l * room_gain) * master;
            right[i] = (dry + echo + room_r * room_gain) * master;
        }
    }

    pub fn collapse(&mut self, time: f64) {
        for param in EffectParam::ALL {
            self.param_mut(param).collapse(time);
        }
        self.master.collapse(time);
    }
}
