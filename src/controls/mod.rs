//! Continuous controllers: rotary knobs and the filter XY pad.
//!
//! Controllers only hold normalized positions in [0, 1]. Mapping to
//! engineering units happens in the effects bus, so a knob never needs to know
//! whether it drives hertz or a gain.

use std::collections::BTreeMap;

use crate::{config::EffectParams, graph::EffectParam};

/// One normalized position per effect parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerBank {
    values: BTreeMap<EffectParam, f32>,
}

impl ControllerBank {
    pub fn new(initial: EffectParams) -> Self {
        let mut bank = Self {
            values: BTreeMap::new(),
        };
        bank.set(EffectParam::Cutoff, initial.cutoff);
        bank.set(EffectParam::Resonance, initial.resonance);
        bank.set(EffectParam::DelayMix, initial.delay_mix);
        bank.set(EffectParam::ReverbMix, initial.reverb_mix);
        bank
    }

    pub fn get(&self, param: EffectParam) -> f32 {
        self.values.get(&param).copied().unwrap_or(0.0)
    }

    /// Absolute set. Returns the stored (clamped) value.
    pub fn set(&mut self, param: EffectParam, value: f32) -> f32 {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        self.values.insert(param, value);
        value
    }

    /// Relative drag. Returns the stored (clamped) value.
    pub fn nudge(&mut self, param: EffectParam, delta: f32) -> f32 {
        self.set(param, self.get(param) + delta)
    }

    pub fn snapshot(&self) -> EffectParams {
        EffectParams {
            cutoff: self.get(EffectParam::Cutoff),
            resonance: self.get(EffectParam::Resonance),
            delay_mix: self.get(EffectParam::DelayMix),
            reverb_mix: self.get(EffectParam::ReverbMix),
        }
    }
}

impl Default for ControllerBank {
    fn default() -> Self {
        Self::new(EffectParams::default())
    }
}

/// The 2-D touch pad: x drives cutoff, y drives resonance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XyPad {
    pub x_param: EffectParam,
    pub y_param: EffectParam,
}

impl XyPad {
    pub fn filter() -> Self {
        Self {
            x_param: EffectParam::Cutoff,
            y_param: EffectParam::Resonance,
        }
    }

    /// Controller writes for a pointer at normalized `(x, y)`.
    pub fn map(&self, x: f32, y: f32) -> [(EffectParam, f32); 2] {
        [(self.x_param, x), (self.y_param, y)]
    }
}

impl Default for XyPad {
    fn default() -> Self {
        Self::filter()
    }
}
