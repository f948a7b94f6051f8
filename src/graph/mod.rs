//! Rendering on the audio clock.
//!
//! Graph nodes wrap the low-level DSP primitives with what an instrument needs
//! at runtime: start/stop times, automation timelines, and block rendering.
//! `AudioContext` owns them all and is the only thing the audio callback
//! talks to.

/// Sample clock, voice-node arena, and the `AudioBackend` trait.
pub mod context;
/// The shared filter → delay → reverb → master chain.
pub mod effects;
/// Core traits shared by all graph nodes.
pub mod node;
/// Scheduled oscillator node and the topologies it can build.
pub mod oscillator;
/// Value automation (set, ramp, exponential target, cancel).
pub mod param;
/// Oscillator plus private gain, one per sounding note.
pub mod voice;

pub use context::{AudioBackend, AudioContext, VoiceNodeId};
pub use effects::{EffectParam, EffectsBus};
pub use oscillator::OscillatorTopology;
pub use param::AudioParam;
