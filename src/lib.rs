pub mod config;
pub mod controls; // Knobs and the XY pad
pub mod dsp;
pub mod engine; // Clock-keyed deferred actions
pub mod error;
pub mod graph; // Rendering on the audio clock
pub mod instrument; // Session façade for front ends
pub mod io;
pub mod music; // Pitch math and chord resolution
pub mod synth; // Voice management and presets

pub use config::SynthConfig;
pub use error::{Result, SynthError};
pub use instrument::Instrument;

pub const MAX_BLOCK_SIZE: usize = 2048;
