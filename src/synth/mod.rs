// Purpose: voice lifecycle and timbre selection
// This layer sits above the graph and decides which voices exist and when

pub mod envelope;
pub mod manager;
pub mod preset;
pub mod voice;

pub use envelope::EnvelopeGenerator;
pub use manager::VoiceManager;
pub use preset::{build_topology, next_preset, DEFAULT_PRESET, PRESET_NAMES};
pub use voice::{Voice, VoiceHandle, VoiceState};
