//! Error taxonomy for the instrument core.
//!
//! None of these are fatal to a running session: every caller has a fallback
//! (default waveform, internal synthesis, disabled audio) and only the binary's
//! startup path turns them into reports.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthError {
    /// Timbre name not known to the preset engine.
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    /// External MIDI output could not be probed, opened or written to.
    #[error("MIDI device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Audio output could not be created.
    #[error("audio backend failed to initialize: {0}")]
    BackendInitFailure(String),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SynthError>;
