//! Where chord notes go: an external MIDI device or the internal synth.
//!
//! The choice is made once, from the result of probing for a MIDI output, and
//! never changes for the rest of the session.

use std::fmt;

use tracing::{info, warn};

use crate::{
    error::Result,
    graph::AudioBackend,
    music::Note,
    synth::VoiceManager,
};

use super::{device::MidiSink, midi::MidiEvent};

/// Something that can start and stop notes.
pub trait NoteOutput {
    fn note_on(&mut self, note: Note);

    fn note_off(&mut self, note: Note);
}

/// Sends note on/off to an external MIDI device at a fixed velocity.
pub struct ExternalOutput {
    sink: Box<dyn MidiSink>,
    channel: u8,
    velocity: u8,
}

impl ExternalOutput {
    pub fn new(sink: Box<dyn MidiSink>, velocity: u8) -> Self {
        Self {
            sink,
            channel: 0,
            velocity,
        }
    }

    pub fn device_name(&self) -> &str {
        self.sink.name()
    }

    fn send(&mut self, event: Option<MidiEvent>, note: Note) {
        let Some(event) = event else {
            warn!(note, "note outside the MIDI range, not sent");
            return;
        };
        if let Err(err) = self.sink.send(&event.to_bytes()) {
            warn!(%err, note, "MIDI message dropped");
        }
    }
}

impl NoteOutput for ExternalOutput {
    fn note_on(&mut self, note: Note) {
        let event = MidiEvent::note_on(self.channel, note, self.velocity);
        self.send(event, note);
    }

    fn note_off(&mut self, note: Note) {
        let event = MidiEvent::note_off(self.channel, note);
        self.send(event, note);
    }
}

/// Plays notes on the internal voice manager with the current preset.
pub struct InternalSynth<'a, B: AudioBackend + ?Sized> {
    voices: &'a mut VoiceManager,
    backend: &'a mut B,
    preset: &'a str,
}

impl<'a, B: AudioBackend + ?Sized> InternalSynth<'a, B> {
    pub fn new(voices: &'a mut VoiceManager, backend: &'a mut B, preset: &'a str) -> Self {
        Self {
            voices,
            backend,
            preset,
        }
    }
}

impl<B: AudioBackend + ?Sized> NoteOutput for InternalSynth<'_, B> {
    fn note_on(&mut self, note: Note) {
        self.voices.trigger(&mut *self.backend, note, self.preset);
    }

    fn note_off(&mut self, note: Note) {
        self.voices.release(&mut *self.backend, note);
    }
}

/// Display form of the routing decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    External(String),
    Internal,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::External(name) => write!(f, "MIDI: {name}"),
            OutputMode::Internal => f.write_str("Internal synth"),
        }
    }
}

enum OutputTarget {
    External(ExternalOutput),
    Internal,
}

pub struct OutputRouter {
    target: OutputTarget,
    status: String,
}

impl OutputRouter {
    pub fn internal() -> Self {
        Self {
            target: OutputTarget::Internal,
            status: "Mode: internal synthesizer".to_string(),
        }
    }

    pub fn external(sink: Box<dyn MidiSink>, velocity: u8) -> Self {
        let status = format!("Connected to: {}", sink.name());
        Self {
            target: OutputTarget::External(ExternalOutput::new(sink, velocity)),
            status,
        }
    }

    /// Decide the session's target from a device probe. Never fails: a probe
    /// error is logged and routes to the internal synth.
    pub fn from_probe<S: MidiSink + 'static>(probe: Result<Option<S>>, velocity: u8) -> Self {
        match probe {
            Ok(Some(sink)) => {
                info!(device = sink.name(), "routing chords to MIDI output");
                Self::external(Box::new(sink), velocity)
            }
            Ok(None) => {
                info!("no MIDI output found, routing chords to internal synth");
                Self::internal()
            }
            Err(err) => {
                warn!(%err, "MIDI probe failed, routing chords to internal synth");
                Self {
                    target: OutputTarget::Internal,
                    status: "MIDI error, using internal synthesizer".to_string(),
                }
            }
        }
    }

    pub fn mode(&self) -> OutputMode {
        match &self.target {
            OutputTarget::External(output) => OutputMode::External(output.device_name().to_string()),
            OutputTarget::Internal => OutputMode::Internal,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self.target, OutputTarget::Internal)
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Run `f` against the session's output.
    pub fn with_output<B, R>(
        &mut self,
        voices: &mut VoiceManager,
        backend: &mut B,
        preset: &str,
        f: impl FnOnce(&mut dyn NoteOutput) -> R,
    ) -> R
    where
        B: AudioBackend + ?Sized,
    {
        match &mut self.target {
            OutputTarget::External(output) => f(output),
            OutputTarget::Internal => f(&mut InternalSynth::new(voices, backend, preset)),
        }
    }
}
