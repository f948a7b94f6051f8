use crate::{graph::VoiceNodeId, music::Note};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Attacking,  // Gain ramping up to sustain
    Sustaining, // Attack finished, holding
    Releasing,  // Key released, ramping to zero, stop scheduled
    Disposed,   // Oscillators stopped, node dropped
}

/// Returned to callers of `VoiceManager::trigger`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceHandle {
    pub note: Note,
    pub node: VoiceNodeId,
}

/// Bookkeeping for one sounding note. The signal nodes live in the audio
/// context; this only tracks where the voice is in its lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    note: Note,
    handle: VoiceNodeId,
    state: VoiceState,
    started_at: f64,
    attack_end: f64,
    stop_at: Option<f64>,
}

impl Voice {
    pub fn new(note: Note, handle: VoiceNodeId, started_at: f64, attack_end: f64) -> Self {
        Self {
            note,
            handle,
            state: VoiceState::Attacking,
            started_at,
            attack_end,
            stop_at: None,
        }
    }

    /// State as of clock time `now`. Attacking becomes Sustaining by time
    /// alone; every other transition is explicit.
    pub fn state_at(&self, now: f64) -> VoiceState {
        match self.state {
            VoiceState::Attacking if now >= self.attack_end => VoiceState::Sustaining,
            state => state,
        }
    }

    /// Attacking/Sustaining → Releasing. Returns false if already past that.
    pub fn begin_release(&mut self, stop_at: f64) -> bool {
        match self.state {
            VoiceState::Attacking | VoiceState::Sustaining => {
                self.state = VoiceState::Releasing;
                self.stop_at = Some(stop_at);
                true
            }
            VoiceState::Releasing | VoiceState::Disposed => false,
        }
    }

    pub fn dispose(&mut self) {
        self.state = VoiceState::Disposed;
    }

    pub fn note(&self) -> Note {
        self.note
    }

    pub fn node(&self) -> VoiceNodeId {
        self.handle
    }

    pub fn handle(&self) -> VoiceHandle {
        VoiceHandle {
            note: self.note,
            node: self.handle,
        }
    }

    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    pub fn attack_end(&self) -> f64 {
        self.attack_end
    }

    pub fn stop_at(&self) -> Option<f64> {
        self.stop_at
    }
}
