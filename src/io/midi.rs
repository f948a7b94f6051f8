use crate::music::Note;

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;

/// Channel voice messages the instrument sends to an external device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
}

impl MidiEvent {
    /// Note-on for `note`, or `None` if it is outside the MIDI key range.
    pub fn note_on(channel: u8, note: Note, velocity: u8) -> Option<Self> {
        Some(MidiEvent::NoteOn {
            channel: channel & 0x0f,
            key: midi_key(note)?,
            velocity: velocity.min(127),
        })
    }

    /// Note-off with release velocity 0.
    pub fn note_off(channel: u8, note: Note) -> Option<Self> {
        Some(MidiEvent::NoteOff {
            channel: channel & 0x0f,
            key: midi_key(note)?,
            velocity: 0,
        })
    }

    pub fn to_bytes(&self) -> [u8; 3] {
        match *self {
            MidiEvent::NoteOn {
                channel,
                key,
                velocity,
            } => [NOTE_ON | channel, key, velocity],
            MidiEvent::NoteOff {
                channel,
                key,
                velocity,
            } => [NOTE_OFF | channel, key, velocity],
        }
    }
}

/// MIDI key number for a note, if it fits in 0..=127.
pub fn midi_key(note: Note) -> Option<u8> {
    u8::try_from(note).ok().filter(|key| *key <= 127)
}
