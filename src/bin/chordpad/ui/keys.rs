//! Keyboard layout
//!
//! The home row plays one octave of roots, piano style: white keys on
//! `a s d f g h j`, black keys on `w e t y u`.

use crossterm::event::KeyCode;

use chordpad::music::{notes::C4, ChordType, Note};

/// What a key press asks the instrument to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    PlayRoot(Note),
    Stop,
    Panic,
    ChordType(ChordType),
    OctaveDown,
    OctaveUp,
    CyclePreset,
    NextKnob,
    KnobUp,
    KnobDown,
    Quit,
}

const ROOT_KEYS: [char; 12] = ['a', 'w', 's', 'e', 'd', 'f', 't', 'g', 'y', 'h', 'u', 'j'];

/// Root note for a piano key, C4 through B4.
pub fn root_for_key(c: char) -> Option<Note> {
    let c = c.to_ascii_lowercase();
    ROOT_KEYS
        .iter()
        .position(|&k| k == c)
        .map(|i| C4 + i as Note)
}

pub fn action_for(code: KeyCode) -> Option<KeyAction> {
    let action = match code {
        KeyCode::Esc => KeyAction::Quit,
        KeyCode::Tab => KeyAction::NextKnob,
        KeyCode::Up => KeyAction::KnobUp,
        KeyCode::Down => KeyAction::KnobDown,
        KeyCode::Char(' ') => KeyAction::Stop,
        KeyCode::Char('!') => KeyAction::Panic,
        KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
        KeyCode::Char('z') => KeyAction::OctaveDown,
        KeyCode::Char('x') => KeyAction::OctaveUp,
        KeyCode::Char('p') => KeyAction::CyclePreset,
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            KeyAction::ChordType(ChordType::ALL[index])
        }
        KeyCode::Char(c) => KeyAction::PlayRoot(root_for_key(c)?),
        _ => return None,
    };
    Some(action)
}
