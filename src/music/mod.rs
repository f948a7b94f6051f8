// Purpose: pitch math and chord resolution (pure, no audio)

pub mod chord;
pub mod notes;

pub use chord::{resolve, resolve_named, ChordSpec, ChordType};
pub use notes::{midi_note_to_freq, note_name, Note, Tuning};
