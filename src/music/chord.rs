//! Chord resolution: root + chord type + octave offset → notes.

use std::fmt;

use super::notes::Note;

/// Triad qualities (plus suspended fourth).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordType {
    Major,
    Minor,
    Dim,
    Aug,
    Sus4,
}

impl ChordType {
    pub const ALL: [ChordType; 5] = [
        ChordType::Major,
        ChordType::Minor,
        ChordType::Dim,
        ChordType::Aug,
        ChordType::Sus4,
    ];

    /// Semitone offsets from the root, lowest first.
    pub fn intervals(self) -> &'static [i32] {
        match self {
            ChordType::Major => &[0, 4, 7],
            ChordType::Minor => &[0, 3, 7],
            ChordType::Dim => &[0, 3, 6],
            ChordType::Aug => &[0, 4, 8],
            ChordType::Sus4 => &[0, 5, 7],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChordType::Major => "Major",
            ChordType::Minor => "Minor",
            ChordType::Dim => "Dim",
            ChordType::Aug => "Aug",
            ChordType::Sus4 => "Sus4",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|chord| chord.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ChordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordSpec {
    pub root: Note,
    pub chord_type: ChordType,
    pub octave_offset: i32,
}

impl ChordSpec {
    pub fn new(root: Note, chord_type: ChordType, octave_offset: i32) -> Self {
        Self {
            root,
            chord_type,
            octave_offset,
        }
    }

    pub fn resolve(&self) -> Vec<Note> {
        resolve(self.root, self.chord_type, self.octave_offset)
    }
}

/// Notes of the chord, in interval-table order.
pub fn resolve(root: Note, chord_type: ChordType, octave_offset: i32) -> Vec<Note> {
    let base = root + octave_offset * 12;
    chord_type.intervals().iter().map(|i| base + i).collect()
}

/// Resolve by chord name. An unrecognized name yields the root alone.
pub fn resolve_named(root: Note, name: &str, octave_offset: i32) -> Vec<Note> {
    match ChordType::from_name(name) {
        Some(chord_type) => resolve(root, chord_type, octave_offset),
        None => vec![root + octave_offset * 12],
    }
}
