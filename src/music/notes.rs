/*
Note Numbers and Tuning
=======================

Notes are plain integers on the MIDI scale: middle C (C4) is 60 and the A above
it (A4) is 69. Integers outside 0..=127 are still valid pitches for the
internal synthesizer; only the MIDI output path has to reject them.

Equal temperament divides the octave into 12 identical frequency ratios:

    frequency(n) = reference_freq * 2^((n - reference_note) / 12)

With the standard reference (440 Hz at note 69):

    note   name   frequency
    57     A3     220.00 Hz
    60     C4     261.63 Hz
    69     A4     440.00 Hz
    81     A5     880.00 Hz

Every 12 semitones doubles the frequency, so an octave offset is just ±12.
*/

/// Equal-tempered pitch number (MIDI numbering).
pub type Note = i32;

pub const C4: Note = 60;
pub const A4: Note = 69;

const NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Reference pitch for converting notes to frequencies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub reference_freq: f32,
    pub reference_note: Note,
}

impl Tuning {
    pub fn new(reference_freq: f32, reference_note: Note) -> Self {
        Self {
            reference_freq,
            reference_note,
        }
    }

    #[inline]
    pub fn frequency(&self, note: Note) -> f32 {
        let semitones = (note - self.reference_note) as f32;
        self.reference_freq * 2.0_f32.powf(semitones / 12.0)
    }
}

impl Default for Tuning {
    /// A4 = 440 Hz.
    fn default() -> Self {
        Self::new(440.0, A4)
    }
}

/// Convert a note to Hz against the standard 440 Hz reference.
#[inline]
pub fn midi_note_to_freq(note: Note) -> f32 {
    Tuning::default().frequency(note)
}

/// Display name, e.g. `60` → `"C4"`, `61` → `"C#4"`.
pub fn note_name(note: Note) -> String {
    let octave = note.div_euclid(12) - 1;
    let name = NAMES[note.rem_euclid(12) as usize];
    format!("{name}{octave}")
}
