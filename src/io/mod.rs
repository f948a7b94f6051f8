// Purpose - external interfaces: MIDI devices and note routing

pub mod device;
pub mod midi;
pub mod mock;
pub mod router;

pub use device::{list_outputs, probe_first_output, MidiSink, MidirSink};
pub use midi::MidiEvent;
pub use mock::MockSink;
pub use router::{NoteOutput, OutputMode, OutputRouter};
