//! External MIDI output.
//!
//! The instrument only ever needs to *send*, so a device is anything that
//! accepts raw message bytes. `MidirSink` is the real implementation on top of
//! the system MIDI stack; tests use `io::mock::MockSink`.

use std::fmt;

use midir::{MidiOutput, MidiOutputConnection};
use tracing::{debug, info};

use crate::error::{Result, SynthError};

pub trait MidiSink: Send {
    fn name(&self) -> &str;

    fn send(&mut self, message: &[u8]) -> Result<()>;
}

/// An open connection to a system MIDI output port.
pub struct MidirSink {
    name: String,
    connection: MidiOutputConnection,
}

impl MidiSink for MidirSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn send(&mut self, message: &[u8]) -> Result<()> {
        self.connection
            .send(message)
            .map_err(|e| SynthError::DeviceUnavailable(format!("{}: {}", self.name, e)))
    }
}

impl fmt::Debug for MidirSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MidirSink").field("name", &self.name).finish()
    }
}

/// Names of every MIDI output the system currently exposes.
pub fn list_outputs(client_name: &str) -> Result<Vec<String>> {
    let output = MidiOutput::new(client_name).map_err(unavailable)?;
    output
        .ports()
        .iter()
        .map(|port| output.port_name(port).map_err(unavailable))
        .collect()
}

/// Connect to the first MIDI output, if there is one.
///
/// `Ok(None)` is the ordinary "no device plugged in" answer. `Err` means the
/// MIDI subsystem itself could not be queried.
pub fn probe_first_output(client_name: &str) -> Result<Option<MidirSink>> {
    let output = MidiOutput::new(client_name).map_err(unavailable)?;
    let ports = output.ports();
    debug!(count = ports.len(), "probed MIDI outputs");

    let Some(port) = ports.first() else {
        return Ok(None);
    };

    let name = output.port_name(port).map_err(unavailable)?;
    let connection = output
        .connect(port, client_name)
        .map_err(|e| SynthError::DeviceUnavailable(format!("{name}: {e}")))?;

    info!(device = %name, "connected to MIDI output");
    Ok(Some(MidirSink { name, connection }))
}

fn unavailable<E: fmt::Display>(e: E) -> SynthError {
    SynthError::DeviceUnavailable(e.to_string())
}
