use std::sync::{Arc, Mutex};

use crate::error::{Result, SynthError};

use super::device::MidiSink;

/// A MIDI sink that records every message instead of sending it.
///
/// Clones share the same log, so a test can hand one clone to the router and
/// inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MockSink {
    name: String,
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
    fail: bool,
}

impl MockSink {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// A sink whose every send fails, as an unplugged device would.
    pub fn failing(name: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(name)
        }
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn clear(&self) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.clear();
        }
    }
}

impl MidiSink for MockSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn send(&mut self, message: &[u8]) -> Result<()> {
        if self.fail {
            return Err(SynthError::DeviceUnavailable(format!("{} is unplugged", self.name)));
        }
        let mut sent = self
            .sent
            .lock()
            .map_err(|e| SynthError::DeviceUnavailable(e.to_string()))?;
        sent.push(message.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_log() {
        let observer = MockSink::new("mock");
        let mut sink = observer.clone();
        sink.send(&[0x90, 60, 100]).expect("send");
        sink.send(&[0x80, 60, 0]).expect("send");
        assert_eq!(observer.sent(), vec![vec![0x90, 60, 100], vec![0x80, 60, 0]]);

        observer.clear();
        assert!(observer.sent().is_empty());
    }

    #[test]
    fn failing_sink_reports_unavailable() {
        let mut sink = MockSink::failing("gone");
        let err = sink.send(&[0x90, 60, 100]).unwrap_err();
        assert!(matches!(err, SynthError::DeviceUnavailable(_)));
        assert!(sink.sent().is_empty());
    }
}
