//! cpal output stream driving the instrument.

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::Producer;
use tracing::{error, info};

use chordpad::{Instrument, SynthError, MAX_BLOCK_SIZE};

/// The default output device and the config we will open it with.
pub struct AudioOutput {
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,
}

impl AudioOutput {
    pub fn open_default() -> Result<Self, SynthError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| SynthError::BackendInitFailure("no default output device".to_string()))?;
        let config = device
            .default_output_config()
            .map_err(|e| SynthError::BackendInitFailure(format!("no output config: {e}")))?;

        info!(
            device = %device.name().unwrap_or_else(|_| "unknown".to_string()),
            sample_rate = config.sample_rate().0,
            channels = config.channels(),
            "audio output selected"
        );
        Ok(Self { device, config })
    }

    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate().0 as f32
    }

    /// Build and start the stream. Every callback renders the instrument in
    /// stereo, writes it interleaved, and feeds a mono copy to the scope.
    pub fn start(
        self,
        instrument: Arc<Mutex<Instrument>>,
        mut scope_tx: Producer<f32>,
    ) -> Result<cpal::Stream, SynthError> {
        let channels = self.config.channels() as usize;
        let mut left = vec![0.0f32; MAX_BLOCK_SIZE];
        let mut right = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = self
            .device
            .build_output_stream(
                &self.config.into(),
                move |data: &mut [f32], _| {
                    let Ok(mut instrument) = instrument.lock() else {
                        data.fill(0.0);
                        return;
                    };

                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;

                    while frames_written < total_frames {
                        let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                        let (l, r) = (&mut left[..frames], &mut right[..frames]);
                        instrument.render(l, r);

                        let out = &mut data[frames_written * channels..(frames_written + frames) * channels];
                        for (frame, (&ls, &rs)) in out.chunks_mut(channels).zip(l.iter().zip(r.iter())) {
                            write_frame(frame, ls, rs);
                            // Scope is best effort; a full ring just drops samples.
                            let _ = scope_tx.push(0.5 * (ls + rs));
                        }

                        frames_written += frames;
                    }
                },
                |err| error!(%err, "audio stream error"),
                None,
            )
            .map_err(|e| SynthError::BackendInitFailure(format!("failed to build stream: {e}")))?;

        stream
            .play()
            .map_err(|e| SynthError::BackendInitFailure(format!("failed to start stream: {e}")))?;
        Ok(stream)
    }
}

/// Stereo into however many channels the device has.
fn write_frame(frame: &mut [f32], left: f32, right: f32) {
    match frame {
        [mono] => *mono = 0.5 * (left + right),
        [l, r, rest @ ..] => {
            *l = left;
            *r = right;
            rest.fill(0.0);
        }
        [] => {}
    }
}
