use crate::dsp::oscillator::{OscillatorBlock, OscillatorWaveform};
use crate::graph::node::{GraphNode, RenderCtx};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Scheduled Oscillator
====================

An `OscNode` is a sound source with a lifetime on the audio clock. It is
silent until its start time, runs until its stop time, and is silent after.
Both are sample accurate: a stop at t = 1.2345 s cuts at the first frame at or
after that instant.

Two shapes are supported, described by `OscillatorTopology`:

Simple:  one oscillator at a (detuned) frequency.

    [osc: waveform @ f · 2^(cents/1200)] ──▶ out

FM:      a sine modulator whose output is ADDED to the carrier's frequency.

    [mod: sine @ mod_freq] ──▶ (× mod_depth) ──▶ (+ carrier_freq) ──▶ [carrier: sine] ──▶ out

With mod_freq = 1.5·f and mod_depth = 2·f the carrier's instantaneous
frequency swings between -f and 3f. The 3:2 ratio gives a bell-like,
slightly inharmonic spectrum. This is frequency modulation, not mixing:
the modulator is never heard directly.
*/

/// What to build for one voice. Pure description; `OscNode` instantiates it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OscillatorTopology {
    Simple {
        waveform: OscillatorWaveform,
        frequency: f32,
        detune_cents: f32,
    },
    Fm {
        carrier_freq: f32,
        mod_freq: f32,
        mod_depth: f32,
    },
}

impl OscillatorTopology {
    pub fn simple(waveform: OscillatorWaveform, frequency: f32) -> Self {
        OscillatorTopology::Simple {
            waveform,
            frequency,
            detune_cents: 0.0,
        }
    }

    pub fn fm(frequency: f32) -> Self {
        OscillatorTopology::Fm {
            carrier_freq: frequency,
            mod_freq: frequency * 1.5,
            mod_depth: frequency * 2.0,
        }
    }

    /// Frequency the listener perceives as the pitch.
    pub fn fundamental(&self) -> f32 {
        match *self {
            OscillatorTopology::Simple { frequency, .. } => frequency,
            OscillatorTopology::Fm { carrier_freq, .. } => carrier_freq,
        }
    }
}

struct Modulator {
    osc: OscillatorBlock,
    frequency: f32,
    depth: f32,
}

pub struct OscNode {
    carrier: OscillatorBlock,
    frequency: f32,
    modulator: Option<Modulator>,
    start_time: Option<f64>,
    stop_time: Option<f64>,
}

impl OscNode {
    pub fn from_topology(topology: &OscillatorTopology) -> Self {
        match *topology {
            OscillatorTopology::Simple {
                waveform,
                frequency,
                detune_cents,
            } => Self {
                carrier: OscillatorBlock::new(waveform),
                frequency: frequency * 2.0_f32.powf(detune_cents / 1200.0),
                modulator: None,
                start_time: None,
                stop_time: None,
            },
            OscillatorTopology::Fm {
                carrier_freq,
                mod_freq,
                mod_depth,
            } => Self {
                carrier: OscillatorBlock::sine(),
                frequency: carrier_freq,
                modulator: Some(Modulator {
                    osc: OscillatorBlock::sine(),
                    frequency: mod_freq,
                    depth: mod_depth,
                }),
                start_time: None,
                stop_time: None,
            },
        }
    }

    /// Effective carrier frequency before modulation (detune applied).
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn start(&mut self, when: f64) {
        self.start_time = Some(when);
    }

    /// Schedule the stop. A later call replaces an earlier one.
    pub fn stop(&mut self, when: f64) {
        self.stop_time = Some(when);
    }

    pub fn stop_time(&self) -> Option<f64> {
        self.stop_time
    }

    #[inline]
    fn is_sounding(&self, t: f64) -> bool {
        match self.start_time {
            Some(start) if t >= start => self.stop_time.map_or(true, |stop| t < stop),
            _ => false,
        }
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for (i, sample) in out.iter_mut().enumerate() {
            if !self.is_sounding(ctx.frame_time(i)) {
                *sample = 0.0;
                continue;
            }

            let frequency = match &mut self.modulator {
                Some(m) => self.frequency + m.osc.next_sample(m.frequency, ctx.sample_rate) * m.depth,
                None => self.frequency,
            };
            *sample = self.carrier.next_sample(frequency, ctx.sample_rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 1_000.0;

    fn render(node: &mut OscNode, time: f64, frames: usize) -> Vec<f32> {
        let mut out = vec![1.0f32; frames];
        node.render_block(&mut out, &RenderCtx::new(SR, time));
        out
    }

    #[test]
    fn fm_topology_ratios() {
        let topology = OscillatorTopology::fm(200.0);
        assert_eq!(
            topology,
            OscillatorTopology::Fm {
                carrier_freq: 200.0,
                mod_freq: 300.0,
                mod_depth: 400.0
            }
        );
        assert_eq!(topology.fundamental(), 200.0);
    }

    #[test]
    fn silent_until_started() {
        let mut node = OscNode::from_topology(&OscillatorTopology::simple(
            OscillatorWaveform::Square,
            100.0,
        ));
        assert!(render(&mut node, 0.0, 16).iter().all(|&s| s == 0.0));

        node.start(0.01); // frame 10
        let out = render(&mut node, 0.0, 16);
        assert!(out[..10].iter().all(|&s| s == 0.0));
        assert!(out[10..].iter().any(|&s| s != 0.0));
    }

    #[test]
    fn stop_is_sample_accurate() {
        let mut node = OscNode::from_topology(&OscillatorTopology::simple(
            OscillatorWaveform::Triangle,
            10.0,
        ));
        node.start(0.0);
        node.stop(0.005);
        let out = render(&mut node, 0.0, 10);
        assert!(out[..5].iter().all(|&s| s != 0.0));
        assert!(out[5..].iter().all(|&s| s == 0.0));
        assert_eq!(node.stop_time(), Some(0.005));
    }

    #[test]
    fn detune_shifts_frequency() {
        let node = OscNode::from_topology(&OscillatorTopology::Simple {
            waveform: OscillatorWaveform::Saw,
            frequency: 440.0,
            detune_cents: 1200.0,
        });
        assert!((node.frequency() - 880.0).abs() < 1e-3);
    }

    #[test]
    fn fm_differs_from_plain_sine() {
        let mut plain = OscNode::from_topology(&OscillatorTopology::simple(
            OscillatorWaveform::Sine,
            50.0,
        ));
        let mut fm = OscNode::from_topology(&OscillatorTopology::fm(50.0));
        plain.start(0.0);
        fm.start(0.0);

        let a = render(&mut plain, 0.0, 100);
        let b = render(&mut fm, 0.0, 100);
        assert!(b.iter().all(|s| s.abs() <= 1.0 + 1e-6));
        let difference: f32 = a.iter().zip(&b).map(|(x, y)| (x - y).abs()).sum();
        assert!(difference > 1.0, "modulator should bend the carrier");
    }
}
