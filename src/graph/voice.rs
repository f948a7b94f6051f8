use crate::graph::{
    node::{GraphNode, RenderCtx},
    oscillator::{OscNode, OscillatorTopology},
    param::AudioParam,
};

/// One voice's signal path: oscillator(s) into a private gain.
///
/// ```text
/// [OscNode] ──▶ [× gain(t)] ──▶ effects bus input
/// ```
///
/// The gain starts at 0 so nothing is audible until the envelope schedules
/// its attack.
pub struct VoiceNode {
    source: OscNode,
    gain: AudioParam,
}

impl VoiceNode {
    pub fn new(topology: &OscillatorTopology) -> Self {
        Self {
            source: OscNode::from_topology(topology),
            gain: AudioParam::new(0.0),
        }
    }

    pub fn gain(&self) -> &AudioParam {
        &self.gain
    }

    pub fn gain_mut(&mut self) -> &mut AudioParam {
        &mut self.gain
    }

    pub fn start(&mut self, when: f64) {
        self.source.start(when);
    }

    pub fn stop(&mut self, when: f64) {
        self.source.stop(when);
    }

    /// Forget automation that is already in the past.
    pub fn collapse(&mut self, time: f64) {
        self.gain.collapse(time);
    }
}

impl GraphNode for VoiceNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        for (i, sample) in out.iter_mut().enumerate() {
            *sample *= self.gain.value_at(ctx.frame_time(i));
        }
    }
}
