/// Context passed to graph nodes during rendering
///
/// Contains information about the block being rendered:
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - time: Audio-clock time of the block's first frame, in seconds
pub struct RenderCtx {
    pub sample_rate: f32,
    pub time: f64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32, time: f64) -> Self {
        Self { sample_rate, time }
    }

    /// Clock time of frame `index` within the block.
    #[inline]
    pub fn frame_time(&self, index: usize) -> f64 {
        self.time + index as f64 / self.sample_rate as f64
    }
}

/// Core trait for audio processing graph nodes
///
/// Nodes render blocks against the audio clock. Anything time dependent
/// (start, stop, automation) is looked up from `ctx.time`, never from a wall
/// clock.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);
}
