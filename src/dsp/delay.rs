/// Circular delay line with its output fed back into its input.
///
/// ```text
/// x[n] ──▶ (+) ──▶ [z^-D] ──┬──▶ y[n]
///           ▲               │
///           └── feedback ◀──┘
/// ```
///
/// Each pass through the loop scales the repeat by `feedback`, so with 0.5
/// the echoes fall by about 6 dB apiece. The buffer is allocated once at
/// construction and sized from the longest delay the line will ever need.
pub struct FeedbackDelay {
    buffer: Vec<f32>,
    write_pos: usize,
    delay_samples: usize,
    feedback: f32,
}

impl FeedbackDelay {
    pub fn new(delay_seconds: f32, feedback: f32, sample_rate: f32) -> Self {
        let delay_samples = ((delay_seconds * sample_rate).round() as usize).max(1);
        Self {
            buffer: vec![0.0; delay_samples],
            write_pos: 0,
            delay_samples,
            feedback: feedback.clamp(0.0, 0.99),
        }
    }

    pub fn delay_samples(&self) -> usize {
        self.delay_samples
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Push one input sample, return the delayed (wet) sample.
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        // The buffer is exactly one delay long, so the slot we are about to
        // overwrite holds the sample from D frames ago.
        let delayed = self.buffer[self.write_pos];
        self.buffer[self.write_pos] = sample + delayed * self.feedback;
        self.write_pos += 1;
        if self.write_pos == self.delay_samples {
            self.write_pos = 0;
        }
        delayed
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
