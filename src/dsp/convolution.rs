//! Partitioned FFT convolution.
//!
//! Convolving with a two second impulse response directly costs ~100k
//! multiplies per output sample. Instead the impulse response is cut into
//! equal partitions of `B` samples and each partition is pre-transformed once.
//! Every `B` input samples we:
//!
//! ```text
//! 1. FFT the last 2B input samples (previous block + current block)
//! 2. push that spectrum into a frequency-domain delay line (FDL)
//! 3. Y = Σ FDL[p] · H[p]            (one complex multiply-add per bin)
//! 4. IFFT Y, keep the second half    (overlap-save discards wrapped samples)
//! ```
//!
//! Output is released one block later than its input arrived, so the
//! convolver adds exactly `B` samples of latency.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

pub struct Convolver {
    block_size: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    partitions: Vec<Vec<Complex<f32>>>,
    fdl: Vec<Vec<Complex<f32>>>,
    fdl_pos: usize,
    input: Vec<f32>,
    fill: usize,
    output: Vec<f32>,
    spectrum: Vec<Complex<f32>>,
    accum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl Convolver {
    pub fn new(impulse_response: &[f32], block_size: usize) -> Self {
        let block_size = block_size.max(1);
        let fft_len = block_size * 2;

        let mut planner = FftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(fft_len);
        let inverse = planner.plan_fft_inverse(fft_len);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());
        let mut scratch = vec![Complex::default(); scratch_len];

        let partitions: Vec<Vec<Complex<f32>>> = impulse_response
            .chunks(block_size)
            .map(|chunk| {
                let mut bins = vec![Complex::default(); fft_len];
                for (bin, &tap) in bins.iter_mut().zip(chunk) {
                    bin.re = tap;
                }
                forward.process_with_scratch(&mut bins, &mut scratch);
                bins
            })
            .collect();

        let fdl = vec![vec![Complex::default(); fft_len]; partitions.len()];

        Self {
            block_size,
            forward,
            inverse,
            partitions,
            fdl,
            fdl_pos: 0,
            input: vec![0.0; fft_len],
            fill: 0,
            output: vec![0.0; block_size],
            spectrum: vec![Complex::default(); fft_len],
            accum: vec![Complex::default(); fft_len],
            scratch,
        }
    }

    /// Samples of delay between input and the start of the response.
    pub fn latency(&self) -> usize {
        self.block_size
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let out = self.output[self.fill];
        self.input[self.block_size + self.fill] = sample;
        self.fill += 1;
        if self.fill == self.block_size {
            self.convolve_block();
            self.fill = 0;
        }
        out
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    fn convolve_block(&mut self) {
        let block = self.block_size;

        if self.partitions.is_empty() {
            self.output.fill(0.0);
        } else {
            for (bin, &x) in self.spectrum.iter_mut().zip(&self.input) {
                *bin = Complex::new(x, 0.0);
            }
            self.forward
                .process_with_scratch(&mut self.spectrum, &mut self.scratch);
            self.fdl[self.fdl_pos].copy_from_slice(&self.spectrum);

            self.accum.fill(Complex::default());
            let count = self.partitions.len();
            for (p, partition) in self.partitions.iter().enumerate() {
                let slot = &self.fdl[(self.fdl_pos + count - p) % count];
                for ((acc, x), h) in self.accum.iter_mut().zip(slot).zip(partition) {
                    *acc += x * h;
                }
            }
            self.fdl_pos = (self.fdl_pos + 1) % count;

            self.inverse
                .process_with_scratch(&mut self.accum, &mut self.scratch);
            let norm = 1.0 / (2 * block) as f32;
            for (out, bin) in self.output.iter_mut().zip(&self.accum[block..]) {
                *out = bin.re * norm;
            }
        }

        self.input.copy_within(block.., 0);
    }
}
