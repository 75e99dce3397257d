//! Fixed-size real FFT built on `rustfft`.
//!
//! [`FourierTransform`] plans a forward and an inverse transform of size
//! `2^bits` once and keeps its own work buffers, so a transform held by a
//! voice never allocates while rendering.
//!
//! Two views of the same transform are offered:
//!
//! - A packed float layout ([`FourierTransform::transform_real_forward`] /
//!   [`FourierTransform::transform_real_inverse`]): bin `k` occupies
//!   `data[2k]` (real) and `data[2k + 1]` (imaginary) for `k` in
//!   `0..=size/2`. The DC and Nyquist imaginary slots are always zero.
//! - Complex bins ([`FourierTransform::forward_bins`] /
//!   [`FourierTransform::inverse_bins`]) for callers that keep spectra as
//!   [`Complex32`].
//!
//! The forward transform is unnormalised; the inverse scales by `1 / size`
//! so a forward + inverse pair is the identity.

use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};
use std::fmt;
use std::sync::Arc;

/// Real-valued FFT of a fixed power-of-two size.
#[derive(Clone)]
pub struct FourierTransform {
    bits: u32,
    size: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex32>,
    scratch: Vec<Complex32>,
}

impl FourierTransform {
    /// Plan a transform of size `2^bits`.
    ///
    /// # Panics
    /// Panics if `bits` is zero or larger than 24.
    pub fn new(bits: u32) -> Self {
        assert!((1..=24).contains(&bits), "transform bits out of range: {bits}");
        let size = 1usize << bits;
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        Self {
            bits,
            size,
            forward,
            inverse,
            buffer: vec![Complex32::new(0.0, 0.0); size],
            scratch: vec![Complex32::new(0.0, 0.0); scratch_len],
        }
    }

    /// Transform size in samples.
    pub fn size(&self) -> usize {
        self.size
    }

    /// `log2` of the transform size.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Number of complex bins a real transform produces (`size / 2 + 1`).
    pub fn num_bins(&self) -> usize {
        self.size / 2 + 1
    }

    /// Forward transform of `data[..size]` in place, packed layout.
    ///
    /// `data` must hold at least `size + 2` floats.
    pub fn transform_real_forward(&mut self, data: &mut [f32]) {
        assert!(data.len() >= self.size + 2, "packed buffer too short");
        for (bin, &sample) in self.buffer.iter_mut().zip(data.iter()) {
            *bin = Complex32::new(sample, 0.0);
        }
        self.forward
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let half = self.size / 2;
        for (k, bin) in self.buffer[..=half].iter().enumerate() {
            data[2 * k] = bin.re;
            data[2 * k + 1] = bin.im;
        }
        data[1] = 0.0;
        data[self.size + 1] = 0.0;
    }

    /// Inverse of [`transform_real_forward`](Self::transform_real_forward).
    ///
    /// Reads the packed spectrum from `data[..size + 2]`, writes `size` real
    /// samples to `data[..size]` and zeroes everything after them.
    pub fn transform_real_inverse(&mut self, data: &mut [f32]) {
        assert!(data.len() >= self.size + 2, "packed buffer too short");
        let half = self.size / 2;
        self.buffer[0] = Complex32::new(data[0], 0.0);
        for k in 1..half {
            let bin = Complex32::new(data[2 * k], data[2 * k + 1]);
            self.buffer[k] = bin;
            self.buffer[self.size - k] = bin.conj();
        }
        self.buffer[half] = Complex32::new(data[2 * half], 0.0);
        self.inverse
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let scale = 1.0 / self.size as f32;
        for (sample, bin) in data.iter_mut().zip(self.buffer.iter()) {
            *sample = bin.re * scale;
        }
        data[self.size..].fill(0.0);
    }

    /// Forward transform of `input[..size]` into `bins[..=size/2]`.
    pub fn forward_bins(&mut self, input: &[f32], bins: &mut [Complex32]) {
        let half = self.size / 2;
        assert!(bins.len() > half, "bin buffer too short");
        let zero = Complex32::new(0.0, 0.0);
        for (i, bin) in self.buffer.iter_mut().enumerate() {
            *bin = input.get(i).map_or(zero, |&x| Complex32::new(x, 0.0));
        }
        self.forward
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        bins[..=half].copy_from_slice(&self.buffer[..=half]);
        bins[0].im = 0.0;
        bins[half].im = 0.0;
    }

    /// Inverse transform of a half spectrum into `output[..size]`.
    ///
    /// Bins missing from a short `bins` slice are treated as zero. The
    /// imaginary parts of DC and Nyquist have no real-valued counterpart and
    /// are ignored.
    pub fn inverse_bins(&mut self, bins: &[Complex32], output: &mut [f32]) {
        let half = self.size / 2;
        let available = bins.len().min(half + 1);
        self.buffer.fill(Complex32::new(0.0, 0.0));

        if available > 0 {
            self.buffer[0] = Complex32::new(bins[0].re, 0.0);
        }
        for k in 1..available.min(half) {
            self.buffer[k] = bins[k];
            self.buffer[self.size - k] = bins[k].conj();
        }
        if available > half {
            self.buffer[half] = Complex32::new(bins[half].re, 0.0);
        }
        self.inverse
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let scale = 1.0 / self.size as f32;
        for (sample, bin) in output.iter_mut().zip(self.buffer.iter()) {
            *sample = bin.re * scale;
        }
    }
}

impl fmt::Debug for FourierTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FourierTransform")
            .field("bits", &self.bits)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_packed_roundtrip() {
        let mut transform = FourierTransform::new(8);
        let size = transform.size();
        let input: Vec<f32> = (0..size)
            .map(|i| (2.0 * PI * 5.0 * i as f32 / size as f32).sin() + 0.25)
            .collect();

        let mut data = vec![0.0; size * 2];
        data[..size].copy_from_slice(&input);
        transform.transform_real_forward(&mut data);

        assert!((data[0] - 0.25 * size as f32).abs() < 1e-3, "dc = {}", data[0]);
        assert_eq!(data[1], 0.0);
        assert_eq!(data[size + 1], 0.0);

        transform.transform_real_inverse(&mut data);
        for (a, b) in input.iter().zip(data.iter()) {
            assert!((a - b).abs() < 1e-5, "mismatch: {a} vs {b}");
        }
        assert!(data[size..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_sine_lands_in_one_bin() {
        let mut transform = FourierTransform::new(6);
        let size = transform.size();
        let input: Vec<f32> = (0..size)
            .map(|i| (2.0 * PI * 3.0 * i as f32 / size as f32).sin())
            .collect();
        let mut bins = vec![Complex32::new(0.0, 0.0); transform.num_bins()];
        transform.forward_bins(&input, &mut bins);

        // sin(k t) -> -i N/2 at bin k
        assert!((bins[3].im + size as f32 / 2.0).abs() < 1e-3);
        for (k, bin) in bins.iter().enumerate() {
            if k != 3 {
                assert!(bin.norm() < 1e-3, "leak at bin {k}: {}", bin.norm());
            }
        }
    }

    #[test]
    fn test_inverse_bins_short_spectrum() {
        let mut transform = FourierTransform::new(5);
        let size = transform.size();
        let bins = [Complex32::new(0.0, 0.0), Complex32::new(size as f32 / 2.0, 0.0)];
        let mut output = vec![0.0; size];
        transform.inverse_bins(&bins, &mut output);

        for (i, sample) in output.iter().enumerate() {
            let expected = (2.0 * PI * i as f32 / size as f32).cos();
            assert!((sample - expected).abs() < 1e-5);
        }
    }
}
