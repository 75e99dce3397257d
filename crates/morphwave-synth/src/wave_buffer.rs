//! Guard-padded single-cycle buffers for cubic playback reads.

use morphwave_core::cubic_interpolate;
use morphwave_spectral::{Complex32, FourierTransform, WAVEFORM_SIZE};

/// Guard samples before the cycle.
pub const HEAD_GUARD: usize = 1;
/// Guard samples after the cycle.
pub const TAIL_GUARD: usize = 2;
/// Total buffer length.
pub const WAVE_BUFFER_SIZE: usize = WAVEFORM_SIZE + HEAD_GUARD + TAIL_GUARD;

/// One playback cycle with wrapped guard samples on both ends.
///
/// Layout: `[w[N-1], w[0], ..., w[N-1], w[0], w[1]]`, so a cubic read at any
/// phase in `[0, 1)` finds its four neighbours without wrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveBuffer {
    samples: Vec<f32>,
}

impl WaveBuffer {
    /// A silent buffer.
    pub fn new() -> Self {
        Self {
            samples: vec![0.0; WAVE_BUFFER_SIZE],
        }
    }

    /// A buffer holding `cycle` (`WAVEFORM_SIZE` samples).
    pub fn from_cycle(cycle: &[f32]) -> Self {
        let mut buffer = Self::new();
        buffer.load_cycle(cycle);
        buffer
    }

    /// Replace the cycle and refresh the guards.
    pub fn load_cycle(&mut self, cycle: &[f32]) {
        let body = &mut self.samples[HEAD_GUARD..HEAD_GUARD + WAVEFORM_SIZE];
        let count = cycle.len().min(WAVEFORM_SIZE);
        body[..count].copy_from_slice(&cycle[..count]);
        body[count..].fill(0.0);
        self.wrap();
    }

    /// Inverse-transform `spectrum` into the cycle and refresh the guards.
    pub fn load_spectrum(&mut self, transform: &mut FourierTransform, spectrum: &[Complex32]) {
        transform.inverse_bins(
            spectrum,
            &mut self.samples[HEAD_GUARD..HEAD_GUARD + WAVEFORM_SIZE],
        );
        self.wrap();
    }

    fn wrap(&mut self) {
        let n = WAVEFORM_SIZE;
        self.samples[0] = self.samples[n];
        self.samples[n + 1] = self.samples[1];
        self.samples[n + 2] = self.samples[2];
    }

    /// The cycle without guards.
    pub fn cycle(&self) -> &[f32] {
        &self.samples[HEAD_GUARD..HEAD_GUARD + WAVEFORM_SIZE]
    }

    /// Cubic read at `phase` in `[0, 1)`.
    #[inline]
    pub fn read(&self, phase: f32) -> f32 {
        let position = phase * WAVEFORM_SIZE as f32;
        let index = (position as usize).min(WAVEFORM_SIZE - 1);
        let t = position - index as f32;
        cubic_interpolate(
            self.samples[index],
            self.samples[index + 1],
            self.samples[index + 2],
            self.samples[index + 3],
            t,
        )
    }

    /// Silence the buffer.
    pub fn clear(&mut self) {
        self.samples.fill(0.0);
    }
}

impl Default for WaveBuffer {
    fn default() -> Self {
        Self::new()
    }
}
