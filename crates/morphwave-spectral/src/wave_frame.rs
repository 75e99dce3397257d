//! Single-cycle waveform held in both the time and frequency domain.

use crate::fft::FourierTransform;
use rustfft::num_complex::Complex32;
use std::cell::RefCell;

/// `log2` of [`WAVEFORM_SIZE`].
pub const WAVEFORM_BITS: u32 = 11;
/// Samples in one wave frame.
pub const WAVEFORM_SIZE: usize = 1 << WAVEFORM_BITS;
/// Complex bins in a wave frame spectrum, DC through Nyquist.
pub const NUM_REAL_COMPLEX: usize = WAVEFORM_SIZE / 2 + 1;
/// Frequency ratio a freshly cleared frame reports.
pub const DEFAULT_FREQUENCY_RATIO: f32 = 1.0;
/// Sample rate a freshly cleared frame reports.
pub const DEFAULT_SAMPLE_RATE: f32 = 44100.0;

const NORMALIZE_FLOOR: f32 = 1.0;
const NORMALIZE_GAIN_FLOOR: f32 = 1e-7;

thread_local! {
    static FRAME_TRANSFORM: RefCell<FourierTransform> =
        RefCell::new(FourierTransform::new(WAVEFORM_BITS));
}

/// One wave cycle: `time_domain` samples plus their `frequency_domain` bins.
///
/// The two domains agree only right after [`to_frequency_domain`] or
/// [`to_time_domain`]. Editing one leaves the other stale until the next
/// conversion; components document which domain they read and write.
///
/// [`to_frequency_domain`]: WaveFrame::to_frequency_domain
/// [`to_time_domain`]: WaveFrame::to_time_domain
#[derive(Debug, Clone, PartialEq)]
pub struct WaveFrame {
    /// Position in the wavetable this frame was rendered for.
    pub index: i32,
    /// Playback frequency relative to the table's base pitch.
    pub frequency_ratio: f32,
    /// Sample rate of the audio this frame was cut from.
    pub sample_rate: f32,
    /// `WAVEFORM_SIZE` samples.
    pub time_domain: Vec<f32>,
    /// `NUM_REAL_COMPLEX` bins, unnormalised.
    pub frequency_domain: Vec<Complex32>,
}

impl WaveFrame {
    /// A silent frame.
    pub fn new() -> Self {
        Self {
            index: 0,
            frequency_ratio: DEFAULT_FREQUENCY_RATIO,
            sample_rate: DEFAULT_SAMPLE_RATE,
            time_domain: vec![0.0; WAVEFORM_SIZE],
            frequency_domain: vec![Complex32::new(0.0, 0.0); NUM_REAL_COMPLEX],
        }
    }

    /// Build a frame from time-domain samples and sync its spectrum.
    ///
    /// Short input is zero-padded; long input is truncated.
    pub fn from_time_domain(samples: &[f32]) -> Self {
        let mut frame = Self::new();
        let len = samples.len().min(WAVEFORM_SIZE);
        frame.time_domain[..len].copy_from_slice(&samples[..len]);
        frame.to_frequency_domain();
        frame
    }

    /// Zero both domains and restore the default ratio and sample rate.
    pub fn clear(&mut self) {
        self.index = 0;
        self.frequency_ratio = DEFAULT_FREQUENCY_RATIO;
        self.sample_rate = DEFAULT_SAMPLE_RATE;
        self.time_domain.fill(0.0);
        self.frequency_domain.fill(Complex32::new(0.0, 0.0));
    }

    /// Recompute `frequency_domain` from `time_domain`.
    pub fn to_frequency_domain(&mut self) {
        FRAME_TRANSFORM.with_borrow_mut(|transform| {
            transform.forward_bins(&self.time_domain, &mut self.frequency_domain);
        });
    }

    /// Recompute `time_domain` from `frequency_domain`.
    pub fn to_time_domain(&mut self) {
        FRAME_TRANSFORM.with_borrow_mut(|transform| {
            transform.inverse_bins(&self.frequency_domain, &mut self.time_domain);
        });
    }

    /// Scale `time_domain` so its peak magnitude is 1.
    ///
    /// Without `allow_positive_gain` only frames peaking above 1 are
    /// touched. With it, any frame louder than `1e-7` is brought up to 1.
    /// Quieter frames are left alone. The spectrum is not updated.
    pub fn normalize(&mut self, allow_positive_gain: bool) {
        let floor = if allow_positive_gain {
            NORMALIZE_GAIN_FLOOR
        } else {
            NORMALIZE_FLOOR
        };
        let peak = self.max_zero_offset();
        if peak < floor {
            return;
        }
        for sample in &mut self.time_domain {
            *sample /= peak;
        }
    }

    /// Remove the DC offset from the time domain and zero the DC bin.
    ///
    /// Reads the offset from `frequency_domain[0]`, so the spectrum must be
    /// current.
    pub fn removed_dc(&mut self) {
        let offset = self.frequency_domain[0].re / WAVEFORM_SIZE as f32;
        for sample in &mut self.time_domain {
            *sample -= offset;
        }
        self.frequency_domain[0] = Complex32::new(0.0, 0.0);
    }

    /// Add another frame into this one, both domains.
    pub fn add_from(&mut self, other: &WaveFrame) {
        for (a, b) in self.time_domain.iter_mut().zip(&other.time_domain) {
            *a += b;
        }
        for (a, b) in self.frequency_domain.iter_mut().zip(&other.frequency_domain) {
            *a += b;
        }
    }

    /// Copy both domains, ratio and sample rate from `other`.
    ///
    /// The frame's `index` is kept.
    pub fn copy_from(&mut self, other: &WaveFrame) {
        self.frequency_ratio = other.frequency_ratio;
        self.sample_rate = other.sample_rate;
        self.time_domain.copy_from_slice(&other.time_domain);
        self.frequency_domain.copy_from_slice(&other.frequency_domain);
    }

    /// Scale both domains.
    pub fn multiply(&mut self, value: f32) {
        for sample in &mut self.time_domain {
            *sample *= value;
        }
        for bin in &mut self.frequency_domain {
            *bin *= value;
        }
    }

    /// Largest absolute time-domain sample.
    pub fn max_zero_offset(&self) -> f32 {
        self.time_domain
            .iter()
            .fold(0.0f32, |peak, sample| peak.max(sample.abs()))
    }

    /// `(min, max)` of the time domain.
    pub fn min_max(&self) -> (f32, f32) {
        self.time_domain
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &s| (lo.min(s), hi.max(s)))
    }

    /// Peak-to-peak span of the time domain.
    pub fn peak_to_peak(&self) -> f32 {
        let (lo, hi) = self.min_max();
        hi - lo
    }

    /// Set the playback frequency ratio.
    pub fn set_frequency_ratio(&mut self, ratio: f32) {
        self.frequency_ratio = ratio;
    }

    /// Set the source sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }
}

impl Default for WaveFrame {
    fn default() -> Self {
        Self::new()
    }
}
