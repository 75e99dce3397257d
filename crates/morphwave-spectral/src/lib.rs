//! Morphwave Spectral - wave frames and the transforms around them
//!
//! Every stage of the wavetable pipeline passes single-cycle waveforms around
//! as [`WaveFrame`]s: a 2048-sample time-domain buffer paired with its 1025-bin
//! spectrum. This crate owns that type and the pieces it needs:
//!
//! - [`fft`] - [`FourierTransform`], a fixed-size real FFT with a packed
//!   layout and complex-bin helpers
//! - [`wave_frame`] - [`WaveFrame`] with domain conversion, normalisation,
//!   DC removal and additive combination
//! - [`predefined`] - [`PredefinedWaveFrames`], the six canonical shapes built
//!   once per process
//! - [`pitch`] - Period detection for sampled audio
//!
//! ## Example
//!
//! ```rust
//! use morphwave_spectral::{PredefinedWaveFrames, Shape, WaveFrame};
//!
//! let mut frame = WaveFrame::new();
//! frame.copy_from(PredefinedWaveFrames::get(Shape::Saw));
//! frame.to_frequency_domain();
//! assert!(frame.frequency_domain[1].norm() > frame.frequency_domain[2].norm());
//! ```

pub mod fft;
pub mod pitch;
pub mod predefined;
pub mod wave_frame;

pub use fft::FourierTransform;
pub use pitch::{DEFAULT_MAX_PERIOD, MIN_PERIOD, detect_period};
pub use predefined::{PredefinedWaveFrames, Shape};
pub use rustfft::num_complex::Complex32;
pub use wave_frame::{
    DEFAULT_FREQUENCY_RATIO, DEFAULT_SAMPLE_RATE, NUM_REAL_COMPLEX, WAVEFORM_BITS, WAVEFORM_SIZE,
    WaveFrame,
};
