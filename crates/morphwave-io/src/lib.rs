//! WAV file I/O for morphwave.
//!
//! Audio comes in through [`read_wav`] (mixed to mono for wavetable import
//! and pitch detection) and leaves through [`write_wav`] and
//! [`write_wav_stereo`] (rendered tables and oscillator output).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use morphwave_io::{read_wav, write_wav, WavSpec};
//!
//! let (samples, spec) = read_wav("voice.wav")?;
//! println!("{} samples at {} Hz", samples.len(), spec.sample_rate);
//!
//! write_wav("copy.wav", &samples, WavSpec::mono(spec.sample_rate).with_bits(16))?;
//! # Ok::<(), morphwave_io::Error>(())
//! ```

mod wav;

pub use wav::{
    StereoSamples, WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, read_wav_stereo, write_wav,
    write_wav_stereo,
};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
