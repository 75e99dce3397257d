//! Morphwave Synth - real-time playback of rendered wavetables
//!
//! This crate turns [`WavetableData`](morphwave_wavetable::WavetableData)
//! snapshots into audio.
//!
//! # Core Components
//!
//! ## Oscillator
//!
//! - [`SynthOscillator`] - Unison wavetable oscillator with spectral morphing,
//!   phase distortion, stereo spread and levelling
//! - [`OscillatorSettings`] - Every oscillator parameter, serde-ready for presets
//! - [`OscillatorOutput`] - The raw and levelled stereo buses
//!
//! ## Spectral Morphs
//!
//! Frequency-domain transforms applied to a frame before playback:
//!
//! - [`SpectralMorph`] - Morph selector with its amount remapping
//! - [`SpectralMorpher`] - Runs a kernel and loads the result into a [`WaveBuffer`]
//! - [`RandomValues`] - Seeded per-harmonic gains for the random-amplitude morph
//!
//! ## Voice Shaping
//!
//! - [`DistortionType`] - Per-sample phase remaps and windows
//! - [`StackStyle`] - Unison frequency multiplier tables
//! - [`TransposeQuantizer`] - Snap transpose to a set of pitch classes
//!
//! # Example
//!
//! ```rust
//! use morphwave_synth::{OscillatorOutput, OscillatorSettings, SpectralMorph, SynthOscillator};
//! use morphwave_wavetable::{Wavetable, WavetableCreator};
//!
//! let mut creator = WavetableCreator::new();
//! creator.init_predefined_waves();
//! let mut table = Wavetable::new(1);
//! creator.render(&mut table);
//! table.publish();
//! let reader = table.reader();
//!
//! let mut osc = SynthOscillator::new(48000.0);
//! osc.set_settings(&OscillatorSettings {
//!     unison_voices: 5,
//!     wave_frame: 0.5,
//!     spectral_morph: SpectralMorph::Vocode,
//!     spectral_morph_amount: 0.3,
//!     ..Default::default()
//! });
//!
//! let mut out = OscillatorOutput::new(512);
//! osc.reset(0);
//! osc.process(&reader.mark_used(), 57.0, None, &mut out);
//! ```

pub mod distortion;
pub mod morph;
pub mod oscillator;
pub mod quantize;
pub mod random_values;
pub mod settings;
pub mod unison;
pub mod wave_buffer;

pub use distortion::DistortionType;
pub use morph::{MAX_HARMONIC, MorphKernel, SpectralMorph, SpectralMorpher};
pub use oscillator::{CROSSFADE_MS, OscillatorOutput, StereoBuffer, SynthOscillator};
pub use quantize::TransposeQuantizer;
pub use random_values::{NUM_RANDOM_STAGES, RandomValues};
pub use settings::OscillatorSettings;
pub use unison::{MAX_UNISON, StackStyle};
pub use wave_buffer::WaveBuffer;
