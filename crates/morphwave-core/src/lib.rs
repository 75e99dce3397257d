//! Morphwave Core - scalar DSP math shared by the wavetable engine
//!
//! This crate holds the small numeric building blocks every other morphwave
//! crate leans on. Everything here is allocation-free and `no_std`
//! compatible so it can run on the audio thread.
//!
//! # Tweening
//!
//! - [`lerp`] - Linear interpolation, exact at both end points
//! - [`cubic_tween`] - Keyframe-aware Catmull-Rom style blend used by
//!   cubic keyframe interpolation
//! - [`cubic_interpolate`] - 4-point read interpolation for wave buffers
//!
//! # Curves
//!
//! - [`power_scale`] - Signed exponential warp used by wave warps, line
//!   segments, comb filters and unison detune spacing
//!
//! # Pitch
//!
//! - [`midi_to_freq`], [`freq_to_midi`], [`cents_to_ratio`],
//!   [`semitones_to_ratio`]
//!
//! # Parameter Smoothing
//!
//! - [`SmoothedParam`] - One-pole smoothing for level, pan and blend controls
//! - [`CrossfadeRamp`] - Fixed-length linear ramp used for click-free buffer
//!   swaps
//!
//! # no_std Support
//!
//! Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! morphwave-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod math;
pub mod param;

pub use math::{
    POWER_SCALE_EPSILON, amplitude_to_gain, cents_to_ratio, constant_power_pan, cubic_interpolate,
    cubic_tween, equal_power_fade, freq_to_midi, lerp, midi_to_freq, power_scale, semitones_to_ratio,
    wrap_unit,
};
pub use param::{CrossfadeRamp, SmoothedParam};
