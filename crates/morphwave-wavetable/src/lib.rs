//! Morphwave Wavetable - keyframed components rendered into playable tables
//!
//! A wavetable is up to 257 single-cycle frames. This crate builds them from
//! editable descriptions and hands finished tables to playback without
//! blocking it:
//!
//! - [`keyframe`] - [`KeyframeTrack`], positions plus the linear, cubic and
//!   hold blends shared by every component
//! - [`component`] - the ten sources and modifiers, behind the [`Component`]
//!   trait and the [`WavetableComponent`] enum
//! - [`group`] - [`WavetableGroup`], one ordered chain of components
//! - [`creator`] - [`WavetableCreator`], groups averaged and written frame by
//!   frame into a table, plus audio import
//! - [`storage`] - [`Wavetable`] and [`WavetableReader`], double-buffered
//!   frames with per-harmonic amplitude and phase tables
//! - [`background`] - [`BackgroundRenderer`], rendering on a worker thread
//! - [`state`] - saved-state versions and the migrations between them
//! - [`line_generator`] - piecewise curves drawn by the line source
//! - [`encoding`] - base64 sample payloads
//!
//! ## Example
//!
//! ```rust
//! use morphwave_wavetable::{Wavetable, WavetableCreator};
//!
//! let mut creator = WavetableCreator::new();
//! creator.init_predefined_waves();
//!
//! let mut table = Wavetable::new(1);
//! let reader = table.reader();
//! creator.render(&mut table);
//! table.publish();
//!
//! let snapshot = reader.mark_used();
//! assert_eq!(snapshot.num_frames, 257);
//! ```

pub mod background;
pub mod component;
pub mod creator;
pub mod encoding;
pub mod error;
pub mod group;
mod json;
pub mod keyframe;
pub mod line_generator;
pub mod state;
pub mod storage;

pub use background::{BackgroundRenderer, RenderComplete};
pub use component::{Component, ComponentType, WavetableComponent};
pub use creator::{AudioLoadStyle, RenderSummary, WavetableCreator};
pub use error::{Result, StateError};
pub use group::WavetableGroup;
pub use keyframe::{InterpolationStyle, Keyframe, KeyframeData, KeyframeTrack, NUM_OSCILLATOR_WAVE_FRAMES};
pub use line_generator::LineGenerator;
pub use state::{FORMAT_VERSION, Version, migrate};
pub use storage::{NUM_HARMONICS, Wavetable, WavetableData, WavetableReader, WavetableSnapshot};
