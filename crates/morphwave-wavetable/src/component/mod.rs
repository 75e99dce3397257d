//! Wavetable components: frame sources and frame modifiers.
//!
//! Every component owns a [`KeyframeTrack`] of its own parameter type and
//! renders a position by blending the keyframes around it, then applying
//! the blended parameters to a [`WaveFrame`]. The shared behaviour (keyframe
//! creation, interpolation dispatch, saved state layout) lives once in the
//! provided methods of [`Component`]; each variant supplies only its
//! parameter type and how one parameter set renders.
//!
//! Every component leaves both domains of the frame in sync when it returns.
//!
//! # Variants
//!
//! | Type name | Kind | Struct |
//! |-----------|------|--------|
//! | Wave Source | source | [`WaveSource`] |
//! | Line Source | source | [`WaveLineSource`] |
//! | Audio File Source | source | [`FileSource`] |
//! | Shepard Tone Source | source | [`ShepardToneSource`] |
//! | Phase Shift | modifier | [`PhaseModifier`] |
//! | Wave Window | modifier | [`WaveWindowModifier`] |
//! | Frequency Filter | modifier | [`FrequencyFilterModifier`] |
//! | Slew Limiter | modifier | [`SlewLimitModifier`] |
//! | Wave Folder | modifier | [`WaveFoldModifier`] |
//! | Wave Warp | modifier | [`WaveWarpModifier`] |

mod file_source;
mod frequency_filter;
mod line_source;
mod phase;
mod shepard;
mod slew_limit;
mod wave_fold;
mod wave_source;
mod wave_warp;
mod wave_window;

pub use file_source::{FadeStyle, FileSource, FileSourceKeyframe, PhaseStyle};
pub use frequency_filter::{FilterStyle, FrequencyFilterKeyframe, FrequencyFilterModifier};
pub use line_source::{WaveLineSource, WaveLineSourceKeyframe};
pub use phase::{PhaseKeyframe, PhaseModifier, PhaseShiftStyle};
pub use shepard::ShepardToneSource;
pub use slew_limit::{SlewLimitKeyframe, SlewLimitModifier};
pub use wave_fold::{WaveFoldKeyframe, WaveFoldModifier};
pub use wave_source::{WaveSource, WaveSourceKeyframe, WaveSourceMode};
pub use wave_warp::{WaveWarpKeyframe, WaveWarpModifier};
pub use wave_window::{WaveWindowKeyframe, WaveWindowModifier, WindowShape};

pub(crate) use wave_source::{blend_spectra, wrap_phase};

use crate::error::{Result, StateError};
use crate::json::{array_field, i32_field, i32_or, str_field};
use crate::keyframe::{InterpolationStyle, KeyframeData, KeyframeTrack, NUM_OSCILLATOR_WAVE_FRAMES};
use morphwave_spectral::WaveFrame;
use serde_json::{Map, Value};

/// The closed set of component kinds, in saved-state index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// [`WaveSource`]
    WaveSource,
    /// [`WaveLineSource`]
    LineSource,
    /// [`FileSource`]
    FileSource,
    /// [`ShepardToneSource`]
    ShepardToneSource,
    /// [`PhaseModifier`]
    PhaseModifier,
    /// [`WaveWindowModifier`]
    WaveWindow,
    /// [`FrequencyFilterModifier`]
    FrequencyFilter,
    /// [`SlewLimitModifier`]
    SlewLimiter,
    /// [`WaveFoldModifier`]
    WaveFolder,
    /// [`WaveWarpModifier`]
    WaveWarp,
}

impl ComponentType {
    /// Every kind, in saved-state index order.
    pub const ALL: [ComponentType; 10] = [
        ComponentType::WaveSource,
        ComponentType::LineSource,
        ComponentType::FileSource,
        ComponentType::ShepardToneSource,
        ComponentType::PhaseModifier,
        ComponentType::WaveWindow,
        ComponentType::FrequencyFilter,
        ComponentType::SlewLimiter,
        ComponentType::WaveFolder,
        ComponentType::WaveWarp,
    ];

    /// Name written to the `type` field of saved state.
    pub fn name(self) -> &'static str {
        match self {
            ComponentType::WaveSource => "Wave Source",
            ComponentType::LineSource => "Line Source",
            ComponentType::FileSource => "Audio File Source",
            ComponentType::ShepardToneSource => "Shepard Tone Source",
            ComponentType::PhaseModifier => "Phase Shift",
            ComponentType::WaveWindow => "Wave Window",
            ComponentType::FrequencyFilter => "Frequency Filter",
            ComponentType::SlewLimiter => "Slew Limiter",
            ComponentType::WaveFolder => "Wave Folder",
            ComponentType::WaveWarp => "Wave Warp",
        }
    }

    /// Look a kind up by saved-state name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Look a kind up by the integer older files stored instead of a name.
    pub fn from_legacy_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// True for kinds that produce a frame from nothing.
    pub fn is_source(self) -> bool {
        matches!(
            self,
            ComponentType::WaveSource
                | ComponentType::LineSource
                | ComponentType::FileSource
                | ComponentType::ShepardToneSource
        )
    }
}

/// Behaviour shared by every component variant.
pub trait Component {
    /// Parameter set stored per keyframe.
    type Keyframe: KeyframeData;
    /// Kind tag.
    const TYPE: ComponentType;

    /// The keyframes.
    fn track(&self) -> &KeyframeTrack<Self::Keyframe>;
    /// The keyframes, mutably.
    fn track_mut(&mut self) -> &mut KeyframeTrack<Self::Keyframe>;
    /// Parameters of a keyframe created with nothing to interpolate from.
    fn default_keyframe(&self) -> Self::Keyframe;
    /// Apply one parameter set to `frame`.
    fn render_keyframe(&self, keyframe: &Self::Keyframe, frame: &mut WaveFrame);
    /// Write a keyframe's fields (other than `position`).
    fn keyframe_to_json(&self, keyframe: &Self::Keyframe, out: &mut Map<String, Value>);
    /// Read a keyframe's fields (other than `position`).
    fn keyframe_from_json(&self, keyframe: &mut Self::Keyframe, data: &Value) -> Result<()>;

    /// Write component-level settings.
    fn settings_to_json(&self, out: &mut Map<String, Value>) {
        let _ = out;
    }

    /// Read component-level settings. Runs before keyframes are read.
    fn settings_from_json(&mut self, data: &Value) -> Result<()> {
        let _ = data;
        Ok(())
    }

    /// False for components that span the whole table without keyframes.
    fn has_keyframes(&self) -> bool {
        true
    }

    /// Render `position` into `frame`.
    fn render(&self, frame: &mut WaveFrame, position: f32) {
        let keyframe = self.interpolated(position);
        self.render_keyframe(&keyframe, frame);
    }

    /// Parameters blended for `position`.
    fn interpolated(&self, position: f32) -> Self::Keyframe {
        let mut keyframe = self.default_keyframe();
        self.track().interpolate(&mut keyframe, position);
        keyframe
    }

    /// New parameters for a keyframe at `position`, matching what the
    /// component currently renders there.
    fn create_keyframe(&self, position: i32) -> Self::Keyframe {
        self.interpolated(position as f32)
    }

    /// Create and insert a keyframe at `position`. Returns its index.
    fn insert_new_keyframe(&mut self, position: i32) -> usize {
        let keyframe = self.create_keyframe(position);
        self.track_mut().insert(position, keyframe)
    }

    /// Drop every keyframe and install a default one at position 0.
    fn reset(&mut self) {
        self.track_mut().clear();
        self.insert_new_keyframe(0);
    }

    /// Last position this component has content for.
    ///
    /// Components without keyframes report the last table frame.
    fn last_keyframe_position(&self) -> i32 {
        if self.has_keyframes() {
            self.track().last_keyframe_position()
        } else {
            NUM_OSCILLATOR_WAVE_FRAMES - 1
        }
    }

    /// Saved form.
    fn state_to_json(&self) -> Value {
        let keyframes: Vec<Value> = self
            .track()
            .keyframes()
            .iter()
            .map(|keyframe| {
                let mut out = Map::new();
                out.insert("position".into(), keyframe.position().into());
                self.keyframe_to_json(&keyframe.data, &mut out);
                Value::Object(out)
            })
            .collect();

        let mut out = Map::new();
        out.insert("type".into(), Self::TYPE.name().into());
        out.insert(
            "interpolation_style".into(),
            self.track().style().index().into(),
        );
        out.insert("keyframes".into(), Value::Array(keyframes));
        self.settings_to_json(&mut out);
        Value::Object(out)
    }

    /// Restore from the saved form, replacing all keyframes.
    fn json_to_state(&mut self, data: &Value) -> Result<()> {
        self.settings_from_json(data)?;
        let style = InterpolationStyle::from_index(i64::from(i32_or(data, "interpolation_style", 1)));
        self.track_mut().set_style(style);
        self.track_mut().clear();

        for keyframe_data in array_field(data, "keyframes")? {
            let position = i32_field(keyframe_data, "position")?
                .clamp(0, NUM_OSCILLATOR_WAVE_FRAMES - 1);
            let mut keyframe = self.default_keyframe();
            self.keyframe_from_json(&mut keyframe, keyframe_data)?;
            self.track_mut().insert(position, keyframe);
        }
        Ok(())
    }
}

/// Any component, as stored in a group.
#[derive(Debug, Clone, PartialEq)]
pub enum WavetableComponent {
    /// [`WaveSource`]
    WaveSource(WaveSource),
    /// [`WaveLineSource`]
    LineSource(WaveLineSource),
    /// [`FileSource`]
    FileSource(FileSource),
    /// [`ShepardToneSource`]
    ShepardToneSource(ShepardToneSource),
    /// [`PhaseModifier`]
    Phase(PhaseModifier),
    /// [`WaveWindowModifier`]
    WaveWindow(WaveWindowModifier),
    /// [`FrequencyFilterModifier`]
    FrequencyFilter(FrequencyFilterModifier),
    /// [`SlewLimitModifier`]
    SlewLimit(SlewLimitModifier),
    /// [`WaveFoldModifier`]
    WaveFold(WaveFoldModifier),
    /// [`WaveWarpModifier`]
    WaveWarp(WaveWarpModifier),
}

macro_rules! dispatch {
    ($value:expr, $component:ident => $body:expr) => {
        match $value {
            WavetableComponent::WaveSource($component) => $body,
            WavetableComponent::LineSource($component) => $body,
            WavetableComponent::FileSource($component) => $body,
            WavetableComponent::ShepardToneSource($component) => $body,
            WavetableComponent::Phase($component) => $body,
            WavetableComponent::WaveWindow($component) => $body,
            WavetableComponent::FrequencyFilter($component) => $body,
            WavetableComponent::SlewLimit($component) => $body,
            WavetableComponent::WaveFold($component) => $body,
            WavetableComponent::WaveWarp($component) => $body,
        }
    };
}

macro_rules! impl_from_component {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for WavetableComponent {
                fn from(component: $ty) -> Self {
                    WavetableComponent::$variant(component)
                }
            }
        )*
    };
}

impl_from_component!(
    WaveSource(WaveSource),
    LineSource(WaveLineSource),
    FileSource(FileSource),
    ShepardToneSource(ShepardToneSource),
    Phase(PhaseModifier),
    WaveWindow(WaveWindowModifier),
    FrequencyFilter(FrequencyFilterModifier),
    SlewLimit(SlewLimitModifier),
    WaveFold(WaveFoldModifier),
    WaveWarp(WaveWarpModifier),
);

impl WavetableComponent {
    /// A fresh component of `kind` with no keyframes.
    pub fn new(kind: ComponentType) -> Self {
        match kind {
            ComponentType::WaveSource => WaveSource::new().into(),
            ComponentType::LineSource => WaveLineSource::new().into(),
            ComponentType::FileSource => FileSource::new().into(),
            ComponentType::ShepardToneSource => ShepardToneSource::new().into(),
            ComponentType::PhaseModifier => PhaseModifier::new().into(),
            ComponentType::WaveWindow => WaveWindowModifier::new().into(),
            ComponentType::FrequencyFilter => FrequencyFilterModifier::new().into(),
            ComponentType::SlewLimiter => SlewLimitModifier::new().into(),
            ComponentType::WaveFolder => WaveFoldModifier::new().into(),
            ComponentType::WaveWarp => WaveWarpModifier::new().into(),
        }
    }

    /// Build a component from its saved form.
    pub fn from_json(data: &Value) -> Result<Self> {
        let name = str_field(data, "type")?;
        let kind = ComponentType::from_name(name)
            .ok_or_else(|| StateError::UnknownComponent(name.to_string()))?;
        let mut component = Self::new(kind);
        component.json_to_state(data)?;
        Ok(component)
    }

    /// Kind tag.
    pub fn component_type(&self) -> ComponentType {
        fn kind<C: Component>(_: &C) -> ComponentType {
            C::TYPE
        }
        dispatch!(self, c => kind(c))
    }

    /// Render `position` into `frame`.
    pub fn render(&self, frame: &mut WaveFrame, position: f32) {
        dispatch!(self, c => c.render(frame, position))
    }

    /// Create and insert a keyframe at `position`. Returns its index.
    pub fn insert_new_keyframe(&mut self, position: i32) -> usize {
        dispatch!(self, c => c.insert_new_keyframe(position))
    }

    /// Remove the keyframe at `index`.
    pub fn remove_keyframe(&mut self, index: usize) {
        dispatch!(self, c => {
            c.track_mut().remove(index);
        })
    }

    /// Move the keyframe at `index` to `position`. Returns its new index.
    pub fn reposition(&mut self, index: usize, position: i32) -> usize {
        dispatch!(self, c => c.track_mut().reposition(index, position))
    }

    /// Number of keyframes.
    pub fn num_keyframes(&self) -> usize {
        dispatch!(self, c => c.track().len())
    }

    /// Position of the keyframe at `index`.
    pub fn keyframe_position(&self, index: usize) -> Option<i32> {
        dispatch!(self, c => c.track().get(index).map(|k| k.position()))
    }

    /// Number of keyframes strictly before `position`.
    pub fn index_from_position(&self, position: f32) -> usize {
        dispatch!(self, c => c.track().index_from_position(position))
    }

    /// Interpolation style.
    pub fn interpolation_style(&self) -> InterpolationStyle {
        dispatch!(self, c => c.track().style())
    }

    /// Change the interpolation style.
    pub fn set_interpolation_style(&mut self, style: InterpolationStyle) {
        dispatch!(self, c => c.track_mut().set_style(style))
    }

    /// False for components that span the table without keyframes.
    pub fn has_keyframes(&self) -> bool {
        dispatch!(self, c => c.has_keyframes())
    }

    /// Last position this component has content for.
    pub fn last_keyframe_position(&self) -> i32 {
        dispatch!(self, c => c.last_keyframe_position())
    }

    /// Drop every keyframe and install a default one at position 0.
    pub fn reset(&mut self) {
        dispatch!(self, c => c.reset())
    }

    /// Saved form.
    pub fn state_to_json(&self) -> Value {
        dispatch!(self, c => c.state_to_json())
    }

    /// Restore from the saved form.
    pub fn json_to_state(&mut self, data: &Value) -> Result<()> {
        dispatch!(self, c => c.json_to_state(data))
    }
}
