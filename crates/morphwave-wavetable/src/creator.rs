//! Whole-table rendering from groups of components.

use crate::component::{
    Component, FadeStyle, FileSource, PhaseStyle, WaveSource, WavetableComponent,
};
use crate::error::Result;
use crate::group::WavetableGroup;
use crate::json::{array_field, bool_or};
use crate::keyframe::NUM_OSCILLATOR_WAVE_FRAMES;
use crate::state::{FORMAT_VERSION, migrate};
use crate::storage::Wavetable;
use morphwave_spectral::{DEFAULT_MAX_PERIOD, PredefinedWaveFrames, Shape, WAVEFORM_SIZE, WaveFrame};
use serde_json::{Value, json};

/// How [`WavetableCreator::init_from_audio`] cuts audio into frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioLoadStyle {
    /// Consecutive 2048-sample windows, joined by wave blending.
    #[default]
    WavetableSplice,
    /// One detected period per window with randomised phases.
    Vocoded,
    /// One detected period per window, blended in frequency.
    Pitched,
}

/// Result of [`WavetableCreator::render`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSummary {
    /// Frames written.
    pub num_frames: usize,
    /// Widest peak-to-peak span before normalisation.
    pub max_span: f32,
    /// Every group loops an octave.
    pub shepard_table: bool,
}

/// Groups of components plus the settings that turn them into a table.
///
/// Each group renders a frame at every position; the group frames are summed
/// and averaged. [`render`](Self::render) writes every position from 0 to
/// the last keyframe into a [`Wavetable`].
#[derive(Debug, Clone, PartialEq)]
pub struct WavetableCreator {
    groups: Vec<WavetableGroup>,
    remove_all_dc: bool,
    full_normalize: bool,
    name: String,
    author: String,
}

impl WavetableCreator {
    /// A creator holding the default group.
    pub fn new() -> Self {
        let mut creator = Self {
            groups: Vec::new(),
            remove_all_dc: true,
            full_normalize: true,
            name: String::new(),
            author: String::new(),
        };
        creator.init();
        creator
    }

    /// Reset to a single default group.
    pub fn init(&mut self) {
        self.clear();
        let mut group = WavetableGroup::new();
        group.load_default_group();
        self.groups.push(group);
    }

    /// Remove every group and reset the name and author.
    pub fn clear(&mut self) {
        self.groups.clear();
        self.name.clear();
        self.author.clear();
    }

    /// The groups.
    pub fn groups(&self) -> &[WavetableGroup] {
        &self.groups
    }

    /// Group at `index`, mutably.
    pub fn group_mut(&mut self, index: usize) -> Option<&mut WavetableGroup> {
        self.groups.get_mut(index)
    }

    /// Append a group. Returns its index.
    pub fn add_group(&mut self, group: WavetableGroup) -> usize {
        self.groups.push(group);
        self.groups.len() - 1
    }

    /// Remove and return the group at `index`.
    pub fn remove_group(&mut self, index: usize) -> Option<WavetableGroup> {
        (index < self.groups.len()).then(|| self.groups.remove(index))
    }

    /// Whether each frame has its DC offset removed.
    pub fn remove_all_dc(&self) -> bool {
        self.remove_all_dc
    }

    /// Set whether each frame has its DC offset removed.
    pub fn set_remove_all_dc(&mut self, remove: bool) {
        self.remove_all_dc = remove;
    }

    /// Whether the whole table is scaled so its widest frame spans `[-1, 1]`.
    pub fn full_normalize(&self) -> bool {
        self.full_normalize
    }

    /// Set whether the whole table is normalised.
    pub fn set_full_normalize(&mut self, normalize: bool) {
        self.full_normalize = normalize;
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the table name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Table author.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Set the table author.
    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    /// Last position any group has content for.
    pub fn last_keyframe_position(&self) -> i32 {
        self.groups
            .iter()
            .map(WavetableGroup::last_keyframe_position)
            .max()
            .unwrap_or(0)
    }

    /// True when there are groups and every one of them loops an octave.
    pub fn is_shepard_table(&self) -> bool {
        !self.groups.is_empty() && self.groups.iter().all(WavetableGroup::is_shepard_tone)
    }

    /// Render the combined frame at `position`.
    pub fn render_frame(&self, position: i32) -> WaveFrame {
        let mut combined = WaveFrame::new();
        combined.index = position;
        let mut scratch = WaveFrame::new();
        for (i, group) in self.groups.iter().enumerate() {
            scratch.clear();
            group.render(&mut scratch, position as f32);
            if i == 0 {
                combined.set_frequency_ratio(scratch.frequency_ratio);
                combined.set_sample_rate(scratch.sample_rate);
            }
            combined.add_from(&scratch);
        }
        if self.groups.len() > 1 {
            combined.multiply(1.0 / self.groups.len() as f32);
        }
        if self.remove_all_dc {
            combined.removed_dc();
        }
        combined
    }

    /// Render `position` into `table`. Returns the frame's peak-to-peak span.
    pub fn render_position(&self, table: &mut Wavetable, position: i32) -> f32 {
        let frame = self.render_frame(position);
        table.load_wave_frame(&frame, position.max(0) as usize);
        frame.peak_to_peak()
    }

    /// Render every position into `table`, resizing it to fit, then
    /// post-process. The table is not published.
    pub fn render(&self, table: &mut Wavetable) -> RenderSummary {
        let last = self.last_keyframe_position().max(0);
        let num_frames = last as usize + 1;
        table.set_num_frames(num_frames);
        let shepard_table = self.is_shepard_table();
        table.set_shepard_table(shepard_table);

        let mut max_span = 0.0f32;
        for position in 0..=last {
            max_span = max_span.max(self.render_position(table, position));
        }
        table.post_process(if self.full_normalize { max_span } else { 0.0 });

        tracing::debug!(num_frames, max_span, shepard_table, "rendered wavetable");
        RenderSummary {
            num_frames,
            max_span,
            shepard_table,
        }
    }

    /// Render every frame and concatenate their samples.
    pub fn render_to_buffer(&self) -> Vec<f32> {
        let mut table = Wavetable::new(1);
        self.render(&mut table);
        table.data().waves.concat()
    }

    /// Replace the groups with one wave source stepping through the six
    /// predefined shapes, evenly spaced over the table.
    pub fn init_predefined_waves(&mut self) {
        self.clear();
        let mut source = WaveSource::new();
        let last = NUM_OSCILLATOR_WAVE_FRAMES - 1;
        let steps = Shape::COUNT as i32 - 1;
        for (i, shape) in Shape::ALL.into_iter().enumerate() {
            let position = i as i32 * last / steps;
            source.insert_frame(position, PredefinedWaveFrames::get(shape));
        }
        let mut group = WavetableGroup::new();
        group.add_component(source);
        self.groups.push(group);
        self.name = "Basic Shapes".into();
    }

    /// Replace the groups with one file source reading `samples`.
    ///
    /// The first keyframe reads from the start of the audio and the last
    /// keyframe from its final window. Returns the window size used.
    pub fn init_from_audio(&mut self, samples: &[f32], sample_rate: f32, style: AudioLoadStyle) -> f32 {
        self.clear();
        let mut source = FileSource::new();
        source.load_buffer(samples, sample_rate);
        source.set_normalize_gain(true);

        let period = || {
            source
                .detect_pitch(DEFAULT_MAX_PERIOD)
                .unwrap_or(WAVEFORM_SIZE as f32)
        };
        let (window_size, fade_style, phase_style) = match style {
            AudioLoadStyle::WavetableSplice => {
                (WAVEFORM_SIZE as f32, FadeStyle::WaveBlend, PhaseStyle::None)
            }
            AudioLoadStyle::Vocoded => (period(), FadeStyle::WaveBlend, PhaseStyle::Vocode),
            AudioLoadStyle::Pitched => (period(), FadeStyle::FreqInterpolate, PhaseStyle::None),
        };
        source.set_window_size(window_size);
        source.set_fade_style(fade_style);
        source.set_phase_style(phase_style);

        source.insert_new_keyframe(0);
        let last = source.insert_new_keyframe(NUM_OSCILLATOR_WAVE_FRAMES - 1);
        let end = (samples.len() as f32 - window_size).max(0.0);
        source.set_start_position(last, end);

        let mut group = WavetableGroup::new();
        group.add_component(source);
        self.groups.push(group);
        tracing::info!(
            samples = samples.len(),
            sample_rate,
            window_size,
            ?style,
            "loaded audio into wavetable"
        );
        window_size
    }

    /// Saved form, stamped with the current layout version.
    pub fn state_to_json(&self) -> Value {
        let groups: Vec<Value> = self.groups.iter().map(WavetableGroup::state_to_json).collect();
        json!({
            "groups": groups,
            "name": self.name,
            "author": self.author,
            "version": FORMAT_VERSION,
            "remove_all_dc": self.remove_all_dc,
            "full_normalize": self.full_normalize,
        })
    }

    /// Restore from a saved form of any supported version.
    pub fn json_to_state(&mut self, data: &Value) -> Result<()> {
        let mut data = data.clone();
        migrate(&mut data)?;

        let mut groups = Vec::new();
        for group_data in array_field(&data, "groups")? {
            let mut group = WavetableGroup::new();
            group.json_to_state(group_data)?;
            groups.push(group);
        }
        self.groups = groups;
        self.name = string_or_empty(&data, "name");
        self.author = string_or_empty(&data, "author");
        self.remove_all_dc = bool_or(&data, "remove_all_dc", true);
        self.full_normalize = bool_or(&data, "full_normalize", true);
        Ok(())
    }

    /// Parse a saved table from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let data: Value = serde_json::from_str(text)?;
        let mut creator = Self::new();
        creator.json_to_state(&data)?;
        Ok(creator)
    }

    /// Saved form as pretty-printed JSON text.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.state_to_json())?)
    }

    /// Every component of every group, in render order.
    pub fn components(&self) -> impl Iterator<Item = &WavetableComponent> {
        self.groups.iter().flat_map(|group| group.components())
    }
}

impl Default for WavetableCreator {
    fn default() -> Self {
        Self::new()
    }
}

fn string_or_empty(data: &Value, name: &str) -> String {
    data.get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentType;
    use std::f32::consts::PI;

    #[test]
    fn test_default_renders_one_saw_frame() {
        let creator = WavetableCreator::new();
        let mut table = Wavetable::new(4);
        let summary = creator.render(&mut table);
        assert_eq!(summary.num_frames, 1);
        assert_eq!(table.num_frames(), 1);
        assert!(!summary.shepard_table);
        let peak = table.data().waves[0].iter().fold(0.0f32, |p, s| p.max(s.abs()));
        assert!(peak > 0.9 && peak <= 1.0 + 1e-4, "peak {peak}");
    }

    #[test]
    fn test_groups_are_averaged() {
        let mut creator = WavetableCreator::new();
        creator.set_remove_all_dc(false);
        let mut silent = WavetableGroup::new();
        silent.add_component(WaveSource::new());
        creator.add_group(silent);
        let frame = creator.render_frame(0);
        let saw = PredefinedWaveFrames::get(Shape::Saw);
        for i in (0..WAVEFORM_SIZE).step_by(128) {
            assert!((frame.time_domain[i] - 0.5 * saw.time_domain[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_dc_is_removed() {
        let mut creator = WavetableCreator::new();
        if let Some(WavetableComponent::WaveSource(source)) =
            creator.group_mut(0).and_then(|g| g.component_mut(0))
        {
            if let Some(frame) = source.wave_frame_mut(0) {
                for sample in &mut frame.time_domain {
                    *sample += 0.25;
                }
                frame.to_frequency_domain();
            }
        }
        let frame = creator.render_frame(0);
        let mean = frame.time_domain.iter().sum::<f32>() / WAVEFORM_SIZE as f32;
        assert!(mean.abs() < 1e-5, "mean {mean}");
    }

    #[test]
    fn test_predefined_waves_span_table() {
        let mut creator = WavetableCreator::new();
        creator.init_predefined_waves();
        assert_eq!(creator.last_keyframe_position(), NUM_OSCILLATOR_WAVE_FRAMES - 1);
        let buffer = creator.render_to_buffer();
        assert_eq!(buffer.len(), NUM_OSCILLATOR_WAVE_FRAMES as usize * WAVEFORM_SIZE);
    }

    #[test]
    fn test_init_from_audio_uses_detected_period() {
        let samples: Vec<f32> = (0..44100)
            .map(|i| (2.0 * PI * 100.0 * i as f32 / 44100.0).sin())
            .collect();
        let mut creator = WavetableCreator::new();
        let window = creator.init_from_audio(&samples, 44100.0, AudioLoadStyle::Pitched);
        assert!((window - 441.0).abs() <= 1.0, "window {window}");
        let kinds: Vec<_> = creator.components().map(WavetableComponent::component_type).collect();
        assert_eq!(kinds, [ComponentType::FileSource]);
        assert_eq!(creator.last_keyframe_position(), NUM_OSCILLATOR_WAVE_FRAMES - 1);

        let window = creator.init_from_audio(&samples, 44100.0, AudioLoadStyle::WavetableSplice);
        assert_eq!(window, WAVEFORM_SIZE as f32);
    }

    #[test]
    fn test_json_roundtrip_keeps_settings() {
        let mut creator = WavetableCreator::new();
        creator.init_predefined_waves();
        creator.set_author("someone");
        creator.set_full_normalize(false);
        let text = creator.to_json_string().unwrap();
        let restored = WavetableCreator::from_json_str(&text).unwrap();
        assert_eq!(restored.name(), "Basic Shapes");
        assert_eq!(restored.author(), "someone");
        assert!(!restored.full_normalize());
        assert!(restored.remove_all_dc());
        assert_eq!(restored.render_frame(100).time_domain, creator.render_frame(100).time_domain);
    }
}
