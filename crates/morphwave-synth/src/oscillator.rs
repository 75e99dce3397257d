//! Real-time wavetable oscillator.
//!
//! [`SynthOscillator`] plays one note from a rendered [`WavetableData`]
//! snapshot with up to [`MAX_UNISON`] detuned voices. Each block it:
//!
//! 1. lays out the unison stack (detune, stack ratios, channel placement)
//! 2. builds a per-sample frequency buffer from note, transpose and tune,
//!    ramping the note across the block when it changed
//! 3. re-renders a voice's wave buffer through the spectral morph when its
//!    frame, morph or cutoff changed and its last crossfade has finished
//! 4. reads every voice with phase distortion, crossfading from the previous
//!    buffer over [`CROSSFADE_MS`]
//! 5. blends centre and detuned voices, applies stereo spread, then pan and
//!    level into the levelled bus
//!
//! Nothing here allocates once [`SynthOscillator::prepare`] has seen the
//! largest block size, and nothing logs.

use crate::distortion::DistortionType;
use crate::morph::{MAX_HARMONIC, SpectralMorph, SpectralMorpher};
use crate::quantize::TransposeQuantizer;
use crate::random_values::RandomValues;
use crate::settings::OscillatorSettings;
use crate::unison::{
    Detune, MAX_UNISON, Placement, StackStyle, pair_index, placement, stack_position, voice_ratios,
};
use crate::wave_buffer::WaveBuffer;
use morphwave_core::{
    CrossfadeRamp, SmoothedParam, amplitude_to_gain, constant_power_pan, equal_power_fade, lerp,
    midi_to_freq, semitones_to_ratio, wrap_unit,
};
use morphwave_spectral::WAVEFORM_SIZE;
use morphwave_wavetable::WavetableData;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Length of the crossfade from an old wave buffer to a new one.
pub const CROSSFADE_MS: f32 = 7.0;

const PHASE_SCALE: f32 = 4_294_967_296.0;
const SMOOTHING_MS: f32 = 5.0;

/// A left/right pair of sample buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct StereoBuffer {
    /// Left channel.
    pub left: Vec<f32>,
    /// Right channel.
    pub right: Vec<f32>,
}

impl StereoBuffer {
    /// Silent buffers of `len` samples.
    pub fn new(len: usize) -> Self {
        Self {
            left: vec![0.0; len],
            right: vec![0.0; len],
        }
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// True when the buffers are empty.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    fn clear_range(&mut self, start: usize, end: usize) {
        self.left[start..end].fill(0.0);
        self.right[start..end].fill(0.0);
    }
}

/// The two buses an oscillator writes.
#[derive(Debug, Clone, PartialEq)]
pub struct OscillatorOutput {
    /// Unison mix after stereo spread, before level and pan.
    pub raw: StereoBuffer,
    /// `raw` with pan and squared level applied.
    pub levelled: StereoBuffer,
}

impl OscillatorOutput {
    /// Buses for blocks of `len` samples.
    pub fn new(len: usize) -> Self {
        Self {
            raw: StereoBuffer::new(len),
            levelled: StereoBuffer::new(len),
        }
    }

    /// Block length.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// True for a zero-length block.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

// What a voice's current buffer was rendered from.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RenderKey {
    frame: usize,
    morph: SpectralMorph,
    amount: f32,
    last_harmonic: usize,
    generation: u64,
}

#[derive(Debug, Clone)]
struct UnisonVoice {
    phase: u32,
    current: WaveBuffer,
    previous: WaveBuffer,
    fade: CrossfadeRamp,
    rendered: Option<RenderKey>,
}

impl UnisonVoice {
    fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0,
            current: WaveBuffer::new(),
            previous: WaveBuffer::new(),
            fade: CrossfadeRamp::from_time(CROSSFADE_MS, sample_rate),
            rendered: None,
        }
    }
}

/// Wavetable oscillator for one note.
///
/// Silent until [`reset`](Self::reset) triggers it; [`stop`](Self::stop)
/// returns it to silence.
///
/// ## Example
///
/// ```rust
/// use morphwave_synth::{OscillatorOutput, SynthOscillator};
/// use morphwave_spectral::{PredefinedWaveFrames, Shape};
/// use morphwave_wavetable::Wavetable;
///
/// let mut table = Wavetable::new(1);
/// table.load_wave_frame(PredefinedWaveFrames::get(Shape::Saw), 0);
/// table.publish();
/// let reader = table.reader();
///
/// let mut osc = SynthOscillator::new(48000.0);
/// let mut out = OscillatorOutput::new(256);
/// osc.reset(0);
/// osc.process(&reader.mark_used(), 60.0, None, &mut out);
/// assert!(out.raw.left.iter().any(|s| s.abs() > 0.1));
/// ```
#[derive(Debug)]
pub struct SynthOscillator {
    sample_rate: f32,
    settings: OscillatorSettings,
    voices: Vec<UnisonVoice>,
    ratios: [f32; MAX_UNISON],
    morpher: SpectralMorpher,
    quantizer: TransposeQuantizer,
    rng: StdRng,
    active: bool,
    note: Option<f32>,
    pending_reset: Option<usize>,
    distortion_amount: SmoothedParam,
    morph_amount: SmoothedParam,
    level: SmoothedParam,
    frequencies: Vec<f32>,
    distortion_values: Vec<f32>,
}

impl SynthOscillator {
    /// An oscillator with default settings and an OS-seeded phase randomiser.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_rng(sample_rate, StdRng::from_os_rng())
    }

    /// An oscillator whose random phases come from `seed`.
    pub fn with_seed(sample_rate: f32, seed: u64) -> Self {
        Self::with_rng(sample_rate, StdRng::seed_from_u64(seed))
    }

    fn with_rng(sample_rate: f32, rng: StdRng) -> Self {
        RandomValues::init();
        let settings = OscillatorSettings::default();
        let mut quantizer = TransposeQuantizer::new();
        quantizer.set_mask(settings.transpose_quantize);
        quantizer.set_global(settings.quantize_global);
        Self {
            sample_rate,
            voices: (0..MAX_UNISON).map(|_| UnisonVoice::new(sample_rate)).collect(),
            ratios: [1.0; MAX_UNISON],
            morpher: SpectralMorpher::new(),
            quantizer,
            rng,
            active: false,
            note: None,
            pending_reset: None,
            distortion_amount: SmoothedParam::with_config(
                settings.distortion_amount,
                sample_rate,
                SMOOTHING_MS,
            ),
            morph_amount: SmoothedParam::with_config(
                settings.spectral_morph_amount,
                sample_rate,
                SMOOTHING_MS,
            ),
            level: SmoothedParam::with_config(settings.level, sample_rate, SMOOTHING_MS),
            frequencies: Vec::new(),
            distortion_values: Vec::new(),
            settings,
        }
    }

    /// Current settings.
    pub fn settings(&self) -> &OscillatorSettings {
        &self.settings
    }

    /// Replace the settings. Amounts and level glide to their new values;
    /// everything else applies from the next block.
    pub fn set_settings(&mut self, settings: &OscillatorSettings) {
        self.distortion_amount.set_target(settings.distortion_amount);
        self.morph_amount.set_target(settings.spectral_morph_amount);
        self.level.set_target(settings.level);
        self.quantizer.set_mask(settings.transpose_quantize);
        self.quantizer.set_global(settings.quantize_global);
        self.settings = settings.clone();
    }

    /// Stack style in use.
    pub fn stack_style(&self) -> StackStyle {
        self.settings.stack_style
    }

    /// Distortion in use.
    pub fn distortion(&self) -> DistortionType {
        self.settings.distortion
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Change the sample rate. Running crossfades finish immediately.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.distortion_amount.set_sample_rate(sample_rate);
        self.morph_amount.set_sample_rate(sample_rate);
        self.level.set_sample_rate(sample_rate);
        for voice in &mut self.voices {
            voice.fade = CrossfadeRamp::from_time(CROSSFADE_MS, sample_rate);
        }
    }

    /// Size scratch buffers for blocks of up to `max_block` samples.
    pub fn prepare(&mut self, max_block: usize) {
        if self.frequencies.len() < max_block {
            self.frequencies.resize(max_block, 0.0);
            self.distortion_values.resize(max_block, 0.0);
        }
    }

    /// Trigger the note at sample `trigger_sample` of the next block.
    ///
    /// Samples before the trigger continue from the old state. At the
    /// trigger, phases are re-randomised by the random-phase amount, smoothed
    /// amounts jump to their targets, the note snaps without a glide, and
    /// every voice's buffers are rendered fresh with no crossfade.
    pub fn reset(&mut self, trigger_sample: usize) {
        self.pending_reset = Some(trigger_sample);
    }

    /// Silence the oscillator until the next reset.
    pub fn stop(&mut self) {
        self.active = false;
        self.pending_reset = None;
        self.note = None;
    }

    /// True between a reset and a stop.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Render one block into `output`.
    ///
    /// `table` should be a snapshot pinned for this block. `modulator` feeds
    /// the FM and RM distortions; missing samples read as 0.
    pub fn process(
        &mut self,
        table: &WavetableData,
        note: f32,
        modulator: Option<&[f32]>,
        output: &mut OscillatorOutput,
    ) {
        let len = output.len();
        assert!(
            output.raw.right.len() == len
                && output.levelled.left.len() == len
                && output.levelled.right.len() == len,
            "oscillator output lanes must be paired"
        );
        self.prepare(len);

        match self.pending_reset.take() {
            Some(trigger) => {
                let trigger = trigger.min(len);
                self.render_range(table, note, modulator, output, 0, trigger);
                self.trigger(table, note);
                self.render_range(table, note, modulator, output, trigger, len);
            }
            None => self.render_range(table, note, modulator, output, 0, len),
        }
    }

    fn trigger(&mut self, table: &WavetableData, note: f32) {
        let random_phase = self.settings.random_phase.clamp(0.0, 1.0);
        for voice in &mut self.voices {
            let offset = random_phase * self.rng.random::<f32>();
            voice.phase = (offset * PHASE_SCALE) as u32;
            voice.rendered = None;
            voice.fade.finish();
        }
        self.distortion_amount
            .set_immediate(self.settings.distortion_amount);
        self.morph_amount
            .set_immediate(self.settings.spectral_morph_amount);
        self.level.set_immediate(self.settings.level);
        self.note = Some(note);
        self.active = true;

        let voices = self.unison_voices();
        self.update_ratios(voices);
        let frequency = self.frequency(table, note);
        self.refresh_buffers(table, voices, frequency, frequency);
        for voice in &mut self.voices[..voices] {
            voice.previous.clone_from(&voice.current);
            voice.fade.finish();
        }
    }

    fn unison_voices(&self) -> usize {
        (self.settings.unison_voices as usize).clamp(1, MAX_UNISON)
    }

    fn update_ratios(&mut self, voices: usize) {
        let detune = Detune {
            amount: self.settings.detune,
            range: self.settings.detune_range,
            power: self.settings.detune_power,
        };
        voice_ratios(voices, &detune, self.settings.stack_style, &mut self.ratios);
    }

    // Base frequency before unison ratios.
    fn frequency(&self, table: &WavetableData, note: f32) -> f32 {
        let transpose = self.quantizer.quantize(self.settings.transpose, note);
        if self.settings.keytrack {
            midi_to_freq(note + transpose + self.settings.tune)
        } else {
            let native = table.sample_rate * table.frequency_ratio / WAVEFORM_SIZE as f32;
            native * semitones_to_ratio(transpose + self.settings.tune)
        }
    }

    fn frame_index(&self, table: &WavetableData, voice: usize, voices: usize) -> usize {
        let position =
            self.settings.wave_frame + self.settings.frame_spread * stack_position(voice, voices);
        let frames = table.num_frames;
        if table.shepard_table {
            ((wrap_unit(position) * frames as f32) as usize) % frames
        } else {
            (position.clamp(0.0, 1.0) * (frames - 1) as f32).round() as usize
        }
    }

    // Re-render voices whose source changed and whose crossfade is done.
    fn refresh_buffers(
        &mut self,
        table: &WavetableData,
        voices: usize,
        start_frequency: f32,
        end_frequency: f32,
    ) {
        let max_ratio = self.ratios[..voices].iter().copied().fold(0.0_f32, f32::max);
        let top = start_frequency.max(end_frequency) * max_ratio;
        let last_harmonic = if top > 0.0 {
            ((0.5 * self.sample_rate / top) as usize).clamp(1, MAX_HARMONIC)
        } else {
            MAX_HARMONIC
        };
        let morph = self.settings.spectral_morph;
        let amount = self.morph_amount.get();

        for v in 0..voices {
            let key = RenderKey {
                frame: self.frame_index(table, v, voices),
                morph,
                amount,
                last_harmonic,
                generation: table.generation,
            };
            let voice = &mut self.voices[v];
            if voice.rendered == Some(key) || !voice.fade.is_finished() {
                continue;
            }
            std::mem::swap(&mut voice.previous, &mut voice.current);
            self.morpher
                .render(morph, table, key.frame, amount, last_harmonic, &mut voice.current);
            voice.fade.restart();
            voice.rendered = Some(key);
        }
    }

    fn render_range(
        &mut self,
        table: &WavetableData,
        note: f32,
        modulator: Option<&[f32]>,
        output: &mut OscillatorOutput,
        start: usize,
        end: usize,
    ) {
        if start >= end {
            return;
        }
        output.raw.clear_range(start, end);
        output.levelled.clear_range(start, end);
        if !self.active {
            return;
        }
        let count = end - start;

        let voices = self.unison_voices();
        let lanes = voices + voices % 2;
        assert!(lanes <= self.voices.len(), "unison lanes must come in pairs");
        self.update_ratios(voices);

        // Note ramp.
        let from_note = self.note.unwrap_or(note);
        if from_note == note {
            let frequency = self.frequency(table, note);
            self.frequencies[..count].fill(frequency);
        } else {
            for i in 0..count {
                let t = (i + 1) as f32 / count as f32;
                let frequency = self.frequency(table, lerp(from_note, note, t));
                self.frequencies[i] = frequency;
            }
        }
        self.note = Some(note);

        self.refresh_buffers(table, voices, self.frequencies[0], self.frequencies[count - 1]);

        let distortion = self.settings.distortion;
        for value in &mut self.distortion_values[..count] {
            *value = distortion.value(self.distortion_amount.advance());
        }
        for _ in 0..count {
            self.morph_amount.advance();
        }

        let pairs = lanes / 2;
        let (center_gain, detuned_gain) = if pairs <= 1 {
            (1.0, 0.0)
        } else {
            let (center, detuned) = equal_power_fade(self.settings.unison_blend);
            (center, detuned / ((pairs - 1) as f32).sqrt())
        };
        let offset = self.settings.distortion_phase;
        let inverse_rate = 1.0 / self.sample_rate;

        for v in 0..voices {
            let gain = if pair_index(v, voices) == 0 {
                center_gain
            } else {
                detuned_gain
            };
            let place = placement(v, voices);
            let ratio = self.ratios[v] * inverse_rate;
            let voice = &mut self.voices[v];

            for i in 0..count {
                let increment = wrap_unit(self.frequencies[i] * ratio);
                let phase = voice.phase as f32 / PHASE_SCALE;
                let modulation = modulator
                    .and_then(|m| m.get(start + i))
                    .copied()
                    .unwrap_or(0.0);
                let (read, window) =
                    distortion.apply(phase, self.distortion_values[i], offset, modulation);
                let fade = voice.fade.advance();
                let sample =
                    lerp(voice.previous.read(read), voice.current.read(read), fade) * window * gain;

                let index = start + i;
                match place {
                    Placement::Center => {
                        output.raw.left[index] += sample;
                        output.raw.right[index] += sample;
                    }
                    Placement::Left => output.raw.left[index] += sample,
                    Placement::Right => output.raw.right[index] += sample,
                }
                voice.phase = voice.phase.wrapping_add((increment * PHASE_SCALE) as u32);
            }
        }

        let (mono, stereo) = equal_power_fade(self.settings.stereo_spread);
        let (pan_left, pan_right) = constant_power_pan(self.settings.pan);
        for index in start..end {
            let (left, right) = (output.raw.left[index], output.raw.right[index]);
            let mid = 0.5 * (left + right);
            let left = stereo * left + mono * mid;
            let right = stereo * right + mono * mid;
            output.raw.left[index] = left;
            output.raw.right[index] = right;

            let gain = amplitude_to_gain(self.level.advance());
            output.levelled.left[index] = left * gain * pan_left;
            output.levelled.right[index] = right * gain * pan_right;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morphwave_spectral::{PredefinedWaveFrames, Shape};
    use morphwave_wavetable::Wavetable;

    const SAMPLE_RATE: f32 = 44100.0;

    fn table(shapes: &[Shape]) -> Wavetable {
        let mut table = Wavetable::new(shapes.len());
        for (i, &shape) in shapes.iter().enumerate() {
            table.load_wave_frame(PredefinedWaveFrames::get(shape), i);
        }
        table.post_process(0.0);
        table
    }

    fn still_settings() -> OscillatorSettings {
        OscillatorSettings {
            random_phase: 0.0,
            level: 1.0,
            ..Default::default()
        }
    }

    fn rising_crossings(samples: &[f32]) -> usize {
        samples
            .windows(2)
            .filter(|w| w[0] <= 0.0 && w[1] > 0.0)
            .count()
    }

    #[test]
    fn test_silent_until_reset() {
        let table = table(&[Shape::Sin]);
        let mut osc = SynthOscillator::with_seed(SAMPLE_RATE, 1);
        let mut out = OscillatorOutput::new(128);
        osc.process(table.data(), 69.0, None, &mut out);
        assert!(out.raw.left.iter().all(|&s| s == 0.0));
        assert!(!osc.is_active());
    }

    #[test]
    fn test_plays_note_frequency() {
        let table = table(&[Shape::Sin]);
        let mut osc = SynthOscillator::with_seed(SAMPLE_RATE, 1);
        osc.set_settings(&still_settings());
        let mut out = OscillatorOutput::new(44100);
        osc.reset(0);
        osc.process(table.data(), 69.0, None, &mut out);

        let crossings = rising_crossings(&out.raw.left);
        assert!((438..=442).contains(&crossings), "{crossings} cycles");
        assert_eq!(out.raw.left, out.raw.right);
    }

    #[test]
    fn test_trigger_sample_splits_block() {
        let table = table(&[Shape::Sin]);
        let mut osc = SynthOscillator::with_seed(SAMPLE_RATE, 1);
        osc.set_settings(&OscillatorSettings {
            random_phase: 0.0,
            wave_frame: 0.0,
            ..still_settings()
        });
        let mut out = OscillatorOutput::new(256);
        osc.reset(100);
        osc.process(table.data(), 80.0, None, &mut out);
        assert!(out.raw.left[..100].iter().all(|&s| s == 0.0));
        assert!(out.raw.left[100..].iter().any(|&s| s.abs() > 0.1));
    }

    #[test]
    fn test_levelled_applies_squared_level() {
        let table = table(&[Shape::Saw]);
        let mut osc = SynthOscillator::with_seed(SAMPLE_RATE, 1);
        osc.set_settings(&OscillatorSettings {
            level: 0.5,
            ..still_settings()
        });
        let mut out = OscillatorOutput::new(512);
        osc.reset(0);
        osc.process(table.data(), 60.0, None, &mut out);
        for (raw, levelled) in out.raw.left.iter().zip(&out.levelled.left) {
            assert!((raw * 0.25 - levelled).abs() < 1e-5);
        }
    }

    #[test]
    fn test_keytrack_off_plays_native_pitch() {
        let table = table(&[Shape::Sin]);
        let mut osc = SynthOscillator::with_seed(SAMPLE_RATE, 1);
        osc.set_settings(&OscillatorSettings {
            keytrack: false,
            ..still_settings()
        });
        let mut out = OscillatorOutput::new(44100);
        osc.reset(0);
        osc.process(table.data(), 100.0, None, &mut out);
        // 44100 / 2048 Hz
        let crossings = rising_crossings(&out.raw.left);
        assert!((20..=22).contains(&crossings), "{crossings} cycles");
    }

    #[test]
    fn test_frame_change_crossfades() {
        let table = table(&[Shape::Sin, Shape::Square]);
        let mut osc = SynthOscillator::with_seed(SAMPLE_RATE, 1);
        osc.set_settings(&still_settings());
        let mut out = OscillatorOutput::new(64);
        osc.reset(0);
        osc.process(table.data(), 60.0, None, &mut out);

        osc.set_settings(&OscillatorSettings {
            wave_frame: 1.0,
            ..still_settings()
        });
        osc.process(table.data(), 60.0, None, &mut out);
        assert!(!osc.voices[0].fade.is_finished());

        let fade_blocks = (CROSSFADE_MS / 1000.0 * SAMPLE_RATE) as usize / 64 + 1;
        for _ in 0..fade_blocks {
            osc.process(table.data(), 60.0, None, &mut out);
        }
        assert!(osc.voices[0].fade.is_finished());
        // the square's plateaus, away from the ringing at its edges
        let cycle = osc.voices[0].current.cycle();
        assert!((cycle[WAVEFORM_SIZE / 4] - 1.0).abs() < 0.2);
        assert!((cycle[3 * WAVEFORM_SIZE / 4] + 1.0).abs() < 0.2);
    }

    #[test]
    fn test_zero_spread_is_mono() {
        let table = table(&[Shape::Saw]);
        let mut osc = SynthOscillator::with_seed(SAMPLE_RATE, 3);
        osc.set_settings(&OscillatorSettings {
            unison_voices: 4,
            stereo_spread: 0.0,
            random_phase: 1.0,
            ..still_settings()
        });
        let mut out = OscillatorOutput::new(512);
        osc.reset(0);
        osc.process(table.data(), 57.0, None, &mut out);
        for (l, r) in out.raw.left.iter().zip(&out.raw.right) {
            assert!((l - r).abs() < 1e-6);
        }
        assert!(out.raw.left.iter().any(|s| s.abs() > 0.05));
    }

    #[test]
    fn test_output_stays_finite_for_every_distortion() {
        let table = table(&[Shape::Saw, Shape::Pulse]);
        let modulator: Vec<f32> = (0..256).map(|i| (i as f32 * 0.1).sin()).collect();
        for distortion in DistortionType::ALL {
            let mut osc = SynthOscillator::with_seed(SAMPLE_RATE, 7);
            osc.set_settings(&OscillatorSettings {
                distortion,
                distortion_amount: 0.8,
                unison_voices: 3,
                ..still_settings()
            });
            let mut out = OscillatorOutput::new(256);
            osc.reset(0);
            osc.process(table.data(), 60.0, Some(&modulator), &mut out);
            assert!(
                out.levelled.left.iter().all(|s| s.is_finite()),
                "{} produced a non-finite sample",
                distortion.name()
            );
        }
    }

    #[test]
    fn test_every_voice_count_renders() {
        let table = table(&[Shape::Saw]);
        for voices in 1..=MAX_UNISON as u32 {
            let mut osc = SynthOscillator::with_seed(SAMPLE_RATE, 5);
            osc.set_settings(&OscillatorSettings {
                unison_voices: voices,
                detune: 0.5,
                ..still_settings()
            });
            let mut out = OscillatorOutput::new(256);
            osc.reset(0);
            osc.process(table.data(), 57.0, None, &mut out);
            assert!(out.levelled.left.iter().all(|s| s.is_finite()), "{voices} voices");
            assert!(out.levelled.left.iter().any(|s| s.abs() > 0.01), "{voices} voices silent");
        }
    }

    #[test]
    fn test_constructor_builds_random_table() {
        let _osc = SynthOscillator::new(SAMPLE_RATE);
        assert!(RandomValues::is_built());
    }

    #[test]
    fn test_note_change_glides_within_block() {
        let table = table(&[Shape::Sin]);
        let mut osc = SynthOscillator::with_seed(SAMPLE_RATE, 1);
        osc.set_settings(&still_settings());
        let mut out = OscillatorOutput::new(64);
        osc.reset(0);
        osc.process(table.data(), 60.0, None, &mut out);
        osc.process(table.data(), 72.0, None, &mut out);
        let first = osc.frequencies[0];
        let last = osc.frequencies[63];
        assert!(first > midi_to_freq(60.0) && first < midi_to_freq(61.0));
        assert!((last - midi_to_freq(72.0)).abs() < 1e-2);
    }
}
