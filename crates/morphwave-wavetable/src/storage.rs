//! Rendered wavetable storage shared between the edit and audio threads.
//!
//! The edit side owns a mutable [`WavetableData`] inside [`Wavetable`] and
//! publishes immutable snapshots of it with [`Wavetable::publish`]. The audio
//! side holds a [`WavetableReader`] and brackets every block with
//! [`WavetableReader::mark_used`], which pins the snapshot current at block
//! start until the returned guard drops.
//!
//! Old snapshots are parked on the edit side and released there once no
//! reader holds them, so the audio thread never frees table memory.
//!
//! ```rust
//! use morphwave_wavetable::Wavetable;
//! use morphwave_spectral::{PredefinedWaveFrames, Shape};
//!
//! let mut table = Wavetable::new(1);
//! let reader = table.reader();
//! table.load_wave_frame(PredefinedWaveFrames::get(Shape::Sin), 0);
//! table.publish();
//!
//! let block = reader.mark_used();
//! assert!((block.waves[0][512] - 1.0).abs() < 1e-4);
//! ```

use arc_swap::ArcSwap;
use morphwave_spectral::{Complex32, NUM_REAL_COMPLEX, WAVEFORM_SIZE, WaveFrame};
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Harmonics stored per frame, DC through Nyquist.
pub const NUM_HARMONICS: usize = NUM_REAL_COMPLEX;

/// Harmonic amplitude below which a frame's phase is treated as undefined
/// and filled in from neighbouring frames.
const MIN_PHASE_AMPLITUDE: f32 = 0.1;

/// One rendered table.
#[derive(Debug, Clone, PartialEq)]
pub struct WavetableData {
    /// Number of frames.
    pub num_frames: usize,
    /// Playback frequency ratio of the frames.
    pub frequency_ratio: f32,
    /// Sample rate of the audio the frames came from.
    pub sample_rate: f32,
    /// Incremented on every publish.
    pub generation: u64,
    /// Frames loop an octave across the table.
    pub shepard_table: bool,
    /// Time-domain samples, `WAVEFORM_SIZE` per frame.
    pub waves: Vec<Vec<f32>>,
    /// Harmonic amplitudes, `NUM_HARMONICS` per frame.
    pub amplitudes: Vec<Vec<f32>>,
    /// Unit-magnitude harmonic phases, `NUM_HARMONICS` per frame.
    pub normalized: Vec<Vec<Complex32>>,
}

impl WavetableData {
    fn new(num_frames: usize) -> Self {
        let num_frames = num_frames.max(1);
        Self {
            num_frames,
            frequency_ratio: morphwave_spectral::DEFAULT_FREQUENCY_RATIO,
            sample_rate: morphwave_spectral::DEFAULT_SAMPLE_RATE,
            generation: 0,
            shepard_table: false,
            waves: vec![vec![0.0; WAVEFORM_SIZE]; num_frames],
            amplitudes: vec![vec![0.0; NUM_HARMONICS]; num_frames],
            normalized: vec![vec![Complex32::new(1.0, 0.0); NUM_HARMONICS]; num_frames],
        }
    }

    /// Clamp a frame index into range.
    #[inline]
    pub fn clamp_frame(&self, index: usize) -> usize {
        index.min(self.num_frames - 1)
    }

    /// Time-domain samples of frame `index` (clamped).
    #[inline]
    pub fn wave(&self, index: usize) -> &[f32] {
        &self.waves[self.clamp_frame(index)]
    }

    /// Harmonic amplitudes of frame `index` (clamped).
    #[inline]
    pub fn frame_amplitudes(&self, index: usize) -> &[f32] {
        &self.amplitudes[self.clamp_frame(index)]
    }

    /// Unit harmonic phases of frame `index` (clamped).
    #[inline]
    pub fn frame_normalized(&self, index: usize) -> &[Complex32] {
        &self.normalized[self.clamp_frame(index)]
    }
}

/// Edit-side handle of a wavetable.
#[derive(Debug)]
pub struct Wavetable {
    data: WavetableData,
    shared: Arc<ArcSwap<WavetableData>>,
    retired: Vec<Arc<WavetableData>>,
    in_flight: Arc<AtomicUsize>,
}

impl Wavetable {
    /// A silent table of `num_frames` frames (at least one). The silent
    /// table is published immediately.
    pub fn new(num_frames: usize) -> Self {
        let data = WavetableData::new(num_frames);
        let shared = Arc::new(ArcSwap::from_pointee(data.clone()));
        Self {
            data,
            shared,
            retired: Vec::new(),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Audio-side handle onto the published snapshots.
    pub fn reader(&self) -> WavetableReader {
        WavetableReader {
            shared: Arc::clone(&self.shared),
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    /// The edit-side data.
    pub fn data(&self) -> &WavetableData {
        &self.data
    }

    /// Number of frames on the edit side.
    pub fn num_frames(&self) -> usize {
        self.data.num_frames
    }

    /// Resize to `num_frames` (at least one).
    ///
    /// Frames that fit are kept. New frames copy the last existing frame.
    pub fn set_num_frames(&mut self, num_frames: usize) {
        let num_frames = num_frames.max(1);
        let data = &mut self.data;
        let last = data.num_frames - 1;
        let wave = data.waves[last].clone();
        let amplitudes = data.amplitudes[last].clone();
        let normalized = data.normalized[last].clone();
        data.waves.resize(num_frames, wave);
        data.amplitudes.resize(num_frames, amplitudes);
        data.normalized.resize(num_frames, normalized);
        data.num_frames = num_frames;
    }

    /// Flag the table as an octave loop.
    pub fn set_shepard_table(&mut self, shepard: bool) {
        self.data.shepard_table = shepard;
    }

    /// Store `frame` at `index` with its harmonic tables.
    ///
    /// Indices past the end are ignored; tables are resized while being
    /// edited and late writes are expected.
    pub fn load_wave_frame(&mut self, frame: &WaveFrame, index: usize) {
        if index >= self.data.num_frames {
            return;
        }
        self.data.frequency_ratio = frame.frequency_ratio;
        self.data.sample_rate = frame.sample_rate;
        self.data.waves[index].copy_from_slice(&frame.time_domain);

        let amplitudes = &mut self.data.amplitudes[index];
        let normalized = &mut self.data.normalized[index];
        for (i, bin) in frame.frequency_domain.iter().enumerate().take(NUM_HARMONICS) {
            amplitudes[i] = bin.norm();
            normalized[i] = Complex32::from_polar(1.0, bin.arg());
        }
    }

    /// Finish a render pass.
    ///
    /// With `max_span > 0` every frame is scaled by `2 / max_span`, so the
    /// widest frame spans `[-1, 1]`. Harmonics too quiet to carry a phase get
    /// one interpolated from the nearest frames that do, so spectral morphs
    /// see phases that move smoothly through the table.
    pub fn post_process(&mut self, max_span: f32) {
        if max_span > 0.0 {
            let scale = 2.0 / max_span;
            for wave in &mut self.data.waves {
                for sample in wave.iter_mut() {
                    *sample *= scale;
                }
            }
            for amplitudes in &mut self.data.amplitudes {
                for amplitude in amplitudes.iter_mut() {
                    *amplitude *= scale;
                }
            }
        }

        for harmonic in 1..NUM_HARMONICS {
            self.fill_phase_gaps(harmonic);
        }
    }

    fn fill_phase_gaps(&mut self, harmonic: usize) {
        let frames = self.data.num_frames;
        let valid: Vec<usize> = (0..frames)
            .filter(|&f| self.data.amplitudes[f][harmonic] >= MIN_PHASE_AMPLITUDE)
            .collect();
        let (Some(&first), Some(&last)) = (valid.first(), valid.last()) else {
            return;
        };

        let normalized = &mut self.data.normalized;
        let first_phase = normalized[first][harmonic];
        let last_phase = normalized[last][harmonic];
        for row in normalized.iter_mut().take(first) {
            row[harmonic] = first_phase;
        }
        for row in normalized.iter_mut().skip(last + 1) {
            row[harmonic] = last_phase;
        }

        for pair in valid.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if to - from < 2 {
                continue;
            }
            let start = normalized[from][harmonic];
            let end = normalized[to][harmonic];
            let range = (to - from) as f32;
            for frame in from + 1..to {
                let t = (frame - from) as f32 / range;
                let blended = start + (end - start) * t;
                let norm = blended.norm();
                normalized[frame][harmonic] = if norm > f32::EPSILON {
                    blended / norm
                } else {
                    start
                };
            }
        }
    }

    /// Publish the edit-side data to readers. Returns the new generation.
    pub fn publish(&mut self) -> u64 {
        self.data.generation += 1;
        let previous = self.shared.swap(Arc::new(self.data.clone()));
        self.retired.push(previous);
        self.release_retired();
        tracing::info!(
            generation = self.data.generation,
            num_frames = self.data.num_frames,
            "published wavetable"
        );
        self.data.generation
    }

    /// Drop retired snapshots no reader holds any more.
    pub fn release_retired(&mut self) {
        self.retired.retain(|snapshot| Arc::strong_count(snapshot) > 1);
    }

    /// Retired snapshots still held by readers.
    pub fn retired_count(&self) -> usize {
        self.retired.len()
    }

    /// Blocks currently rendering from a snapshot.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Audio-side view of a [`Wavetable`].
#[derive(Debug, Clone)]
pub struct WavetableReader {
    shared: Arc<ArcSwap<WavetableData>>,
    in_flight: Arc<AtomicUsize>,
}

impl WavetableReader {
    /// Pin the current snapshot for one block.
    pub fn mark_used(&self) -> WavetableSnapshot<'_> {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        WavetableSnapshot {
            data: self.shared.load_full(),
            in_flight: &self.in_flight,
        }
    }

    /// Generation of the snapshot a new block would see.
    pub fn generation(&self) -> u64 {
        self.shared.load().generation
    }

    /// Blocks currently rendering from a snapshot.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// A snapshot pinned for one block. Dropping it marks the block finished.
#[derive(Debug)]
pub struct WavetableSnapshot<'a> {
    data: Arc<WavetableData>,
    in_flight: &'a AtomicUsize,
}

impl Deref for WavetableSnapshot<'_> {
    type Target = WavetableData;

    fn deref(&self) -> &WavetableData {
        &self.data
    }
}

impl Drop for WavetableSnapshot<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}
