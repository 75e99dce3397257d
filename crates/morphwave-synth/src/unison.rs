//! Unison stack layout: per-voice detune, stack ratios and channel placement.
//!
//! Voices are laid out in channel pairs. With an even count, voices `2k` and
//! `2k + 1` form pair `k` and play left and right. With an odd count, voice 0
//! is a centre voice heard on both channels and the rest pair up behind it.
//! Pair 0 is always the centre pair for the unison blend.

use morphwave_core::{cents_to_ratio, power_scale, semitones_to_ratio};
use serde::{Deserialize, Serialize};

/// Most unison voices per oscillator.
pub const MAX_UNISON: usize = 16;

/// Per-pair frequency multipliers applied on top of detune.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackStyle {
    /// Every voice at the played pitch.
    #[default]
    Normal,
    /// Centre pair an octave down.
    CenterDropOctave,
    /// Centre pair two octaves down, next pair one octave down.
    CenterDropOctave2,
    /// Alternate pairs an octave up.
    Octave,
    /// Pairs cycle through unison, one and two octaves up.
    Octave2,
    /// Pairs cycle through root, fifth and octave.
    PowerChord,
    /// Pairs cycle through root, fifth, octave, octave plus fifth and two
    /// octaves.
    PowerChord2,
    /// Pairs cycle through a major triad and the octave.
    MajorChord,
    /// Pairs cycle through a minor triad and the octave.
    MinorChord,
    /// Pair `k` plays harmonic `k + 1`.
    HarmonicSeries,
    /// Pair `k` plays harmonic `2k + 1`.
    OddHarmonicSeries,
}

const OCTAVE: &[f32] = &[0.0, 12.0];
const OCTAVE_2: &[f32] = &[0.0, 12.0, 24.0];
const POWER_CHORD: &[f32] = &[0.0, 7.0, 12.0];
const POWER_CHORD_2: &[f32] = &[0.0, 7.0, 12.0, 19.0, 24.0];
const MAJOR_CHORD: &[f32] = &[0.0, 4.0, 7.0, 12.0];
const MINOR_CHORD: &[f32] = &[0.0, 3.0, 7.0, 12.0];

impl StackStyle {
    /// Every style, in control order.
    pub const ALL: [StackStyle; 11] = [
        StackStyle::Normal,
        StackStyle::CenterDropOctave,
        StackStyle::CenterDropOctave2,
        StackStyle::Octave,
        StackStyle::Octave2,
        StackStyle::PowerChord,
        StackStyle::PowerChord2,
        StackStyle::MajorChord,
        StackStyle::MinorChord,
        StackStyle::HarmonicSeries,
        StackStyle::OddHarmonicSeries,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            StackStyle::Normal => "Normal",
            StackStyle::CenterDropOctave => "Center Drop 12",
            StackStyle::CenterDropOctave2 => "Center Drop 24",
            StackStyle::Octave => "Octave",
            StackStyle::Octave2 => "2x Octave",
            StackStyle::PowerChord => "Power Chord",
            StackStyle::PowerChord2 => "2x Power Chord",
            StackStyle::MajorChord => "Major Chord",
            StackStyle::MinorChord => "Minor Chord",
            StackStyle::HarmonicSeries => "Harmonics",
            StackStyle::OddHarmonicSeries => "Odd Harmonics",
        }
    }

    /// Frequency multiplier for unison pair `pair`.
    pub fn multiplier(self, pair: usize) -> f32 {
        let cycle = |semitones: &[f32]| semitones_to_ratio(semitones[pair % semitones.len()]);
        match self {
            StackStyle::Normal => 1.0,
            StackStyle::CenterDropOctave => {
                if pair == 0 {
                    0.5
                } else {
                    1.0
                }
            }
            StackStyle::CenterDropOctave2 => match pair {
                0 => 0.25,
                1 => 0.5,
                _ => 1.0,
            },
            StackStyle::Octave => cycle(OCTAVE),
            StackStyle::Octave2 => cycle(OCTAVE_2),
            StackStyle::PowerChord => cycle(POWER_CHORD),
            StackStyle::PowerChord2 => cycle(POWER_CHORD_2),
            StackStyle::MajorChord => cycle(MAJOR_CHORD),
            StackStyle::MinorChord => cycle(MINOR_CHORD),
            StackStyle::HarmonicSeries => (pair + 1) as f32,
            StackStyle::OddHarmonicSeries => (2 * pair + 1) as f32,
        }
    }
}

/// Which channels a voice feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Both channels.
    Center,
    /// Left channel.
    Left,
    /// Right channel.
    Right,
}

/// Signed position of `voice` across the stack, in `[-1, 1]`.
///
/// Positions are evenly spaced and alternate sharp and flat: with four
/// voices they are `1/3, -1/3, 1, -1`. An odd stack puts voice 0 at 0.
pub fn stack_position(voice: usize, voices: usize) -> f32 {
    if voices <= 1 {
        return 0.0;
    }
    let (rank, sharp) = if voices % 2 == 1 {
        if voice == 0 {
            return 0.0;
        }
        (2 * ((voice - 1) / 2 + 1), voice % 2 == 1)
    } else {
        (2 * (voice / 2) + 1, voice % 2 == 0)
    };
    let magnitude = rank as f32 / (voices - 1) as f32;
    if sharp { magnitude } else { -magnitude }
}

/// Unison pair `voice` belongs to.
pub fn pair_index(voice: usize, voices: usize) -> usize {
    if voices % 2 == 1 {
        if voice == 0 { 0 } else { (voice - 1) / 2 + 1 }
    } else {
        voice / 2
    }
}

/// Channel placement of `voice`.
pub fn placement(voice: usize, voices: usize) -> Placement {
    if voices % 2 == 1 {
        match voice {
            0 => Placement::Center,
            v if v % 2 == 1 => Placement::Left,
            _ => Placement::Right,
        }
    } else if voice % 2 == 0 {
        Placement::Left
    } else {
        Placement::Right
    }
}

/// Detune settings for one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detune {
    /// Detune amount in `[0, 1]`.
    pub amount: f32,
    /// Full-scale detune in semitones.
    pub range: f32,
    /// Curve applied to stack positions; 0 keeps them evenly spaced.
    pub power: f32,
}

impl Detune {
    /// Detune of `voice` in cents.
    pub fn cents(&self, voice: usize, voices: usize) -> f32 {
        let position = stack_position(voice, voices);
        power_scale(position, self.power) * self.amount * self.range * 100.0
    }
}

/// Frequency ratio of every voice in a stack of `voices`.
///
/// `ratios` must hold at least `voices` entries.
pub fn voice_ratios(voices: usize, detune: &Detune, style: StackStyle, ratios: &mut [f32]) {
    for (voice, ratio) in ratios.iter_mut().enumerate().take(voices) {
        let stack = style.multiplier(pair_index(voice, voices));
        *ratio = stack * cents_to_ratio(detune.cents(voice, voices));
    }
}
