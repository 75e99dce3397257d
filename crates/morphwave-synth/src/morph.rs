//! Spectral morph kernels.
//!
//! Every kernel reads one frame's harmonic tables from a [`WavetableData`]
//! and writes a complex spectrum into `dest[..=last_harmonic]`. The
//! [`SpectralMorpher`] then clears everything above `last_harmonic`,
//! inverse-transforms, and wraps the result into a [`WaveBuffer`].
//!
//! Kernels take the remapped `shift` from [`SpectralMorph::shift`], never the
//! raw control amount.
//!
//! | Morph | Effect | `shift` |
//! |-------|--------|---------|
//! | `Vocode` | formant shift: harmonic `i` takes the envelope at `i * shift` | `2^(-amount * 2)` |
//! | `FormScale` | as `Vocode`, odd and even harmonics read separately | `2^(-amount * 2)` |
//! | `HarmonicScale` | harmonic `i` moves to bin `i * shift` | `1 + 3 * amount` |
//! | `InharmonicScale` | high harmonics move further than low ones | `1 + 3 * amount` |
//! | `Smear` | each harmonic carries into the next | `amount` |
//! | `RandomAmplitudes` | seeded random gain per harmonic | `amount` |
//! | `LowPass` / `HighPass` | brick wall with a one-bin fade | cutoff bin |
//! | `PhaseDisperse` | parabolic phase ramp around harmonic 24 | `amount` |
//! | `ShepardTone` | even harmonics glide to the octave below | `amount` |
//! | `Skew` | higher harmonics read further along the table | `amount` |

use crate::random_values::{NUM_RANDOM_STAGES, RandomValues};
use crate::wave_buffer::WaveBuffer;
use morphwave_core::lerp;
use morphwave_spectral::{Complex32, FourierTransform, WAVEFORM_BITS};
use morphwave_wavetable::{NUM_HARMONICS, WavetableData};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Highest harmonic index a kernel may write (the Nyquist bin).
pub const MAX_HARMONIC: usize = NUM_HARMONICS - 1;

const MAX_FORMANT_SHIFT: f32 = 2.0;
const MAX_HARMONIC_SCALE: f32 = 4.0;
const INHARMONIC_OCTAVES: f32 = 10.0;
const PHASE_DISPERSE_CENTER: f32 = 24.0;
const PHASE_DISPERSE_SCALE: f32 = 0.05;
const RANDOM_ONSET: f32 = 4.0;
const SHEPARD_UNWRAP_RATIO: f32 = 2.0;

/// Frequency-domain transform applied to frames before playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpectralMorph {
    /// Frames play as stored.
    #[default]
    None,
    /// Formant shift.
    Vocode,
    /// Formant shift with odd and even harmonics kept apart.
    FormScale,
    /// Stretch harmonic spacing.
    HarmonicScale,
    /// Stretch harmonic spacing more at the top than the bottom.
    InharmonicScale,
    /// Smear energy up the harmonic series.
    Smear,
    /// Seeded random harmonic gains.
    RandomAmplitudes,
    /// Brick-wall low pass.
    LowPass,
    /// Brick-wall high pass.
    HighPass,
    /// Phase dispersion.
    PhaseDisperse,
    /// Octave glide for endless rising tables.
    ShepardTone,
    /// Harmonics read from frames further along the table.
    Skew,
}

/// Kernel signature: `(table, frame, dest, shift, last_harmonic)`.
pub type MorphKernel = fn(&WavetableData, usize, &mut [Complex32], f32, usize);

impl SpectralMorph {
    /// Every morph, in control order.
    pub const ALL: [SpectralMorph; 12] = [
        SpectralMorph::None,
        SpectralMorph::Vocode,
        SpectralMorph::FormScale,
        SpectralMorph::HarmonicScale,
        SpectralMorph::InharmonicScale,
        SpectralMorph::Smear,
        SpectralMorph::RandomAmplitudes,
        SpectralMorph::LowPass,
        SpectralMorph::HighPass,
        SpectralMorph::PhaseDisperse,
        SpectralMorph::ShepardTone,
        SpectralMorph::Skew,
    ];

    /// Map a control amount in `[0, 1]` to the kernel's shift.
    pub fn shift(self, amount: f32) -> f32 {
        let amount = amount.clamp(0.0, 1.0);
        let max_bin_bits = (WAVEFORM_BITS - 1) as f32;
        match self {
            SpectralMorph::Vocode | SpectralMorph::FormScale => {
                (-amount * MAX_FORMANT_SHIFT).exp2()
            }
            SpectralMorph::HarmonicScale | SpectralMorph::InharmonicScale => {
                1.0 + amount * (MAX_HARMONIC_SCALE - 1.0)
            }
            SpectralMorph::LowPass => (max_bin_bits * (1.0 - amount)).exp2(),
            SpectralMorph::HighPass => (max_bin_bits * amount).exp2(),
            SpectralMorph::None
            | SpectralMorph::Smear
            | SpectralMorph::RandomAmplitudes
            | SpectralMorph::PhaseDisperse
            | SpectralMorph::ShepardTone
            | SpectralMorph::Skew => amount,
        }
    }

    /// The kernel implementing this morph.
    pub fn kernel(self) -> MorphKernel {
        match self {
            SpectralMorph::None => passthrough,
            SpectralMorph::Vocode => vocode,
            SpectralMorph::FormScale => form_scale,
            SpectralMorph::HarmonicScale => harmonic_scale,
            SpectralMorph::InharmonicScale => inharmonic_scale,
            SpectralMorph::Smear => smear,
            SpectralMorph::RandomAmplitudes => random_amplitudes,
            SpectralMorph::LowPass => low_pass,
            SpectralMorph::HighPass => high_pass,
            SpectralMorph::PhaseDisperse => phase_disperse,
            SpectralMorph::ShepardTone => shepard,
            SpectralMorph::Skew => skew,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            SpectralMorph::None => "None",
            SpectralMorph::Vocode => "Vocode",
            SpectralMorph::FormScale => "Form Scale",
            SpectralMorph::HarmonicScale => "Harmonic Stretch",
            SpectralMorph::InharmonicScale => "Inharmonic Stretch",
            SpectralMorph::Smear => "Smear",
            SpectralMorph::RandomAmplitudes => "Random Amplitudes",
            SpectralMorph::LowPass => "Low Pass",
            SpectralMorph::HighPass => "High Pass",
            SpectralMorph::PhaseDisperse => "Phase Disperse",
            SpectralMorph::ShepardTone => "Shepard Tone",
            SpectralMorph::Skew => "Skew",
        }
    }
}

/// Runs kernels and turns their spectra into playable buffers.
///
/// Owns the transform and the spectrum scratch, so one morpher serves any
/// number of buffers without allocating.
#[derive(Debug)]
pub struct SpectralMorpher {
    transform: FourierTransform,
    spectrum: Vec<Complex32>,
}

impl SpectralMorpher {
    /// A morpher for `WAVEFORM_SIZE` frames.
    pub fn new() -> Self {
        Self {
            transform: FourierTransform::new(WAVEFORM_BITS),
            spectrum: vec![Complex32::new(0.0, 0.0); NUM_HARMONICS],
        }
    }

    /// Morph frame `frame` of `data` into `out`.
    ///
    /// `last_harmonic` is the highest harmonic that may sound at the playing
    /// pitch; everything above it is silenced.
    pub fn render(
        &mut self,
        morph: SpectralMorph,
        data: &WavetableData,
        frame: usize,
        amount: f32,
        last_harmonic: usize,
        out: &mut WaveBuffer,
    ) {
        self.morph_spectrum(morph, data, frame, amount, last_harmonic);
        out.load_spectrum(&mut self.transform, &self.spectrum);
    }

    /// Run the kernel and cutoff without transforming. The result is left in
    /// [`spectrum`](Self::spectrum).
    pub fn morph_spectrum(
        &mut self,
        morph: SpectralMorph,
        data: &WavetableData,
        frame: usize,
        amount: f32,
        last_harmonic: usize,
    ) {
        let last_harmonic = last_harmonic.min(MAX_HARMONIC);
        let frame = data.clamp_frame(frame);
        self.spectrum.fill(Complex32::new(0.0, 0.0));
        (morph.kernel())(data, frame, &mut self.spectrum, morph.shift(amount), last_harmonic);
        self.spectrum[last_harmonic + 1..].fill(Complex32::new(0.0, 0.0));
    }

    /// Spectrum from the last call.
    pub fn spectrum(&self) -> &[Complex32] {
        &self.spectrum
    }
}

impl Default for SpectralMorpher {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn bin(data: &WavetableData, frame: usize, harmonic: usize) -> Complex32 {
    data.frame_normalized(frame)[harmonic] * data.frame_amplitudes(frame)[harmonic]
}

// Envelope amplitude `offset` harmonics past `lo`, blending towards the
// harmonic `stride` above. Past the table it is silent.
#[inline]
fn envelope_at(amplitudes: &[f32], lo: usize, offset: f32, stride: usize) -> f32 {
    if lo >= NUM_HARMONICS {
        return 0.0;
    }
    let hi = amplitudes.get(lo + stride).copied().unwrap_or(0.0);
    lerp(amplitudes[lo], hi, offset / stride as f32)
}

/// Frame as stored.
pub fn passthrough(
    data: &WavetableData,
    frame: usize,
    dest: &mut [Complex32],
    _shift: f32,
    last_harmonic: usize,
) {
    for (i, value) in dest.iter_mut().enumerate().take(last_harmonic + 1) {
        *value = bin(data, frame, i);
    }
}

/// Harmonic `i` keeps its phase and takes the amplitude the spectral
/// envelope has at `i * shift`.
pub fn vocode(
    data: &WavetableData,
    frame: usize,
    dest: &mut [Complex32],
    shift: f32,
    last_harmonic: usize,
) {
    let amplitudes = data.frame_amplitudes(frame);
    let normalized = data.frame_normalized(frame);
    dest[0] = bin(data, frame, 0);
    for i in 1..=last_harmonic {
        let position = (i as f32 * shift).max(1.0);
        let lo = position as usize;
        dest[i] = normalized[i] * envelope_at(amplitudes, lo, position - lo as f32, 1);
    }
}

/// Like [`vocode`], but odd harmonics only read odd harmonics and even
/// harmonics only read even ones.
pub fn form_scale(
    data: &WavetableData,
    frame: usize,
    dest: &mut [Complex32],
    shift: f32,
    last_harmonic: usize,
) {
    let amplitudes = data.frame_amplitudes(frame);
    let normalized = data.frame_normalized(frame);
    dest[0] = bin(data, frame, 0);
    for i in 1..=last_harmonic {
        let parity = i % 2;
        let lowest = if parity == 0 { 2.0 } else { 1.0 };
        let position = (i as f32 * shift).max(lowest);
        let pairs = ((position - parity as f32) / 2.0).floor() as usize;
        let lo = 2 * pairs + parity;
        dest[i] = normalized[i] * envelope_at(amplitudes, lo, position - lo as f32, 2);
    }
}

/// Harmonic `i` moves to bin `i * shift`, split linearly between the two
/// nearest bins.
pub fn harmonic_scale(
    data: &WavetableData,
    frame: usize,
    dest: &mut [Complex32],
    shift: f32,
    last_harmonic: usize,
) {
    scatter(data, frame, dest, last_harmonic, |i| i as f32 * shift);
}

/// Harmonic `i` moves to bin `i * shift^(log2(i) / 10)`: the fundamental
/// stays put and the top of the spectrum moves by the full `shift`.
pub fn inharmonic_scale(
    data: &WavetableData,
    frame: usize,
    dest: &mut [Complex32],
    shift: f32,
    last_harmonic: usize,
) {
    scatter(data, frame, dest, last_harmonic, |i| {
        let octave = (i as f32).log2() / INHARMONIC_OCTAVES;
        i as f32 * shift.powf(octave)
    });
}

fn scatter(
    data: &WavetableData,
    frame: usize,
    dest: &mut [Complex32],
    last_harmonic: usize,
    destination: impl Fn(usize) -> f32,
) {
    dest[0] = bin(data, frame, 0);
    for i in 1..NUM_HARMONICS {
        let position = destination(i);
        let lo = position as usize;
        if lo > last_harmonic {
            break;
        }
        let t = position - lo as f32;
        let value = bin(data, frame, i);
        dest[lo] += value * (1.0 - t);
        if lo < last_harmonic {
            dest[lo + 1] += value * t;
        }
    }
}

/// Each harmonic blends towards a decaying carry of the one below it.
pub fn smear(
    data: &WavetableData,
    frame: usize,
    dest: &mut [Complex32],
    shift: f32,
    last_harmonic: usize,
) {
    let amplitudes = data.frame_amplitudes(frame);
    let normalized = data.frame_normalized(frame);
    dest[0] = bin(data, frame, 0);
    let mut carry = 0.0;
    for i in 1..=last_harmonic {
        let amplitude = lerp(amplitudes[i], carry, shift);
        dest[i] = normalized[i] * amplitude;
        carry = amplitude * i as f32 / (i + 1) as f32;
    }
}

/// Scale harmonics by seeded random gains. Larger shifts step through more
/// random stages.
pub fn random_amplitudes(
    data: &WavetableData,
    frame: usize,
    dest: &mut [Complex32],
    shift: f32,
    last_harmonic: usize,
) {
    let values = RandomValues::get();
    let stage = shift * (NUM_RANDOM_STAGES - 1) as f32;
    let depth = (shift * RANDOM_ONSET).min(1.0);
    dest[0] = bin(data, frame, 0);
    for i in 1..=last_harmonic {
        let gain = lerp(1.0, 2.0 * values.value(stage, i), depth);
        dest[i] = bin(data, frame, i) * gain;
    }
}

/// Keep harmonics up to bin `shift`, fading the next bin by the fraction.
pub fn low_pass(
    data: &WavetableData,
    frame: usize,
    dest: &mut [Complex32],
    shift: f32,
    last_harmonic: usize,
) {
    let full = (shift.max(0.0) as usize).min(last_harmonic);
    let fraction = shift - shift.floor();
    for i in 0..=full {
        dest[i] = bin(data, frame, i);
    }
    if full < last_harmonic {
        dest[full + 1] = bin(data, frame, full + 1) * fraction;
    }
}

/// Keep harmonics from bin `shift` up, fading the bin below by the fraction.
pub fn high_pass(
    data: &WavetableData,
    frame: usize,
    dest: &mut [Complex32],
    shift: f32,
    last_harmonic: usize,
) {
    let edge = shift.max(0.0) as usize;
    if edge > last_harmonic {
        return;
    }
    let fraction = shift - shift.floor();
    dest[edge] = bin(data, frame, edge) * (1.0 - fraction);
    for i in edge + 1..=last_harmonic {
        dest[i] = bin(data, frame, i);
    }
}

/// Rotate harmonic `i` by `shift * 0.05 * (i - 24)^2` radians.
pub fn phase_disperse(
    data: &WavetableData,
    frame: usize,
    dest: &mut [Complex32],
    shift: f32,
    last_harmonic: usize,
) {
    if shift == 0.0 {
        passthrough(data, frame, dest, shift, last_harmonic);
        return;
    }
    dest[0] = bin(data, frame, 0);
    for i in 1..=last_harmonic {
        let offset = i as f32 - PHASE_DISPERSE_CENTER;
        let rotation = Complex32::from_polar(1.0, shift * PHASE_DISPERSE_SCALE * offset * offset);
        dest[i] = bin(data, frame, i) * rotation;
    }
}

/// Even harmonic `2k` glides towards harmonic `k` and odd harmonics fade
/// out, so at full shift the frame sounds an octave lower.
///
/// Phases are blended through their unwrapped angle when the two amplitudes
/// are within a factor of two; otherwise the unit vectors are blended
/// directly.
pub fn shepard(
    data: &WavetableData,
    frame: usize,
    dest: &mut [Complex32],
    shift: f32,
    last_harmonic: usize,
) {
    let amplitudes = data.frame_amplitudes(frame);
    let normalized = data.frame_normalized(frame);
    dest[0] = bin(data, frame, 0);
    for i in 1..=last_harmonic {
        if i % 2 == 1 {
            dest[i] = bin(data, frame, i) * (1.0 - shift);
            continue;
        }
        let (from_amplitude, to_amplitude) = (amplitudes[i], amplitudes[i / 2]);
        let (from_phase, to_phase) = (normalized[i], normalized[i / 2]);
        let amplitude = lerp(from_amplitude, to_amplitude, shift);

        let ratio = if to_amplitude > 0.0 {
            from_amplitude / to_amplitude
        } else {
            0.0
        };
        let unit = if ratio >= 1.0 / SHEPARD_UNWRAP_RATIO && ratio <= SHEPARD_UNWRAP_RATIO {
            let start = from_phase.arg();
            let delta = wrap_angle(to_phase.arg() - start);
            Complex32::from_polar(1.0, start + delta * shift)
        } else {
            let blended = from_phase * (1.0 - shift) + to_phase * shift;
            let norm = blended.norm();
            if norm > f32::EPSILON {
                blended / norm
            } else {
                from_phase
            }
        };
        dest[i] = unit * amplitude;
    }
}

#[inline]
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI { wrapped + 2.0 * PI } else { wrapped }
}

/// Harmonic `i` reads from a frame `shift * octave(i) * (frames - 1)` further
/// along the table, where `octave(i)` runs from 0 at the fundamental to 1 at
/// Nyquist. Shepard tables wrap, others clamp. Single-frame tables pass
/// through.
pub fn skew(
    data: &WavetableData,
    frame: usize,
    dest: &mut [Complex32],
    shift: f32,
    last_harmonic: usize,
) {
    if data.num_frames <= 1 {
        passthrough(data, frame, dest, shift, last_harmonic);
        return;
    }
    let last_frame = (data.num_frames - 1) as f32;
    let top_octave = (MAX_HARMONIC as f32).log2();
    for i in 0..=last_harmonic {
        let octave = (i.max(1) as f32).log2() / top_octave;
        let mut position = frame as f32 + shift * octave * last_frame;
        position = if data.shepard_table {
            position.rem_euclid(data.num_frames as f32)
        } else {
            position.clamp(0.0, last_frame)
        };
        let lo = position as usize;
        let t = position - lo as f32;
        let hi = if data.shepard_table {
            (lo + 1) % data.num_frames
        } else {
            (lo + 1).min(data.num_frames - 1)
        };
        let amplitude = lerp(data.frame_amplitudes(lo)[i], data.frame_amplitudes(hi)[i], t);
        let unit = data.frame_normalized(lo)[i] * (1.0 - t) + data.frame_normalized(hi)[i] * t;
        dest[i] = unit * amplitude;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morphwave_spectral::{PredefinedWaveFrames, Shape};
    use morphwave_wavetable::Wavetable;

    fn table(shapes: &[Shape]) -> Wavetable {
        let mut table = Wavetable::new(shapes.len());
        for (i, &shape) in shapes.iter().enumerate() {
            table.load_wave_frame(PredefinedWaveFrames::get(shape), i);
        }
        table.post_process(0.0);
        table
    }

    fn morphed(morph: SpectralMorph, table: &Wavetable, frame: usize, amount: f32) -> Vec<Complex32> {
        let mut morpher = SpectralMorpher::new();
        morpher.morph_spectrum(morph, table.data(), frame, amount, MAX_HARMONIC);
        morpher.spectrum().to_vec()
    }

    #[test]
    fn test_zero_vocode_is_passthrough() {
        let table = table(&[Shape::Saw]);
        let plain = morphed(SpectralMorph::None, &table, 0, 0.0);
        assert_eq!(morphed(SpectralMorph::Vocode, &table, 0, 0.0), plain);
        assert_eq!(morphed(SpectralMorph::FormScale, &table, 0, 0.0), plain);
    }

    #[test]
    fn test_unit_harmonic_scale_is_passthrough() {
        let table = table(&[Shape::Saw]);
        let plain = morphed(SpectralMorph::None, &table, 0, 0.0);
        assert_eq!(SpectralMorph::HarmonicScale.shift(0.0), 1.0);
        assert_eq!(morphed(SpectralMorph::HarmonicScale, &table, 0, 0.0), plain);
        assert_eq!(morphed(SpectralMorph::InharmonicScale, &table, 0, 0.0), plain);
    }

    #[test]
    fn test_harmonic_scale_doubles_spacing() {
        let table = table(&[Shape::Saw]);
        let mut morpher = SpectralMorpher::new();
        let data = table.data();
        morpher.morph_spectrum(SpectralMorph::None, data, 0, 0.0, MAX_HARMONIC);
        let plain = morpher.spectrum().to_vec();
        let mut dest = vec![Complex32::new(0.0, 0.0); NUM_HARMONICS];
        harmonic_scale(data, 0, &mut dest, 2.0, MAX_HARMONIC);
        assert!((dest[2] - plain[1]).norm() < 1e-3);
        assert!((dest[4] - plain[2]).norm() < 1e-3);
        assert!(dest[3].norm() < 1e-3);
    }

    #[test]
    fn test_cutoff_clears_upper_bins() {
        let table = table(&[Shape::Saw]);
        for morph in SpectralMorph::ALL {
            let mut morpher = SpectralMorpher::new();
            morpher.morph_spectrum(morph, table.data(), 0, 0.7, 40);
            assert!(
                morpher.spectrum()[41..].iter().all(|b| b.re == 0.0 && b.im == 0.0),
                "{} leaked above the cutoff",
                morph.name()
            );
        }
    }

    #[test]
    fn test_low_pass_fades_one_bin() {
        let table = table(&[Shape::Saw]);
        let mut dest = vec![Complex32::new(0.0, 0.0); NUM_HARMONICS];
        low_pass(table.data(), 0, &mut dest, 8.5, MAX_HARMONIC);
        let full = bin(table.data(), 0, 9);
        assert_eq!(dest[8], bin(table.data(), 0, 8));
        assert!((dest[9] - full * 0.5).norm() < 1e-3);
        assert_eq!(dest[10], Complex32::new(0.0, 0.0));

        high_pass(table.data(), 0, &mut dest, 100.0, MAX_HARMONIC);
        assert_eq!(dest[100], bin(table.data(), 0, 100));
    }

    #[test]
    fn test_smear_keeps_fundamental() {
        let table = table(&[Shape::Square]);
        let plain = morphed(SpectralMorph::None, &table, 0, 0.0);
        let smeared = morphed(SpectralMorph::Smear, &table, 0, 0.8);
        assert!((smeared[1].norm() - 0.2 * plain[1].norm()).abs() < 1e-2 * plain[1].norm());
        // the square has no even harmonics of its own
        assert!(smeared[2].norm() > plain[2].norm() + 1.0);
    }

    #[test]
    fn test_shepard_full_shift_moves_octave_down() {
        let table = table(&[Shape::Saw]);
        let plain = morphed(SpectralMorph::None, &table, 0, 0.0);
        let shifted = morphed(SpectralMorph::ShepardTone, &table, 0, 1.0);
        assert!(shifted[1].norm() < 1e-3);
        assert!((shifted[2].norm() - plain[1].norm()).abs() < 1e-2 * plain[1].norm());
        assert!((shifted[4].norm() - plain[2].norm()).abs() < 1e-2 * plain[2].norm());
    }

    #[test]
    fn test_skew_single_frame_passthrough() {
        let table = table(&[Shape::Saw]);
        let plain = morphed(SpectralMorph::None, &table, 0, 0.0);
        assert_eq!(morphed(SpectralMorph::Skew, &table, 0, 1.0), plain);
    }

    #[test]
    fn test_skew_reads_later_frames_for_high_harmonics() {
        let table = table(&[Shape::Sin, Shape::Saw]);
        let skewed = morphed(SpectralMorph::Skew, &table, 0, 1.0);
        // the fundamental stays on the sine frame, the top reads the saw
        let sine = morphed(SpectralMorph::None, &table, 0, 0.0);
        let saw = morphed(SpectralMorph::None, &table, 1, 0.0);
        assert!((skewed[1] - sine[1]).norm() < 1e-3);
        assert!((skewed[MAX_HARMONIC - 1].norm() - saw[MAX_HARMONIC - 1].norm()).abs() < 1e-2);
    }

    #[test]
    fn test_random_amplitudes_are_deterministic() {
        let table = table(&[Shape::Saw]);
        let a = morphed(SpectralMorph::RandomAmplitudes, &table, 0, 0.5);
        let b = morphed(SpectralMorph::RandomAmplitudes, &table, 0, 0.5);
        assert_eq!(a, b);
        let plain = morphed(SpectralMorph::None, &table, 0, 0.0);
        assert_eq!(morphed(SpectralMorph::RandomAmplitudes, &table, 0, 0.0), plain);
    }

    #[test]
    fn test_render_produces_playable_buffer() {
        let table = table(&[Shape::Sin]);
        let mut morpher = SpectralMorpher::new();
        let mut buffer = WaveBuffer::new();
        morpher.render(SpectralMorph::None, table.data(), 0, 0.0, MAX_HARMONIC, &mut buffer);
        let sin = PredefinedWaveFrames::get(Shape::Sin);
        for (a, b) in buffer.cycle().iter().zip(&sin.time_domain) {
            assert!((a - b).abs() < 1e-3);
        }
    }
}
