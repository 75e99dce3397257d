//! Detect the fundamental period of a WAV file.

use clap::Args;
use morphwave_core::freq_to_midi;
use morphwave_io::read_wav;
use morphwave_spectral::{DEFAULT_MAX_PERIOD, detect_period};
use std::path::PathBuf;

const NOTE_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

#[derive(Args)]
pub struct PitchArgs {
    /// Input WAV file
    #[arg(value_name = "AUDIO")]
    input: PathBuf,

    /// Longest period to search, in samples
    #[arg(long, default_value_t = DEFAULT_MAX_PERIOD)]
    max_period: usize,

    /// Skip this many seconds before analysing
    #[arg(long, default_value = "0")]
    start: f32,
}

pub fn run(args: PitchArgs) -> anyhow::Result<()> {
    let (samples, spec) = read_wav(&args.input)?;
    let sample_rate = spec.sample_rate as f32;
    let offset = ((args.start.max(0.0) * sample_rate) as usize).min(samples.len());

    let Some(period) = detect_period(&samples[offset..], args.max_period) else {
        anyhow::bail!(
            "no stable period found in {} (need at least two cycles of audio)",
            args.input.display()
        );
    };

    let frequency = sample_rate / period;
    let midi = freq_to_midi(frequency);
    println!("Period:    {period:.1} samples");
    println!("Frequency: {frequency:.2} Hz");
    println!("Note:      {}", note_name(midi));
    Ok(())
}

/// Nearest note name with the cents offset, e.g. `A4 +3c`.
fn note_name(midi: f32) -> String {
    let nearest = midi.round();
    let cents = ((midi - nearest) * 100.0).round() as i32;
    let index = nearest as i32;
    let name = NOTE_NAMES[index.rem_euclid(12) as usize];
    let octave = index.div_euclid(12) - 1;
    format!("{name}{octave} {cents:+}c")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_name() {
        assert_eq!(note_name(69.0), "A4 +0c");
        assert_eq!(note_name(60.25), "C4 +25c");
        assert_eq!(note_name(70.8), "B4 -20c");
        assert_eq!(note_name(0.0), "C-1 +0c");
    }
}
