//! Render a note through the wavetable oscillator.

use crate::commands::common::{
    apply_overrides, linear_to_db, load_preset, parse_key_val, peak, render_in_background,
};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use morphwave_config::{Preset, preset_wavetable, resolve_wavetable, validate_settings};
use morphwave_core::midi_to_freq;
use morphwave_io::{StereoSamples, WavSpec, write_wav_stereo};
use morphwave_synth::{OscillatorOutput, SynthOscillator};
use std::path::PathBuf;

#[derive(Args)]
pub struct PlayArgs {
    /// Wavetable JSON file or built-in table name (defaults to the preset's)
    #[arg(value_name = "TABLE")]
    table: Option<String>,

    /// Output WAV file
    #[arg(short, long)]
    output: PathBuf,

    /// Preset name or path
    #[arg(short, long)]
    preset: Option<String>,

    /// MIDI note to play (fractional notes allowed)
    #[arg(short, long, default_value = "60")]
    note: f32,

    /// Length of the note in seconds
    #[arg(short, long, default_value = "2.0")]
    seconds: f32,

    /// Oscillator parameter override (e.g., "unison_voices=7")
    #[arg(long = "set", value_parser = parse_key_val, number_of_values = 1)]
    overrides: Vec<(String, String)>,

    /// Sweep the table position from this value to `wave_frame` over the note
    #[arg(long)]
    sweep_from: Option<f32>,

    /// Sample rate (defaults to the preset's hint)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Processing block size
    #[arg(long, default_value = "256")]
    block_size: usize,

    /// Seed for the unison phase randomiser
    #[arg(long)]
    seed: Option<u64>,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: PlayArgs) -> anyhow::Result<()> {
    if args.block_size == 0 {
        anyhow::bail!("block size must be at least 1");
    }
    let (preset, preset_dir) = match &args.preset {
        Some(name) => load_preset(name)?,
        None => (Preset::new("Default"), None),
    };
    let settings = apply_overrides(&preset.oscillator, &args.overrides)?;
    validate_settings(&settings)?;

    let creator = match &args.table {
        Some(table) => resolve_wavetable(table, None)?,
        None => preset_wavetable(&preset, preset_dir.as_deref())?,
    };
    let (renderer, complete) = render_in_background(&creator)?;
    let reader = renderer.reader();

    let sample_rate = args.sample_rate.unwrap_or(preset.sample_rate);
    let total = (args.seconds.max(0.0) * sample_rate as f32).round() as usize;

    println!(
        "Playing '{}' note {:.2} ({:.1} Hz) for {:.2}s on {} frame(s)",
        preset.name,
        args.note,
        midi_to_freq(args.note),
        args.seconds,
        complete.num_frames
    );

    let mut osc = match args.seed {
        Some(seed) => SynthOscillator::with_seed(sample_rate as f32, seed),
        None => SynthOscillator::new(sample_rate as f32),
    };
    osc.set_settings(&settings);
    osc.reset(0);

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut left = Vec::with_capacity(total);
    let mut right = Vec::with_capacity(total);
    let mut block = OscillatorOutput::new(args.block_size);
    let mut swept = settings.clone();

    while left.len() < total {
        if let Some(start) = args.sweep_from {
            let t = left.len() as f32 / total as f32;
            swept.wave_frame = start + (settings.wave_frame - start) * t;
            osc.set_settings(&swept);
        }

        {
            let snapshot = reader.mark_used();
            osc.process(&snapshot, args.note, None, &mut block);
        }

        let take = args.block_size.min(total - left.len());
        left.extend_from_slice(&block.levelled.left[..take]);
        right.extend_from_slice(&block.levelled.right[..take]);
        pb.set_position(left.len() as u64);
    }
    pb.finish_and_clear();

    let samples = StereoSamples::new(left, right);
    println!(
        "Peak L {:.1} dB, R {:.1} dB",
        linear_to_db(peak(&samples.left)),
        linear_to_db(peak(&samples.right))
    );

    let spec = WavSpec::stereo(sample_rate).with_bits(args.bit_depth);
    write_wav_stereo(&args.output, &samples, spec)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}
