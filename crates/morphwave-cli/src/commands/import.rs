//! Build a wavetable from a WAV file.

use clap::{Args, ValueEnum};
use morphwave_config::save_wavetable;
use morphwave_io::read_wav;
use morphwave_wavetable::{AudioLoadStyle, WavetableCreator};
use std::path::PathBuf;

/// How the audio is cut into frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImportStyle {
    /// Consecutive 2048-sample windows
    Splice,
    /// One detected period per frame with randomised phases
    Vocoded,
    /// One detected period per frame, blended in frequency
    Pitched,
}

impl From<ImportStyle> for AudioLoadStyle {
    fn from(style: ImportStyle) -> Self {
        match style {
            ImportStyle::Splice => AudioLoadStyle::WavetableSplice,
            ImportStyle::Vocoded => AudioLoadStyle::Vocoded,
            ImportStyle::Pitched => AudioLoadStyle::Pitched,
        }
    }
}

#[derive(Args)]
pub struct ImportArgs {
    /// Input WAV file
    #[arg(value_name = "AUDIO")]
    input: PathBuf,

    /// Output wavetable JSON file
    #[arg(short, long)]
    output: PathBuf,

    /// How to cut the audio into frames
    #[arg(long, value_enum, default_value = "splice")]
    style: ImportStyle,

    /// Table name (defaults to the input file name)
    #[arg(long)]
    name: Option<String>,

    /// Author stored in the table
    #[arg(long)]
    author: Option<String>,
}

pub fn run(args: ImportArgs) -> anyhow::Result<()> {
    let (samples, spec) = read_wav(&args.input)?;
    if samples.is_empty() {
        anyhow::bail!("{} holds no audio", args.input.display());
    }
    println!(
        "Read {} samples at {} Hz from {}",
        samples.len(),
        spec.sample_rate,
        args.input.display()
    );

    let mut creator = WavetableCreator::new();
    let window = creator.init_from_audio(&samples, spec.sample_rate as f32, args.style.into());
    let name = args.name.or_else(|| {
        args.input
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
    });
    if let Some(name) = name {
        creator.set_name(name);
    }
    if let Some(author) = args.author {
        creator.set_author(author);
    }

    println!(
        "Window {:.1} samples ({:.1} Hz), style {:?}",
        window,
        spec.sample_rate as f32 / window,
        args.style
    );

    save_wavetable(&creator, &args.output)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}
