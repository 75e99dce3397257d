//! Render a wavetable's frames to a WAV file.

use crate::commands::common::{linear_to_db, peak, render_in_background};
use clap::Args;
use morphwave_config::resolve_wavetable;
use morphwave_io::{WavSpec, write_wav};
use morphwave_spectral::WAVEFORM_SIZE;
use std::path::PathBuf;

#[derive(Args)]
pub struct RenderArgs {
    /// Wavetable JSON file or built-in table name
    #[arg(value_name = "TABLE")]
    table: String,

    /// Output WAV file
    #[arg(short, long)]
    output: PathBuf,

    /// Scale each frame to full scale on its own
    #[arg(long)]
    normalize_frames: bool,

    /// Sample rate written to the file header
    #[arg(long, default_value = "44100")]
    sample_rate: u32,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let creator = resolve_wavetable(&args.table, None)?;
    let (renderer, complete) = render_in_background(&creator)?;
    let reader = renderer.reader();
    let snapshot = reader.mark_used();

    let mut samples = Vec::with_capacity(snapshot.num_frames * WAVEFORM_SIZE);
    for frame in &snapshot.waves {
        let start = samples.len();
        samples.extend_from_slice(frame);
        if args.normalize_frames {
            normalize(&mut samples[start..]);
        }
    }

    println!(
        "Rendered {} frame(s) of {} samples, peak {:.1} dB",
        complete.num_frames,
        WAVEFORM_SIZE,
        linear_to_db(peak(&samples))
    );

    let spec = WavSpec::mono(args.sample_rate).with_bits(args.bit_depth);
    write_wav(&args.output, &samples, spec)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}

fn normalize(frame: &mut [f32]) {
    let max = peak(frame);
    if max > 0.0 {
        let scale = 1.0 / max;
        frame.iter_mut().for_each(|s| *s *= scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_frame() {
        let mut frame = [0.25, -0.5, 0.1];
        normalize(&mut frame);
        assert_eq!(frame, [0.5, -1.0, 0.2]);

        let mut silent = [0.0; 4];
        normalize(&mut silent);
        assert_eq!(silent, [0.0; 4]);
    }
}
