//! Display wavetable or WAV file metadata.

use clap::Args;
use morphwave_config::load_wavetable;
use morphwave_io::{WavFormat, read_wav_info};
use morphwave_wavetable::{FORMAT_VERSION, Version};
use std::path::{Path, PathBuf};

/// Display wavetable or WAV file information.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to a wavetable JSON file or a WAV file
    pub file: PathBuf,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let is_wav = args
        .file
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));

    if is_wav {
        wav_info(&args.file)?;
    } else {
        table_info(&args.file)?;
    }

    let file_size = std::fs::metadata(&args.file)?.len();
    println!("File Size:   {}", format_bytes(file_size));
    Ok(())
}

fn table_info(path: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)?;
    let state: serde_json::Value = serde_json::from_str(&text)?;
    let saved = Version::of(&state)?;
    let creator = load_wavetable(path)?;

    println!("File:        {}", path.display());
    println!("Name:        {}", non_empty(creator.name()));
    println!("Author:      {}", non_empty(creator.author()));
    if saved >= FORMAT_VERSION.parse::<Version>()? {
        println!("Version:     {saved}");
    } else {
        println!("Version:     {saved} (migrates to {FORMAT_VERSION})");
    }
    println!("Frames:      {}", creator.last_keyframe_position().max(0) + 1);
    println!("Shepard:     {}", if creator.is_shepard_table() { "yes" } else { "no" });
    println!(
        "Processing:  remove DC {}, full normalize {}",
        on_off(creator.remove_all_dc()),
        on_off(creator.full_normalize())
    );

    for (i, group) in creator.groups().iter().enumerate() {
        println!("Group {}:", i + 1);
        for component in group.components() {
            println!(
                "  {:20} {} keyframe(s)",
                component.component_type().name(),
                component.num_keyframes()
            );
        }
    }
    Ok(())
}

fn wav_info(path: &Path) -> anyhow::Result<()> {
    let info = read_wav_info(path)?;

    let format_str = match info.format {
        WavFormat::Pcm => "PCM",
        WavFormat::IeeeFloat => "IEEE Float",
    };

    println!("File:        {}", path.display());
    println!("Format:      {} {}-bit", format_str, info.bits_per_sample);
    println!("Channels:    {}", info.channels);
    println!("Sample Rate: {} Hz", info.sample_rate);
    println!(
        "Duration:    {:.3}s ({} frames)",
        info.duration_secs, info.num_frames
    );
    Ok(())
}

fn non_empty(text: &str) -> &str {
    if text.is_empty() { "(none)" } else { text }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
