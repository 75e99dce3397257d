//! Upgrade a saved wavetable to the current layout.

use clap::Args;
use morphwave_config::save_wavetable;
use morphwave_wavetable::{FORMAT_VERSION, WavetableCreator, migrate};
use std::path::PathBuf;

#[derive(Args)]
pub struct MigrateArgs {
    /// Wavetable JSON file written by any earlier version
    pub input: PathBuf,

    /// Where to write the upgraded file (defaults to rewriting the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: MigrateArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.input)?;
    let mut state: serde_json::Value = serde_json::from_str(&text)?;
    let saved = migrate(&mut state)?;

    let mut creator = WavetableCreator::new();
    creator.json_to_state(&state)?;

    let output = args.output.unwrap_or_else(|| args.input.clone());
    save_wavetable(&creator, &output)?;

    println!(
        "Migrated '{}' from {saved} to {FORMAT_VERSION}: {} group(s), {} frame(s)",
        creator.name(),
        creator.groups().len(),
        creator.last_keyframe_position().max(0) + 1
    );
    println!("Wrote {}", output.display());
    Ok(())
}
