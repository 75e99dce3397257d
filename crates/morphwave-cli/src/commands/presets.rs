//! Preset management commands.
//!
//! Provides commands to list, show, save, and manage oscillator presets.

use crate::commands::common::{apply_overrides, load_preset, parse_key_val};
use clap::{Args, Subcommand};
use morphwave_config::{
    Preset, ensure_user_presets_dir, factory_presets, get_factory_preset, list_system_presets,
    list_user_presets, list_user_wavetables, name_from_path, system_presets_dir, user_config_dir,
    user_presets_dir, user_wavetables_dir, validate_preset,
};
use std::path::Path;

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List available presets (factory and user)
    List {
        /// Show only factory presets
        #[arg(long)]
        factory: bool,

        /// Show only user presets
        #[arg(long)]
        user: bool,
    },

    /// Show details of a preset
    Show {
        /// Preset name or path
        name: String,
    },

    /// Save oscillator settings as a user preset
    Save {
        /// Name for the new preset
        name: String,

        /// Preset to start from (defaults to the initial settings)
        #[arg(long)]
        from: Option<String>,

        /// Oscillator parameter override (e.g., "detune=0.4")
        #[arg(long = "set", value_parser = parse_key_val, number_of_values = 1)]
        overrides: Vec<(String, String)>,

        /// Wavetable file or built-in table name
        #[arg(short, long)]
        wavetable: Option<String>,

        /// Description of the preset
        #[arg(short, long)]
        description: Option<String>,

        /// Overwrite if preset already exists
        #[arg(long)]
        force: bool,
    },

    /// Delete a user preset
    Delete {
        /// Preset name to delete
        name: String,

        /// Don't ask for confirmation
        #[arg(long)]
        force: bool,
    },

    /// Copy a factory preset to user presets for customization
    Copy {
        /// Factory preset name
        source: String,

        /// New preset name (optional, uses source name if not specified)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Show preset and wavetable directories
    Paths,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List { factory, user } => list_presets(factory, user),
        PresetsCommand::Show { name } => show_preset(&name),
        PresetsCommand::Save {
            name,
            from,
            overrides,
            wavetable,
            description,
            force,
        } => {
            let base = match from {
                Some(source) => load_preset(&source)?.0,
                None => Preset::default(),
            };
            let mut preset = Preset::new(name)
                .with_sample_rate(base.sample_rate)
                .with_oscillator(apply_overrides(&base.oscillator, &overrides)?);
            if let Some(table) = wavetable.or(base.wavetable) {
                preset = preset.with_wavetable(table);
            }
            if let Some(desc) = description.or(base.description) {
                preset = preset.with_description(desc);
            }
            save_preset(&preset, force)
        }
        PresetsCommand::Delete { name, force } => delete_preset(&name, force),
        PresetsCommand::Copy { source, name } => copy_preset(&source, name.as_deref()),
        PresetsCommand::Paths => show_paths(),
    }
}

fn list_presets(factory_only: bool, user_only: bool) -> anyhow::Result<()> {
    let show_factory = !user_only;
    let show_user = !factory_only;

    if show_factory {
        println!("Factory Presets:");
        println!("================");
        for preset in factory_presets() {
            let desc = preset.description.as_deref().unwrap_or("");
            println!("  {:20} - {}", preset.name, desc);
        }
        println!();
    }

    if show_user {
        println!("User Presets:");
        println!("=============");
        let mut user_presets = list_user_presets();
        user_presets.extend(list_system_presets());
        if user_presets.is_empty() {
            println!("  (none)");
            println!();
            println!("  Create a preset with: morphwave presets save <name> --set key=value\n");
        } else {
            for path in user_presets {
                print_preset_line(&path);
            }
        }
        println!();
    }

    Ok(())
}

fn print_preset_line(path: &Path) {
    let name = name_from_path(path).unwrap_or_else(|| "unknown".to_string());
    match Preset::load(path) {
        Ok(preset) => {
            let desc = preset.description.as_deref().unwrap_or("");
            println!("  {name:20} - {desc}");
        }
        Err(_) => println!("  {name:20} - (error loading)"),
    }
}

fn show_preset(name: &str) -> anyhow::Result<()> {
    let (preset, _) = load_preset(name)?;

    println!("Preset: {}", preset.name);
    println!("{}", "=".repeat(8 + preset.name.len()));
    println!();

    if let Some(desc) = &preset.description {
        println!("Description: {desc}");
        println!();
    }

    println!("Sample Rate: {} Hz", preset.sample_rate);
    println!(
        "Wavetable:   {}",
        preset.wavetable.as_deref().unwrap_or("(default saw)")
    );
    println!();

    println!("Oscillator:");
    let settings = toml::to_string_pretty(&preset.oscillator)?;
    for line in settings.lines().filter(|line| !line.is_empty()) {
        println!("  {line}");
    }

    Ok(())
}

fn save_preset(preset: &Preset, force: bool) -> anyhow::Result<()> {
    validate_preset(preset)?;

    let dir = ensure_user_presets_dir()?;
    let preset_path = dir.join(format!("{}.toml", preset.name));

    if preset_path.exists() && !force {
        anyhow::bail!(
            "Preset '{}' already exists. Use --force to overwrite.",
            preset.name
        );
    }

    preset.save(&preset_path)?;

    println!("Saved preset '{}' to {}", preset.name, preset_path.display());
    Ok(())
}

fn delete_preset(name: &str, force: bool) -> anyhow::Result<()> {
    if get_factory_preset(name).is_some() {
        anyhow::bail!("Cannot delete factory preset '{name}'. Factory presets are built-in.");
    }

    let preset_path = user_presets_dir().join(format!("{name}.toml"));

    if !preset_path.exists() {
        anyhow::bail!("User preset '{name}' not found.");
    }

    if !force {
        anyhow::bail!("Use --force to confirm deletion of preset '{name}'.");
    }

    std::fs::remove_file(&preset_path)?;
    println!("Deleted preset '{name}'.");

    Ok(())
}

fn copy_preset(source: &str, new_name: Option<&str>) -> anyhow::Result<()> {
    let preset = get_factory_preset(source)
        .ok_or_else(|| anyhow::anyhow!("Factory preset '{source}' not found."))?;

    let target_name = new_name.unwrap_or(source);

    let dir = ensure_user_presets_dir()?;
    let preset_path = dir.join(format!("{target_name}.toml"));

    if preset_path.exists() {
        anyhow::bail!(
            "Preset '{target_name}' already exists in user presets. Choose a different name with --name."
        );
    }

    let mut copy = Preset::new(target_name)
        .with_sample_rate(preset.sample_rate)
        .with_oscillator(preset.oscillator.clone());
    if let Some(desc) = &preset.description {
        copy = copy.with_description(format!("{desc} (copy)"));
    }
    if let Some(table) = &preset.wavetable {
        copy = copy.with_wavetable(table.clone());
    }

    copy.save(&preset_path)?;

    println!("Copied factory preset '{source}' to user preset '{target_name}'");
    println!("Path: {}", preset_path.display());

    Ok(())
}

fn show_paths() -> anyhow::Result<()> {
    println!("Preset Directories:");
    println!("===================");
    println!();
    println!("User presets:    {}", user_presets_dir().display());
    println!("System presets:  {}", system_presets_dir().display());
    println!("User wavetables: {}", user_wavetables_dir().display());
    println!("Config dir:      {}", user_config_dir().display());

    let tables = list_user_wavetables();
    if !tables.is_empty() {
        println!();
        println!("User wavetables ({}):", tables.len());
        for path in tables {
            if let Some(name) = name_from_path(&path) {
                println!("  {name}");
            }
        }
    }

    Ok(())
}
