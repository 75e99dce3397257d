//! Morphwave CLI - render, play and convert wavetables from the command line.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "morphwave")]
#[command(author, version, about = "Morphwave wavetable engine CLI", long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every frame of a wavetable to a WAV file
    Render(commands::render::RenderArgs),

    /// Play a note through the oscillator into a WAV file
    Play(commands::play::PlayArgs),

    /// Build a wavetable from a WAV file
    Import(commands::import::ImportArgs),

    /// Detect the pitch of a WAV file
    Pitch(commands::pitch::PitchArgs),

    /// Show information about a wavetable or WAV file
    Info(commands::info::InfoArgs),

    /// Upgrade a wavetable file to the current format
    Migrate(commands::migrate::MigrateArgs),

    /// List and manage oscillator presets
    Presets(commands::presets::PresetsArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Play(args) => commands::play::run(args),
        Commands::Import(args) => commands::import::run(args),
        Commands::Pitch(args) => commands::pitch::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Migrate(args) => commands::migrate::run(args),
        Commands::Presets(args) => commands::presets::run(args),
    }
}
