//! Fretwise CLI - synthetic guitar notes, harmonic analysis, and training datasets.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fretwise")]
#[command(author, version, about = "Fretwise guitar harmonic analysis CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print or check a guitar note table
    Notes(commands::notes::NotesArgs),

    /// Generate a labeled harmonic dataset
    Generate(commands::generate::GenerateArgs),

    /// Estimate the fundamental and harmonic ratios of one note
    Analyze(commands::analyze::AnalyzeArgs),

    /// Render a synthesized note to WAV
    Render(commands::render::RenderArgs),

    /// Generate jittered frequency variations of the note table
    Variations(commands::variations::VariationsArgs),

    /// Print or validate pipeline configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Notes(args) => commands::notes::run(args),
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Render(args) => commands::render::run(args),
        Commands::Variations(args) => commands::variations::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
