//! Dataset generation command.

use super::common::{load_config, load_notes, resolve_seed};
use clap::{Args, ValueEnum};
use fretwise_dataset::{OutputFormat, TrainingSampleBuilder};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// Output formats for CLI
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliFormat {
    Json,
    Jsonl,
    Csv,
}

impl From<CliFormat> for OutputFormat {
    fn from(f: CliFormat) -> Self {
        match f {
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Jsonl => OutputFormat::JsonLines,
            CliFormat::Csv => OutputFormat::Csv,
        }
    }
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Output dataset file
    #[arg(short, long)]
    output: PathBuf,

    /// Note table CSV (standard tuning when omitted)
    #[arg(long, value_name = "CSV")]
    notes: Option<PathBuf>,

    /// Samples per note (overrides the config file)
    #[arg(short = 'k', long)]
    samples_per_note: Option<usize>,

    /// Run seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Output format (inferred from the extension when omitted)
    #[arg(long, value_enum)]
    format: Option<CliFormat>,

    /// Pipeline configuration TOML
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Process units on the calling thread only
    #[arg(long)]
    sequential: bool,
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(k) = args.samples_per_note {
        config.builder.samples_per_note = k;
    }
    if args.seed.is_some() {
        config.builder.seed = args.seed;
    }
    config.builder.seed = Some(resolve_seed(config.builder.seed));
    if args.sequential {
        config.builder.parallel = false;
    }
    config.validate()?;

    let format = args
        .format
        .map(OutputFormat::from)
        .or_else(|| OutputFormat::from_extension(&args.output))
        .unwrap_or_default();

    // Table errors surface here, before any synthesis
    let table = load_notes(args.notes.as_deref())?;
    let builder = TrainingSampleBuilder::new(&config)?;

    let total = table.len() * config.builder.samples_per_note;
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let dataset = builder.build_with_progress(&table, || pb.inc(1))?;
    pb.finish_and_clear();

    dataset.save(&args.output, format)?;

    println!(
        "Wrote {} records ({} accepted, {} rejected) to {} [{}]",
        dataset.total(),
        dataset.len(),
        dataset.rejected.len(),
        args.output.display(),
        format
    );
    if let Some(seed) = dataset.seed {
        println!("Seed: {seed}");
    }
    Ok(())
}
