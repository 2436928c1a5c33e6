//! Frequency variation command.

use super::common::{load_notes, resolve_seed};
use clap::Args;
use fretwise_dataset::{generate_variations, save_variations_csv};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

#[derive(Args)]
pub struct VariationsArgs {
    /// Output CSV file
    #[arg(short, long)]
    output: PathBuf,

    /// Note table CSV (standard tuning when omitted)
    #[arg(long, value_name = "CSV")]
    notes: Option<PathBuf>,

    /// Variations per note
    #[arg(short = 'k', long, default_value = "10")]
    per_note: usize,

    /// Standard deviation as a fraction of each note's frequency
    #[arg(long, default_value = "0.02")]
    noise_factor: f32,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
}

pub fn run(args: VariationsArgs) -> anyhow::Result<()> {
    let table = load_notes(args.notes.as_deref())?;
    let mut rng = StdRng::seed_from_u64(resolve_seed(args.seed));

    let variations = generate_variations(&table, args.per_note, args.noise_factor, &mut rng)?;
    save_variations_csv(&variations, &args.output)?;

    println!(
        "Wrote {} variations ({} notes x {}) to {}",
        variations.len(),
        table.len(),
        args.per_note,
        args.output.display()
    );
    Ok(())
}
