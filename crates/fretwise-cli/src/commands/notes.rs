//! Note table command.

use super::common::load_notes;
use clap::Args;
use fretwise_dataset::NoteTable;
use std::path::PathBuf;

#[derive(Args)]
pub struct NotesArgs {
    /// Output CSV file (prints to stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Load this CSV and check it forms a complete fretboard instead
    #[arg(long, value_name = "CSV", conflicts_with = "output")]
    check: Option<PathBuf>,
}

pub fn run(args: NotesArgs) -> anyhow::Result<()> {
    if let Some(path) = args.check {
        let table = load_notes(Some(&path))?;
        table.validate_layout()?;
        println!("{}: {} notes, layout OK", path.display(), table.len());
        return Ok(());
    }

    let table = NoteTable::standard();
    match args.output {
        Some(path) => {
            table.save_csv(&path)?;
            println!("Wrote {} notes to {}", table.len(), path.display());
        }
        None => table.write_csv(std::io::stdout().lock())?,
    }
    Ok(())
}
