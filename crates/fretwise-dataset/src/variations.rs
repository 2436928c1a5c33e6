//! Jittered input frequencies labeled with their true note.
//!
//! Models detuned strings and imperfect pitch tracking: each row of the
//! note table is repeated with its frequency drawn from a normal
//! distribution centred on the true value, with a standard deviation that
//! scales with pitch.

use crate::csv_text;
use crate::error::DatasetError;
use crate::note_table::NoteTable;
use fretwise_synth::GaussianNoise;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Write};
use std::path::Path;

/// A jittered frequency and the note it was drawn around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyVariation {
    /// Observed (jittered) frequency in Hz.
    pub input_frequency: f32,
    /// Table frequency in Hz.
    pub true_frequency: f32,
    /// Note name.
    pub note: String,
    /// String number, 1 = Low E.
    pub string: u8,
    /// Fret number.
    pub fret: u8,
}

/// Draw `per_note` variations of every table row.
///
/// `input_frequency ~ N(f, (noise_factor * f)^2)`. Rows are emitted in table
/// order, `per_note` consecutive variations each.
pub fn generate_variations<R: Rng + ?Sized>(
    table: &NoteTable,
    per_note: usize,
    noise_factor: f32,
    rng: &mut R,
) -> Result<Vec<FrequencyVariation>, DatasetError> {
    if !noise_factor.is_finite() || noise_factor < 0.0 {
        return Err(DatasetError::InvalidConfig(format!(
            "noise_factor must be finite and non-negative, got {noise_factor}"
        )));
    }

    let mut variations = Vec::with_capacity(table.len() * per_note);
    for entry in table.entries() {
        let noise = GaussianNoise::new(f64::from(noise_factor * entry.frequency))?;
        for _ in 0..per_note {
            variations.push(FrequencyVariation {
                input_frequency: (f64::from(entry.frequency) + noise.sample(rng)) as f32,
                true_frequency: entry.frequency,
                note: entry.note.clone(),
                string: entry.string,
                fret: entry.fret,
            });
        }
    }

    tracing::info!(
        notes = table.len(),
        per_note,
        noise_factor,
        variations = variations.len(),
        "generated frequency variations"
    );
    Ok(variations)
}

/// Write variations as CSV.
pub fn write_variations_csv<W: Write>(
    variations: &[FrequencyVariation],
    mut writer: W,
) -> std::io::Result<()> {
    writeln!(writer, "input_frequency,true_frequency,note,string,fret")?;
    for v in variations {
        writeln!(
            writer,
            "{},{},{},{},{}",
            v.input_frequency,
            v.true_frequency,
            csv_text::quote(&v.note),
            v.string,
            v.fret
        )?;
    }
    Ok(())
}

/// Write variations to a CSV file.
pub fn save_variations_csv(
    variations: &[FrequencyVariation],
    path: impl AsRef<Path>,
) -> Result<(), DatasetError> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|e| DatasetError::write_file(path, e))?;
    let mut writer = BufWriter::new(file);
    write_variations_csv(variations, &mut writer)
        .and_then(|()| writer.flush())
        .map_err(|e| DatasetError::write_file(path, e))
}
