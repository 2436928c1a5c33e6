//! Labeled harmonic dataset generation.
//!
//! This crate wires the synthesizer and the analysis engine into a batch
//! pipeline over a guitar note table.
//!
//! # Features
//!
//! - **Note tables**: the built-in standard-tuning table, or any CSV with
//!   `string, string_name, fret, note, frequency` columns
//! - **Sample building**: one synthesized, analyzed, labeled sample per
//!   (note, sample index) pair, sequential or parallel, reproducible by seed
//! - **Export**: JSON, JSON Lines, and flat CSV with rejected units kept as
//!   marked records; JSON import
//! - **Frequency variations**: jittered input frequencies labeled with the true note
//! - **Configuration**: TOML files with `[synth]`, `[estimator]`, `[builder]` sections
//!
//! # Example
//!
//! ```rust,no_run
//! use fretwise_dataset::{DatasetConfig, NoteTable, OutputFormat, TrainingSampleBuilder};
//!
//! let config = DatasetConfig::load("fretwise.toml").unwrap();
//! let table = NoteTable::load_csv("guitar_notes.csv").unwrap();
//!
//! let builder = TrainingSampleBuilder::new(&config).unwrap();
//! let dataset = builder.build(&table).unwrap();
//! dataset.save("harmonic_training_data.json", OutputFormat::Json).unwrap();
//! ```

mod builder;
mod config;
mod csv_text;
mod dataset;
mod error;
mod note_table;
mod variations;

pub use builder::{BuilderConfig, TrainingSampleBuilder};
pub use config::DatasetConfig;
pub use dataset::{Dataset, OutputFormat, RejectedSample, RejectionReason, SampleRecord};
pub use error::{DatasetError, MalformedReason};
pub use note_table::{NOTE_TABLE_COLUMNS, NoteTable, STANDARD_TABLE_LEN};
pub use variations::{
    FrequencyVariation, generate_variations, save_variations_csv, write_variations_csv,
};
