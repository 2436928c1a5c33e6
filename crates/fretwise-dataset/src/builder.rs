//! Batch generation of labeled harmonic samples.
//!
//! Every (note, sample index) pair is an independent unit of work with its
//! own random stream derived from the run seed, so sequential and parallel
//! runs with the same seed produce identical datasets in identical order.

use crate::config::DatasetConfig;
use crate::dataset::{Dataset, RejectedSample};
use crate::error::DatasetError;
use crate::note_table::NoteTable;
use fretwise_analysis::{AnalysisError, HarmonicRatioCalculator, SpectralPeakEstimator};
use fretwise_core::{HarmonicSample, NoteFrequency};
use fretwise_synth::{SignalSynthesizer, SynthError, unit_stream};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Batch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Samples generated per note table row.
    pub samples_per_note: usize,
    /// Run seed; a random one is drawn (and logged) when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Spread units over the rayon thread pool.
    pub parallel: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            samples_per_note: 10,
            seed: None,
            parallel: true,
        }
    }
}

impl BuilderConfig {
    /// Reject settings that cannot produce a dataset.
    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.samples_per_note == 0 {
            return Err(DatasetError::InvalidConfig(
                "samples_per_note must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of one unit: a sample, or the record of why there is none.
type UnitOutcome = Result<HarmonicSample, RejectedSample>;

/// Synthesizes, analyzes, and labels one sample per (note, index) pair.
#[derive(Debug, Clone)]
pub struct TrainingSampleBuilder {
    synth: SignalSynthesizer,
    estimator: SpectralPeakEstimator,
    calculator: HarmonicRatioCalculator,
    config: BuilderConfig,
}

impl TrainingSampleBuilder {
    /// Create a builder from a validated pipeline configuration.
    pub fn new(config: &DatasetConfig) -> Result<Self, DatasetError> {
        config.builder.validate()?;
        Ok(Self {
            synth: SignalSynthesizer::new(config.synth.clone())?,
            estimator: SpectralPeakEstimator::new(config.estimator.clone())?,
            calculator: HarmonicRatioCalculator::new(),
            config: config.builder.clone(),
        })
    }

    /// Batch settings.
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Generate `table.len() * samples_per_note` samples.
    pub fn build(&self, table: &NoteTable) -> Result<Dataset, DatasetError> {
        self.build_with_progress(table, || {})
    }

    /// Like [`build`](Self::build), calling `on_unit` after each unit finishes.
    ///
    /// `on_unit` may run concurrently from several threads.
    pub fn build_with_progress<F>(
        &self,
        table: &NoteTable,
        on_unit: F,
    ) -> Result<Dataset, DatasetError>
    where
        F: Fn() + Sync,
    {
        let seed = self
            .config
            .seed
            .unwrap_or_else(|| rand::rng().random::<u64>());
        let per_note = self.config.samples_per_note;
        let total = table.len() * per_note;

        tracing::info!(
            notes = table.len(),
            samples_per_note = per_note,
            seed,
            parallel = self.config.parallel,
            "building harmonic dataset"
        );

        let run = |unit: usize| -> Result<UnitOutcome, SynthError> {
            let note = &table.entries()[unit / per_note];
            let outcome = self.run_unit(note, unit % per_note, seed, unit as u64);
            on_unit();
            outcome
        };

        let outcomes: Vec<UnitOutcome> = if self.config.parallel {
            (0..total)
                .into_par_iter()
                .map(run)
                .collect::<Result<_, _>>()?
        } else {
            (0..total).map(run).collect::<Result<_, _>>()?
        };

        let mut dataset = Dataset::with_seed(seed);
        for outcome in outcomes {
            match outcome {
                Ok(sample) => dataset.samples.push(sample),
                Err(rejected) => dataset.rejected.push(rejected),
            }
        }

        tracing::info!(
            samples = dataset.samples.len(),
            rejected = dataset.rejected.len(),
            "dataset complete"
        );
        Ok(dataset)
    }

    fn run_unit(
        &self,
        note: &NoteFrequency,
        sample_index: usize,
        seed: u64,
        unit: u64,
    ) -> Result<UnitOutcome, SynthError> {
        let mut rng = unit_stream(seed, unit);
        let waveform = self.synth.synthesize(note.frequency, &mut rng)?;

        let reject = |fundamental: Option<f32>, reason: AnalysisError| {
            tracing::warn!(
                string = note.string,
                fret = note.fret,
                sample_index,
                %reason,
                "sample rejected"
            );
            RejectedSample {
                label: note.clone(),
                sample_index,
                fundamental,
                reason,
            }
        };

        let fundamental = match self.estimator.estimate(&waveform) {
            Ok(f0) if f0.is_nan() => {
                return Ok(Err(reject(None, AnalysisError::NoPeakDetected)));
            }
            Ok(f0) => f0,
            Err(e) => return Ok(Err(reject(None, e))),
        };

        match self.calculator.ratios(&waveform, fundamental) {
            Ok(ratios) => Ok(Ok(HarmonicSample::new(note.clone(), fundamental, ratios))),
            Err(e) => Ok(Err(reject(Some(fundamental), e))),
        }
    }
}
