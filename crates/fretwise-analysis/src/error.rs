//! Error types for the analysis engine.

use fretwise_core::EmptySignal;
use thiserror::Error;

/// Errors raised while analyzing a waveform.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The waveform is empty or has zero energy.
    #[error("waveform is empty or has zero energy")]
    EmptySignal,

    /// No spectral peak cleared the threshold in any frame.
    ///
    /// The estimator itself reports this as a NaN fundamental; the variant
    /// exists so callers can record why a sample was unusable.
    #[error("no spectral peak detected")]
    NoPeakDetected,

    /// Harmonic magnitudes could not be normalized (NaN fundamental or zero maximum).
    #[error("cannot normalize harmonic magnitudes for fundamental {fundamental} Hz")]
    DegenerateNormalization {
        /// Fundamental estimate the ratios were requested for.
        fundamental: f32,
    },

    /// Analysis settings are unusable.
    #[error("invalid analysis configuration: {0}")]
    InvalidConfig(String),
}

impl From<EmptySignal> for AnalysisError {
    fn from(_: EmptySignal) -> Self {
        AnalysisError::EmptySignal
    }
}
