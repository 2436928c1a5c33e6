//! Labeled harmonic analysis results.

use crate::{NUM_HARMONICS, NoteFrequency};

/// Ground-truth note paired with what the analysis engine measured.
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicSample {
    /// The note table row the waveform was synthesized from.
    pub label: NoteFrequency,
    /// Estimated fundamental frequency (Hz).
    pub fundamental: f32,
    /// Harmonic magnitudes normalized by their maximum.
    pub harmonic_ratios: [f32; NUM_HARMONICS],
    /// Harmonic frequencies implied by the estimate: `fundamental * i`.
    pub harmonics: [f32; NUM_HARMONICS],
}

impl HarmonicSample {
    /// Build a sample, deriving the harmonic frequencies from `fundamental`.
    pub fn new(
        label: NoteFrequency,
        fundamental: f32,
        harmonic_ratios: [f32; NUM_HARMONICS],
    ) -> Self {
        let harmonics = std::array::from_fn(|i| fundamental * (i + 1) as f32);
        Self {
            label,
            fundamental,
            harmonic_ratios,
            harmonics,
        }
    }
}
