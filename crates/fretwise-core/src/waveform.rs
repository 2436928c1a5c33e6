//! Immutable mono sample buffers.

use thiserror::Error;

/// Error returned when a waveform carries no energy to work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("waveform is empty or has zero energy")]
pub struct EmptySignal;

/// A mono sequence of samples at a fixed sample rate.
///
/// Waveforms are never modified in place. Transformations such as
/// [`Waveform::normalized`] return a new buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: f32,
}

impl Waveform {
    /// Wrap a sample buffer recorded or synthesized at `sample_rate` Hz.
    pub fn new(samples: Vec<f32>, sample_rate: f32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// All-zero waveform of `len` samples.
    pub fn silence(len: usize, sample_rate: f32) -> Self {
        Self::new(vec![0.0; len], sample_rate)
    }

    /// Sample data.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the waveform holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate
    }

    /// Sum of squared samples.
    pub fn energy(&self) -> f32 {
        self.samples.iter().map(|&s| s * s).sum()
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0_f32, |acc, &s| acc.max(s.abs()))
    }

    /// True for empty or all-zero waveforms.
    pub fn is_silent(&self) -> bool {
        self.peak() == 0.0
    }

    /// Return a copy scaled so the peak absolute sample is 1.0.
    pub fn normalized(&self) -> Result<Waveform, EmptySignal> {
        let peak = self.peak();
        if peak == 0.0 || !peak.is_finite() {
            return Err(EmptySignal);
        }
        let gain = 1.0 / peak;
        Ok(Self::new(
            self.samples.iter().map(|&s| s * gain).collect(),
            self.sample_rate,
        ))
    }

    /// Consume the waveform and return its samples.
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}
