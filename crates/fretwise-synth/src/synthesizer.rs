//! Harmonic tone synthesis.

use crate::{GaussianNoise, SynthError};
use fretwise_core::{DEFAULT_DURATION, DEFAULT_SAMPLE_RATE, NUM_HARMONICS, Waveform};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Synthesis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Duration in seconds.
    pub duration: f32,
    /// Standard deviation of the additive Gaussian noise (0 disables noise).
    pub noise_std: f64,
    /// Number of harmonic partials, fundamental included (1 = pure tone).
    pub partials: usize,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            duration: DEFAULT_DURATION,
            noise_std: 0.01,
            partials: NUM_HARMONICS,
        }
    }
}

impl SynthConfig {
    /// Noise-free variant of this configuration.
    pub fn clean(&self) -> Self {
        Self {
            noise_std: 0.0,
            ..self.clone()
        }
    }

    /// Check that every field can produce a waveform.
    pub fn validate(&self) -> Result<(), SynthError> {
        if self.sample_rate == 0 {
            return Err(SynthError::invalid("sample_rate", self.sample_rate));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(SynthError::invalid("duration", self.duration));
        }
        if !self.noise_std.is_finite() || self.noise_std < 0.0 {
            return Err(SynthError::invalid("noise_std", self.noise_std));
        }
        if self.partials == 0 {
            return Err(SynthError::invalid("partials", self.partials));
        }
        Ok(())
    }

    /// Number of samples a waveform rendered with this configuration holds.
    pub fn num_samples(&self) -> usize {
        (f64::from(self.duration) * f64::from(self.sample_rate)).round() as usize
    }
}

/// Renders synthetic notes: `sum_i (1/i) * sin(2*pi*f*i*t)` plus Gaussian noise.
///
/// # Example
///
/// ```rust
/// use fretwise_synth::{SignalSynthesizer, SynthConfig};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let synth = SignalSynthesizer::new(SynthConfig::default()).unwrap();
/// let a = synth.synthesize(110.0, &mut StdRng::seed_from_u64(9)).unwrap();
/// let b = synth.synthesize(110.0, &mut StdRng::seed_from_u64(9)).unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone)]
pub struct SignalSynthesizer {
    config: SynthConfig,
    noise: GaussianNoise,
}

impl SignalSynthesizer {
    /// Create a synthesizer, rejecting unusable settings.
    pub fn new(config: SynthConfig) -> Result<Self, SynthError> {
        config.validate()?;
        let noise = GaussianNoise::new(config.noise_std)?;
        Ok(Self { config, noise })
    }

    /// Active configuration.
    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Render `frequency` Hz, drawing noise from `rng`.
    ///
    /// The generator is only consumed when `noise_std > 0`.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        frequency: f32,
        rng: &mut R,
    ) -> Result<Waveform, SynthError> {
        let mut samples = self.harmonic_series(frequency)?;
        if self.noise.std_dev() > 0.0 {
            for sample in &mut samples {
                *sample += self.noise.sample(rng) as f32;
            }
        }
        Ok(Waveform::new(samples, self.config.sample_rate as f32))
    }

    /// Render `frequency` Hz without noise.
    pub fn synthesize_clean(&self, frequency: f32) -> Result<Waveform, SynthError> {
        let samples = self.harmonic_series(frequency)?;
        Ok(Waveform::new(samples, self.config.sample_rate as f32))
    }

    fn harmonic_series(&self, frequency: f32) -> Result<Vec<f32>, SynthError> {
        if !frequency.is_finite() || frequency <= 0.0 {
            return Err(SynthError::invalid("frequency", frequency));
        }

        let sample_rate = f64::from(self.config.sample_rate);
        let freq = f64::from(frequency);

        let samples = (0..self.config.num_samples())
            .map(|n| {
                let t = n as f64 / sample_rate;
                (1..=self.config.partials)
                    .map(|i| {
                        let i = i as f64;
                        (TAU * freq * i * t).sin() / i
                    })
                    .sum::<f64>() as f32
            })
            .collect();

        Ok(samples)
    }
}

/// Single sinusoid at unit amplitude.
pub fn pure_tone(frequency: f32, duration: f32, sample_rate: f32) -> Waveform {
    let num_samples = (f64::from(duration) * f64::from(sample_rate)).round() as usize;
    let samples = (0..num_samples)
        .map(|n| (TAU * f64::from(frequency) * n as f64 / f64::from(sample_rate)).sin() as f32)
        .collect();
    Waveform::new(samples, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_default_length() {
        let synth = SignalSynthesizer::new(SynthConfig::default()).unwrap();
        let wf = synth.synthesize_clean(82.0).unwrap();
        assert_eq!(wf.len(), 22050);
        assert_eq!(wf.sample_rate(), 44100.0);
    }

    #[test]
    fn test_clean_signal_starts_at_zero() {
        let synth = SignalSynthesizer::new(SynthConfig::default()).unwrap();
        let wf = synth.synthesize_clean(440.0).unwrap();
        assert_eq!(wf.samples()[0], 0.0);
    }

    #[test]
    fn test_clean_matches_formula() {
        let synth = SignalSynthesizer::new(SynthConfig::default()).unwrap();
        let wf = synth.synthesize_clean(100.0).unwrap();

        let n = 37;
        let t = n as f64 / 44100.0;
        let expected: f64 = (1..=5)
            .map(|i| (TAU * 100.0 * i as f64 * t).sin() / i as f64)
            .sum();
        assert!((wf.samples()[n] - expected as f32).abs() < 1e-6);
    }

    #[test]
    fn test_noise_is_added() {
        let synth = SignalSynthesizer::new(SynthConfig::default()).unwrap();
        let clean = synth.synthesize_clean(220.0).unwrap();
        let noisy = synth
            .synthesize(220.0, &mut StdRng::seed_from_u64(3))
            .unwrap();

        let residual: Vec<f32> = noisy
            .samples()
            .iter()
            .zip(clean.samples())
            .map(|(a, b)| a - b)
            .collect();
        let rms = (residual.iter().map(|r| r * r).sum::<f32>() / residual.len() as f32).sqrt();
        assert!((rms - 0.01).abs() < 0.002, "noise rms {rms}");
    }

    #[test]
    fn test_different_seeds_differ() {
        let synth = SignalSynthesizer::new(SynthConfig::default()).unwrap();
        let a = synth.synthesize(220.0, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = synth.synthesize(220.0, &mut StdRng::seed_from_u64(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejects_bad_frequency() {
        let synth = SignalSynthesizer::new(SynthConfig::default()).unwrap();
        assert!(synth.synthesize_clean(0.0).is_err());
        assert!(synth.synthesize_clean(f32::NAN).is_err());
        assert!(synth.synthesize_clean(-440.0).is_err());
    }

    #[test]
    fn test_rejects_bad_config() {
        let bad = [
            SynthConfig { sample_rate: 0, ..SynthConfig::default() },
            SynthConfig { duration: 0.0, ..SynthConfig::default() },
            SynthConfig { noise_std: -0.1, ..SynthConfig::default() },
            SynthConfig { partials: 0, ..SynthConfig::default() },
        ];
        for config in bad {
            assert!(SignalSynthesizer::new(config).is_err());
        }
    }

    #[test]
    fn test_pure_tone_peak() {
        let wf = pure_tone(441.0, 0.5, 44100.0);
        assert_eq!(wf.len(), 22050);
        assert!((wf.peak() - 1.0).abs() < 1e-3);
    }
}
