//! Harmonic magnitude ratios.
//!
//! Takes one DFT over the whole waveform, reads the magnitude at the bin
//! nearest each multiple of the fundamental, and scales the vector so its
//! largest entry is exactly 1.

use crate::AnalysisError;
use crate::fft::Fft;
use fretwise_core::{NUM_HARMONICS, Waveform};

/// Computes normalized magnitudes of the first [`NUM_HARMONICS`] harmonics.
#[derive(Debug, Clone, Copy, Default)]
pub struct HarmonicRatioCalculator;

impl HarmonicRatioCalculator {
    /// Create a calculator.
    pub fn new() -> Self {
        Self
    }

    /// Raw DFT magnitudes at `fundamental * i` for `i = 1..=5`.
    pub fn magnitudes(
        &self,
        waveform: &Waveform,
        fundamental: f32,
    ) -> Result<[f32; NUM_HARMONICS], AnalysisError> {
        if waveform.is_empty() {
            return Err(AnalysisError::EmptySignal);
        }
        if !fundamental.is_finite() {
            return Err(AnalysisError::DegenerateNormalization { fundamental });
        }

        let len = waveform.len();
        let spectrum = Fft::new(len).magnitudes(waveform.samples());
        let sample_rate = waveform.sample_rate();

        Ok(std::array::from_fn(|i| {
            let target = fundamental * (i + 1) as f32;
            spectrum[nearest_bin(target, len, sample_rate)]
        }))
    }

    /// Harmonic magnitudes divided by their maximum.
    ///
    /// Every entry lies in `[0, 1]` and the strongest harmonic is exactly 1.
    pub fn ratios(
        &self,
        waveform: &Waveform,
        fundamental: f32,
    ) -> Result<[f32; NUM_HARMONICS], AnalysisError> {
        let magnitudes = self.magnitudes(waveform, fundamental)?;

        let max = magnitudes.iter().copied().fold(0.0_f32, f32::max);
        if max <= 0.0 || !max.is_finite() {
            return Err(AnalysisError::DegenerateNormalization { fundamental });
        }

        Ok(magnitudes.map(|m| m / max))
    }
}

/// Index of the non-negative DFT bin whose frequency is closest to `freq`.
///
/// Bins are `k * sample_rate / len` for `k = 0..=len/2`. Ties go to the
/// lower bin and anything past Nyquist maps to the last bin. Negative
/// frequencies mirror onto their positive counterpart.
pub fn nearest_bin(freq: f32, len: usize, sample_rate: f32) -> usize {
    let last = len / 2;
    let exact = f64::from(freq.abs()) * len as f64 / f64::from(sample_rate);
    let lower = exact.floor();
    let bin = if exact - lower > 0.5 { lower + 1.0 } else { lower };
    (bin as usize).min(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn partials(freq: f64, amps: &[f64], len: usize) -> Waveform {
        let samples = (0..len)
            .map(|n| {
                let t = n as f64 / 44100.0;
                amps.iter()
                    .enumerate()
                    .map(|(i, a)| a * (TAU * freq * (i + 1) as f64 * t).sin())
                    .sum::<f64>() as f32
            })
            .collect();
        Waveform::new(samples, 44100.0)
    }

    #[test]
    fn test_nearest_bin() {
        // 22050 samples at 44.1 kHz: 2 Hz per bin
        assert_eq!(nearest_bin(440.0, 22050, 44100.0), 220);
        assert_eq!(nearest_bin(441.0, 22050, 44100.0), 220);
        assert_eq!(nearest_bin(441.5, 22050, 44100.0), 221);
        assert_eq!(nearest_bin(-440.0, 22050, 44100.0), 220);
        assert_eq!(nearest_bin(30000.0, 22050, 44100.0), 11025);
        assert_eq!(nearest_bin(0.0, 22050, 44100.0), 0);
    }

    #[test]
    fn test_ratios_follow_partial_amplitudes() {
        let wf = partials(440.0, &[1.0, 0.5, 1.0 / 3.0, 0.25, 0.2], 22050);
        let ratios = HarmonicRatioCalculator::new().ratios(&wf, 440.0).unwrap();

        let expected = [1.0, 0.5, 1.0 / 3.0, 0.25, 0.2];
        for (r, e) in ratios.iter().zip(expected) {
            assert!((r - e).abs() < 0.01, "ratios {ratios:?}");
        }
        assert_eq!(ratios[0], 1.0);
    }

    #[test]
    fn test_strongest_harmonic_is_one() {
        let wf = partials(200.0, &[0.2, 0.3, 0.9, 0.1, 0.05], 22050);
        let ratios = HarmonicRatioCalculator::new().ratios(&wf, 200.0).unwrap();

        assert_eq!(ratios[2], 1.0);
        assert!(ratios.iter().all(|&r| (0.0..=1.0).contains(&r)));
    }

    #[test]
    fn test_all_zero_is_degenerate() {
        let result = HarmonicRatioCalculator::new().ratios(&Waveform::silence(22050, 44100.0), 440.0);
        assert!(matches!(
            result,
            Err(AnalysisError::DegenerateNormalization { .. })
        ));
    }

    #[test]
    fn test_nan_fundamental_is_degenerate() {
        let wf = partials(440.0, &[1.0], 22050);
        let result = HarmonicRatioCalculator::new().ratios(&wf, f32::NAN);
        assert!(matches!(
            result,
            Err(AnalysisError::DegenerateNormalization { fundamental }) if fundamental.is_nan()
        ));
    }

    #[test]
    fn test_empty_waveform() {
        let result = HarmonicRatioCalculator::new().ratios(&Waveform::new(vec![], 44100.0), 440.0);
        assert_eq!(result, Err(AnalysisError::EmptySignal));
    }
}
