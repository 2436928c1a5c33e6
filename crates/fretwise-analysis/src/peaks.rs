//! Spectral peak picking and fundamental frequency estimation.
//!
//! The estimator is a coarse heuristic built for clean synthetic tones:
//! every frame of an STFT contributes the frequencies of its local maxima
//! that reach `frame_max / threshold_divisor`, and the fundamental is the
//! median of that pooled list.
//!
//! The divisor decides which partials enter the pool. A plucked-string tone
//! with `1/i` partials has its second harmonic at half the fundamental's
//! height, so the default divisor of [`DEFAULT_THRESHOLD_DIVISOR`] keeps only
//! the fundamental. The wider [`WIDE_THRESHOLD_DIVISOR`] (`max / 10`) admits
//! all five partials and the median then sits on the third harmonic; it stays
//! available for broadband material where the fundamental is not dominant.

use crate::AnalysisError;
use crate::fft::Window;
use crate::spectrogram::{SpectralFrame, StftAnalyzer};
use fretwise_core::Waveform;
use serde::{Deserialize, Serialize};

/// Threshold divisor used by [`PeakEstimatorConfig::default`].
pub const DEFAULT_THRESHOLD_DIVISOR: f32 = 1.5;

/// `max / 10` threshold; lets every partial above a tenth of the frame maximum
/// into the pooled list.
pub const WIDE_THRESHOLD_DIVISOR: f32 = 10.0;

/// Peak estimator settings.
///
/// The defaults (2048-sample segments, 1024 overlap, `max / 1.5`) are
/// heuristics; they decide how many harmonics make it into the pooled list
/// and so where the median lands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakEstimatorConfig {
    /// STFT segment length in samples.
    pub segment_len: usize,
    /// Overlap between consecutive segments in samples.
    pub overlap: usize,
    /// A peak must reach `frame_max / threshold_divisor`.
    pub threshold_divisor: f32,
    /// Segment taper.
    pub window: Window,
    /// Refine peak positions with log-magnitude parabolic interpolation.
    pub interpolate: bool,
    /// Subtract each segment's mean before windowing.
    pub detrend: bool,
}

impl Default for PeakEstimatorConfig {
    fn default() -> Self {
        Self {
            segment_len: 2048,
            overlap: 1024,
            threshold_divisor: DEFAULT_THRESHOLD_DIVISOR,
            window: Window::Hann,
            interpolate: true,
            detrend: true,
        }
    }
}

impl PeakEstimatorConfig {
    /// Hop between segments.
    pub fn hop_size(&self) -> usize {
        self.segment_len - self.overlap
    }

    /// Reject settings the STFT cannot run with.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.segment_len < 3 {
            return Err(AnalysisError::InvalidConfig(format!(
                "segment_len must be at least 3, got {}",
                self.segment_len
            )));
        }
        if self.overlap >= self.segment_len {
            return Err(AnalysisError::InvalidConfig(format!(
                "overlap ({}) must be smaller than segment_len ({})",
                self.overlap, self.segment_len
            )));
        }
        if !self.threshold_divisor.is_finite() || self.threshold_divisor <= 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "threshold_divisor must be positive, got {}",
                self.threshold_divisor
            )));
        }
        Ok(())
    }
}

/// Result of one estimator run.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakEstimate {
    /// Median of the pooled peak frequencies, NaN when nothing was found.
    pub fundamental: f32,
    /// Every accepted peak frequency, frame by frame.
    pub peak_frequencies: Vec<f32>,
    /// Number of STFT frames analyzed.
    pub num_frames: usize,
}

impl PeakEstimate {
    /// False when no peak was found and the fundamental is NaN.
    pub fn is_detected(&self) -> bool {
        !self.fundamental.is_nan()
    }
}

/// Median-of-peaks fundamental frequency estimator.
///
/// # Example
///
/// ```rust
/// use fretwise_analysis::SpectralPeakEstimator;
/// use fretwise_core::Waveform;
///
/// let silent = Waveform::silence(22050, 44100.0);
/// let f0 = SpectralPeakEstimator::default().estimate(&silent).unwrap();
/// assert!(f0.is_nan());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SpectralPeakEstimator {
    config: PeakEstimatorConfig,
}

impl SpectralPeakEstimator {
    /// Create an estimator, rejecting unusable settings.
    pub fn new(config: PeakEstimatorConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &PeakEstimatorConfig {
        &self.config
    }

    /// Estimate the fundamental frequency of `waveform` in Hz.
    ///
    /// Returns NaN (not an error) when no frame has a qualifying peak.
    pub fn estimate(&self, waveform: &Waveform) -> Result<f32, AnalysisError> {
        Ok(self.analyze(waveform)?.fundamental)
    }

    /// Run the estimator and keep the pooled peak list.
    pub fn analyze(&self, waveform: &Waveform) -> Result<PeakEstimate, AnalysisError> {
        if waveform.is_empty() {
            return Err(AnalysisError::EmptySignal);
        }

        let analyzer = StftAnalyzer::new(
            waveform.sample_rate(),
            self.config.segment_len,
            self.config.hop_size(),
            self.config.window,
        )
        .with_detrend(self.config.detrend);
        let frames = analyzer.analyze(waveform.samples());

        let peak_frequencies = self.pooled_peaks(&frames);
        let fundamental = median(&peak_frequencies);

        tracing::debug!(
            frames = frames.num_frames(),
            peaks = peak_frequencies.len(),
            fundamental,
            "peak estimate"
        );

        Ok(PeakEstimate {
            fundamental,
            peak_frequencies,
            num_frames: frames.num_frames(),
        })
    }

    fn pooled_peaks(&self, frames: &SpectralFrame) -> Vec<f32> {
        let mut pooled = Vec::new();

        for spectrum in frames.frames() {
            let frame_max = spectrum.iter().copied().fold(0.0_f32, f32::max);
            if frame_max <= 0.0 {
                continue;
            }
            let min_height = frame_max / self.config.threshold_divisor;

            for bin in find_peaks(spectrum, min_height) {
                let freq = if self.config.interpolate {
                    frames.bin_frequency(interpolate_peak(spectrum, bin))
                } else {
                    frames.bin_frequency(bin as f32)
                };
                pooled.push(freq);
            }
        }

        pooled
    }
}

/// Indices of local maxima in `spectrum` whose height is at least `min_height`.
///
/// A peak is strictly higher than its left neighbour and than the first
/// differing sample to its right; flat tops report their middle index. The
/// first and last samples are never peaks.
pub fn find_peaks(spectrum: &[f32], min_height: f32) -> Vec<usize> {
    let mut peaks = Vec::new();
    if spectrum.len() < 3 {
        return peaks;
    }

    let last = spectrum.len() - 1;
    let mut i = 1;
    while i < last {
        if spectrum[i - 1] < spectrum[i] {
            let mut ahead = i + 1;
            while ahead < last && spectrum[ahead] == spectrum[i] {
                ahead += 1;
            }
            if spectrum[ahead] < spectrum[i] {
                if spectrum[i] >= min_height {
                    peaks.push((i + ahead - 1) / 2);
                }
                i = ahead;
                continue;
            }
        }
        i += 1;
    }

    peaks
}

/// Fractional bin position of the peak at `bin` from a parabola through the
/// log magnitudes of it and its neighbours.
fn interpolate_peak(spectrum: &[f32], bin: usize) -> f32 {
    if bin == 0 || bin + 1 >= spectrum.len() {
        return bin as f32;
    }

    let y1 = spectrum[bin - 1].ln();
    let y2 = spectrum[bin].ln();
    let y3 = spectrum[bin + 1].ln();
    if !y1.is_finite() || !y2.is_finite() || !y3.is_finite() {
        return bin as f32;
    }

    let denominator = y1 - 2.0 * y2 + y3;
    if denominator.abs() < 1e-12 {
        return bin as f32;
    }

    let shift = (0.5 * (y1 - y3) / denominator).clamp(-0.5, 0.5);
    bin as f32 + shift
}

/// Median of `values`; mean of the middle pair for even counts, NaN when empty.
pub fn median(values: &[f32]) -> f32 {
    if values.is_empty() {
        return f32::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(freq: f32, len: usize) -> Waveform {
        let samples = (0..len)
            .map(|i| (2.0 * PI * freq * i as f32 / 44100.0).sin())
            .collect();
        Waveform::new(samples, 44100.0)
    }

    #[test]
    fn test_find_peaks_basic() {
        let spectrum = [0.0, 1.0, 0.0, 0.5, 3.0, 0.5, 0.2];
        assert_eq!(find_peaks(&spectrum, 0.0), vec![1, 4]);
        assert_eq!(find_peaks(&spectrum, 2.0), vec![4]);
    }

    #[test]
    fn test_find_peaks_plateau_and_edges() {
        // Edges are never peaks; a flat top reports its middle
        assert_eq!(find_peaks(&[5.0, 1.0, 2.0, 2.0, 2.0, 1.0, 5.0], 0.0), vec![3]);
        // A plateau that rises again is not a peak
        assert_eq!(find_peaks(&[0.0, 2.0, 2.0, 3.0, 0.0], 0.0), vec![3]);
        assert!(find_peaks(&[1.0, 2.0], 0.0).is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(find_peaks(&[0.0, 1.0, 0.0], 1.0), vec![1]);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), 2.5);
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn test_interpolation_recovers_off_bin_tone() {
        let bins_per_hz = 2048.0 / 44100.0;
        let tone = sine(440.0, 2048);
        let frames = StftAnalyzer::new(44100.0, 2048, 1024, Window::Hann).analyze(tone.samples());
        let spectrum = &frames.frames()[0];
        let max = spectrum.iter().copied().fold(0.0_f32, f32::max);
        let bin = find_peaks(spectrum, max / 10.0)[0];
        let refined = interpolate_peak(spectrum, bin);

        assert!((refined - 440.0 * bins_per_hz).abs() < 0.05, "refined bin {refined}");
    }

    #[test]
    fn test_pure_tone_estimate() {
        let estimate = SpectralPeakEstimator::default()
            .analyze(&sine(440.0, 22050))
            .unwrap();

        assert_eq!(estimate.num_frames, 20);
        assert!(estimate.is_detected());
        assert!(
            (estimate.fundamental - 440.0).abs() < 2.0,
            "got {}",
            estimate.fundamental
        );
    }

    #[test]
    fn test_without_interpolation_snaps_to_bins() {
        let config = PeakEstimatorConfig {
            interpolate: false,
            ..PeakEstimatorConfig::default()
        };
        let f0 = SpectralPeakEstimator::new(config)
            .unwrap()
            .estimate(&sine(440.0, 22050))
            .unwrap();

        // bin 20 of a 2048-point FFT at 44.1 kHz
        assert!((f0 - 430.664).abs() < 0.01, "got {f0}");
    }

    #[test]
    fn test_silence_is_nan() {
        let f0 = SpectralPeakEstimator::default()
            .estimate(&Waveform::silence(22050, 44100.0))
            .unwrap();
        assert!(f0.is_nan());
    }

    #[test]
    fn test_empty_is_error() {
        let result = SpectralPeakEstimator::default().estimate(&Waveform::new(vec![], 44100.0));
        assert_eq!(result, Err(AnalysisError::EmptySignal));
    }

    #[test]
    fn test_invalid_config() {
        let overlap_too_big = PeakEstimatorConfig {
            overlap: 2048,
            ..PeakEstimatorConfig::default()
        };
        assert!(SpectralPeakEstimator::new(overlap_too_big).is_err());

        let zero_divisor = PeakEstimatorConfig {
            threshold_divisor: 0.0,
            ..PeakEstimatorConfig::default()
        };
        assert!(SpectralPeakEstimator::new(zero_divisor).is_err());
    }
}
