//! Fretwise Analysis - harmonic signature extraction
//!
//! This crate turns a [`Waveform`](fretwise_core::Waveform) into the features
//! the dataset records, a fundamental estimate and a harmonic ratio vector:
//!
//! - [`fft`] - FFT wrapper with windowing functions
//! - [`spectrogram`] - STFT magnitude field ([`SpectralFrame`])
//! - [`peaks`] - local-maximum picking and the median-of-peaks fundamental estimate
//! - [`harmonics`] - normalized magnitudes at integer multiples of the fundamental
//!
//! The default peak threshold is `frame_max / 1.5`. With the looser `max / 10`
//! ([`peaks::WIDE_THRESHOLD_DIVISOR`]) every partial of a synthesized note is
//! pooled, the median lands on the third harmonic, and the ratio vector
//! collapses to `[1, 0, 0, 0, 0]`; a clean 440 Hz note then reads as ~1320 Hz.
//!
//! ## Example
//!
//! ```rust
//! use fretwise_analysis::{HarmonicRatioCalculator, SpectralPeakEstimator};
//! use fretwise_synth::pure_tone;
//!
//! let tone = pure_tone(440.0, 0.5, 44100.0);
//!
//! let f0 = SpectralPeakEstimator::default().estimate(&tone).unwrap();
//! assert!((f0 - 440.0).abs() < 8.8);
//!
//! let ratios = HarmonicRatioCalculator::new().ratios(&tone, f0).unwrap();
//! assert_eq!(ratios[0], 1.0);
//! ```

mod error;
pub mod fft;
pub mod harmonics;
pub mod peaks;
pub mod spectrogram;

pub use error::AnalysisError;
pub use fft::{Fft, Window};
pub use harmonics::HarmonicRatioCalculator;
pub use peaks::{
    DEFAULT_THRESHOLD_DIVISOR, PeakEstimate, PeakEstimatorConfig, SpectralPeakEstimator,
    WIDE_THRESHOLD_DIVISOR, find_peaks, median,
};
pub use spectrogram::{SpectralFrame, StftAnalyzer};
