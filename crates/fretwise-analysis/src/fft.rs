//! Forward transforms and segment tapers

use rustfft::{FftPlanner, num_complex::Complex};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::sync::Arc;

/// Taper applied to each analysis segment.
///
/// All windows use the periodic (DFT-even) form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    /// No taper
    Rectangular,
    /// Raised cosine
    #[default]
    Hann,
    /// Raised cosine on a 0.08 pedestal
    Hamming,
    /// Three-term cosine sum
    Blackman,
}

impl Window {
    /// Weight of sample `i` in a window of length `len`.
    pub fn weight(self, i: usize, len: usize) -> f32 {
        let phase = TAU * i as f64 / len as f64;
        let w = match self {
            Self::Rectangular => 1.0,
            Self::Hann => 0.5 - 0.5 * phase.cos(),
            Self::Hamming => 0.54 - 0.46 * phase.cos(),
            Self::Blackman => 0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos(),
        };
        w as f32
    }

    /// Every weight of a window of length `len`.
    pub fn coefficients(self, len: usize) -> Vec<f32> {
        (0..len).map(|i| self.weight(i, len)).collect()
    }
}

/// Planned forward DFT of real input, any length.
#[derive(Clone)]
pub struct Fft {
    plan: Arc<dyn rustfft::Fft<f32>>,
    size: usize,
}

impl Fft {
    /// Plan a transform of `size` points.
    pub fn new(size: usize) -> Self {
        let plan = FftPlanner::new().plan_fft_forward(size);
        Self { plan, size }
    }

    /// Transform length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Bins from DC to Nyquist inclusive.
    pub fn num_bins(&self) -> usize {
        self.size / 2 + 1
    }

    /// DC-to-Nyquist half of the spectrum of `input`.
    ///
    /// Input shorter than the transform is zero-padded; longer input is
    /// truncated.
    pub fn half_spectrum(&self, input: &[f32]) -> Vec<Complex<f32>> {
        let mut buffer = vec![Complex::default(); self.size];
        for (slot, &x) in buffer.iter_mut().zip(input) {
            slot.re = x;
        }
        self.plan.process(&mut buffer);
        buffer.truncate(self.num_bins());
        buffer
    }

    /// Magnitudes of [`half_spectrum`](Self::half_spectrum).
    pub fn magnitudes(&self, input: &[f32]) -> Vec<f32> {
        self.half_spectrum(input).iter().map(|c| c.norm()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periodic_hann() {
        let w = Window::Hann.coefficients(8);
        assert_eq!(w[0], 0.0);
        assert!((w[4] - 1.0).abs() < 1e-6);
        // Periodic: symmetric about the centre, last sample not zero
        assert!((w[1] - w[7]).abs() < 1e-6);
        assert!(w[7] > 0.1);
    }

    #[test]
    fn test_window_shapes() {
        assert!(Window::Rectangular.coefficients(16).iter().all(|&w| w == 1.0));
        assert!((Window::Hamming.weight(0, 16) - 0.08).abs() < 1e-6);
        assert!(Window::Blackman.weight(0, 16).abs() < 1e-6);
        assert!((Window::Blackman.weight(8, 16) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_constant_input_is_all_dc() {
        let mags = Fft::new(256).magnitudes(&[1.0; 256]);
        assert!((mags[0] - 256.0).abs() < 1e-3);
        assert!(mags[1..].iter().all(|&m| m < 1e-3));
    }

    #[test]
    fn test_short_input_zero_padded() {
        let fft = Fft::new(64);
        let mut explicit = vec![1.0; 16];
        explicit.resize(64, 0.0);
        assert_eq!(fft.magnitudes(&[1.0; 16]), fft.magnitudes(&explicit));
    }

    #[test]
    fn test_half_second_sine_lands_on_bin() {
        let fft = Fft::new(22050);
        assert_eq!(fft.num_bins(), 11026);

        let input: Vec<f32> = (0..22050)
            .map(|n| (TAU * 440.0 * n as f64 / 44100.0).sin() as f32)
            .collect();
        let mags = fft.magnitudes(&input);

        // 2 Hz per bin
        let peak = mags
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(bin, _)| bin);
        assert_eq!(peak, Some(220));
    }
}
