//! Short-time magnitude spectra.
//!
//! The signal is cut into overlapping segments. Each one is optionally
//! mean-subtracted, tapered, zero-padded to the segment length, and
//! transformed. Peak estimation consumes the result straight away.

use crate::fft::{Fft, Window};

/// Magnitude spectra of consecutive segments, indexed `[frame][bin]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralFrame {
    frames: Vec<Vec<f32>>,
    segment_len: usize,
    hop: usize,
    sample_rate: f32,
}

impl SpectralFrame {
    /// One magnitude spectrum per segment, DC to Nyquist.
    pub fn frames(&self) -> &[Vec<f32>] {
        &self.frames
    }

    /// Number of segments.
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Bins per spectrum.
    pub fn num_bins(&self) -> usize {
        self.segment_len / 2 + 1
    }

    /// Width of one bin in Hz.
    pub fn bin_width(&self) -> f32 {
        self.sample_rate / self.segment_len as f32
    }

    /// Frequency of a bin position, which may be fractional.
    pub fn bin_frequency(&self, bin: f32) -> f32 {
        bin * self.bin_width()
    }

    /// Start time of a frame in seconds.
    pub fn frame_time(&self, frame: usize) -> f32 {
        (frame * self.hop) as f32 / self.sample_rate
    }

    /// Frequency of the strongest bin in each frame.
    pub fn dominant_frequencies(&self) -> Vec<f32> {
        self.frames
            .iter()
            .filter_map(|spectrum| {
                spectrum
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.total_cmp(b.1))
                    .map(|(bin, _)| self.bin_frequency(bin as f32))
            })
            .collect()
    }
}

/// Segments, tapers, and transforms a signal.
#[derive(Clone)]
pub struct StftAnalyzer {
    fft: Fft,
    taper: Vec<f32>,
    hop: usize,
    detrend: bool,
    sample_rate: f32,
}

impl StftAnalyzer {
    /// Analyzer with `segment_len`-sample segments starting every `hop` samples.
    ///
    /// `hop` must be non-zero.
    pub fn new(sample_rate: f32, segment_len: usize, hop: usize, window: Window) -> Self {
        Self {
            fft: Fft::new(segment_len),
            taper: window.coefficients(segment_len),
            hop,
            detrend: false,
            sample_rate,
        }
    }

    /// Subtract each segment's mean before tapering.
    pub fn with_detrend(mut self, detrend: bool) -> Self {
        self.detrend = detrend;
        self
    }

    /// Segment length in samples.
    pub fn segment_len(&self) -> usize {
        self.fft.size()
    }

    /// Distance between segment starts in samples.
    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Frames produced for a signal of `len` samples.
    ///
    /// Only whole segments are taken, except that a non-empty signal shorter
    /// than one segment still yields a single zero-padded frame.
    pub fn num_frames(&self, len: usize) -> usize {
        let segment_len = self.segment_len();
        match len {
            0 => 0,
            len if len < segment_len => 1,
            len => (len - segment_len) / self.hop + 1,
        }
    }

    /// Magnitude spectra of every segment of `signal`.
    pub fn analyze(&self, signal: &[f32]) -> SpectralFrame {
        let segment_len = self.segment_len();

        let frames = (0..self.num_frames(signal.len()))
            .map(|frame| {
                let start = frame * self.hop;
                let segment = &signal[start..(start + segment_len).min(signal.len())];
                let offset = if self.detrend {
                    segment.iter().sum::<f32>() / segment.len() as f32
                } else {
                    0.0
                };
                let tapered: Vec<f32> = segment
                    .iter()
                    .zip(&self.taper)
                    .map(|(&s, &w)| (s - offset) * w)
                    .collect();
                self.fft.magnitudes(&tapered)
            })
            .collect();

        SpectralFrame {
            frames,
            segment_len,
            hop: self.hop,
            sample_rate: self.sample_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fretwise_core::Waveform;
    use std::f64::consts::TAU;

    fn tone(freq: f64, len: usize) -> Waveform {
        let samples = (0..len)
            .map(|n| (TAU * freq * n as f64 / 44100.0).sin() as f32)
            .collect();
        Waveform::new(samples, 44100.0)
    }

    fn analyzer() -> StftAnalyzer {
        StftAnalyzer::new(44100.0, 2048, 1024, Window::Hann)
    }

    #[test]
    fn test_half_second_gives_twenty_frames() {
        let frames = analyzer().analyze(tone(440.0, 22050).samples());

        // (22050 - 2048) / 1024 + 1
        assert_eq!(frames.num_frames(), 20);
        assert_eq!(frames.num_bins(), 1025);
        assert!(frames.frames().iter().all(|f| f.len() == 1025));
    }

    #[test]
    fn test_dominant_frequency_tracks_tone() {
        let frames = analyzer().analyze(tone(1000.0, 22050).samples());
        let dominant = frames.dominant_frequencies();

        assert_eq!(dominant.len(), 20);
        for f in dominant {
            assert!((f - 1000.0).abs() < frames.bin_width(), "dominant {f} Hz");
        }
    }

    #[test]
    fn test_frame_count_edges() {
        let a = analyzer();
        assert_eq!(a.num_frames(0), 0);
        assert_eq!(a.num_frames(500), 1);
        assert_eq!(a.num_frames(2048), 1);
        assert_eq!(a.num_frames(3071), 1);
        assert_eq!(a.num_frames(3072), 2);

        let frames = a.analyze(&[0.5; 500]);
        assert_eq!(frames.num_frames(), 1);
        assert_eq!(frames.frames()[0].len(), 1025);
    }

    #[test]
    fn test_detrend_removes_offset() {
        let a = StftAnalyzer::new(44100.0, 1024, 512, Window::Hann).with_detrend(true);
        let frames = a.analyze(&[0.75; 4096]);
        assert!(frames.frames().iter().flatten().all(|&m| m < 1e-3));

        let raw = StftAnalyzer::new(44100.0, 1024, 512, Window::Hann).analyze(&[0.75; 4096]);
        assert!(raw.frames()[0][0] > 100.0);
    }

    #[test]
    fn test_axes() {
        let frames = analyzer().analyze(&[0.0; 4096]);
        assert!((frames.bin_width() - 21.533).abs() < 1e-3);
        assert!((frames.bin_frequency(1024.0) - 22050.0).abs() < 0.01);
        assert!((frames.bin_frequency(20.5) - 441.43).abs() < 0.01);
        assert!((frames.frame_time(2) - 2048.0 / 44100.0).abs() < 1e-6);
    }
}
