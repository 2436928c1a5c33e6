//! Fretwise Core - shared data types for harmonic dataset generation
//!
//! This crate holds the types every stage of the pipeline passes around:
//!
//! - [`Waveform`] - immutable mono sample buffer with its sample rate
//! - [`NoteFrequency`] - one string/fret position of a note table
//! - [`HarmonicSample`] - a labeled analysis result ready for export
//!
//! ## Pipeline
//!
//! ```text
//! NoteFrequency ──> synthesize ──> Waveform ──> estimate f0 ──> harmonic ratios
//!                                                                    │
//!                                         HarmonicSample <───────────┘
//! ```

pub mod note;
pub mod sample;
pub mod waveform;

pub use note::{FRET_RANGE, NoteFrequency, STRING_RANGE};
pub use sample::HarmonicSample;
pub use waveform::{EmptySignal, Waveform};

/// Default sample rate used by synthesis and analysis (Hz).
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Default synthesized note duration (seconds).
pub const DEFAULT_DURATION: f32 = 0.5;

/// Number of harmonics (fundamental included) described by a sample.
pub const NUM_HARMONICS: usize = 5;
