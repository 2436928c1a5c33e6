//! Fretwise Synth - synthetic guitar-like tones with known ground truth
//!
//! Every waveform is a sum of harmonic partials with `1/i` amplitudes plus
//! additive Gaussian noise. Noise comes from an explicitly passed random
//! stream, so a fixed seed always reproduces the same samples.
//!
//! - [`SignalSynthesizer`] - renders a [`Waveform`](fretwise_core::Waveform) for a target frequency
//! - [`GaussianNoise`] - `rand_distr` normal sampler over any [`rand::Rng`]
//! - [`unit_stream`] - independent, reproducible RNG streams for parallel work
//!
//! ```rust
//! use fretwise_synth::{SignalSynthesizer, SynthConfig, unit_stream};
//!
//! let synth = SignalSynthesizer::new(SynthConfig::default()).unwrap();
//! let mut rng = unit_stream(42, 0);
//! let waveform = synth.synthesize(440.0, &mut rng).unwrap();
//! assert_eq!(waveform.len(), 22050);
//! ```

mod error;
mod noise;
mod stream;
mod synthesizer;

pub use error::SynthError;
pub use noise::GaussianNoise;
pub use stream::{splitmix64, unit_seed, unit_stream};
pub use synthesizer::{SignalSynthesizer, SynthConfig, pure_tone};
