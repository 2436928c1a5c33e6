//! Gaussian noise source.

use crate::SynthError;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Zero-mean normal distribution over any [`rand::Rng`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianNoise {
    normal: Normal<f64>,
}

impl GaussianNoise {
    /// Create a noise source with the given standard deviation.
    ///
    /// Fails for a negative or non-finite deviation.
    pub fn new(std_dev: f64) -> Result<Self, SynthError> {
        if !std_dev.is_finite() {
            return Err(SynthError::invalid("noise_std", std_dev));
        }
        let normal =
            Normal::new(0.0, std_dev).map_err(|_| SynthError::invalid("noise_std", std_dev))?;
        Ok(Self { normal })
    }

    /// Standard deviation.
    pub fn std_dev(&self) -> f64 {
        self.normal.std_dev()
    }

    /// Draw one sample.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.normal.sample(rng)
    }
}
