//! TOML configuration for dataset generation.

use crate::builder::BuilderConfig;
use crate::error::DatasetError;
use fretwise_analysis::PeakEstimatorConfig;
use fretwise_synth::SynthConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete pipeline configuration.
///
/// Every field has a default, so an empty file is a valid configuration.
///
/// # TOML Format
///
/// ```toml
/// [synth]
/// sample_rate = 44100
/// duration = 0.5
/// noise_std = 0.01
/// partials = 5
///
/// [estimator]
/// segment_len = 2048
/// overlap = 1024
/// threshold_divisor = 1.5
/// window = "hann"
/// interpolate = true
/// detrend = true
///
/// [builder]
/// samples_per_note = 10
/// seed = 42
/// parallel = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Waveform synthesis settings.
    pub synth: SynthConfig,
    /// Fundamental estimator settings.
    pub estimator: PeakEstimatorConfig,
    /// Batch settings.
    pub builder: BuilderConfig,
}

impl DatasetConfig {
    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| DatasetError::read_file(path, e))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, DatasetError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML text.
    pub fn to_toml_string(&self) -> Result<String, DatasetError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<(), DatasetError> {
        self.synth.validate()?;
        self.estimator.validate()?;
        self.builder.validate()
    }
}
