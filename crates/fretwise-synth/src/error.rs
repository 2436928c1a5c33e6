//! Error types for synthesis.

use thiserror::Error;

/// Errors raised when synthesis parameters cannot produce a waveform.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    /// A parameter was non-finite, zero, negative, or otherwise unusable.
    #[error("invalid synthesis parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value, formatted.
        value: String,
    },
}

impl SynthError {
    /// Create an invalid parameter error.
    pub fn invalid(name: &'static str, value: impl ToString) -> Self {
        SynthError::InvalidParameter {
            name,
            value: value.to_string(),
        }
    }
}
