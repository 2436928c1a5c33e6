//! Note table rows.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Valid string indices (1 = low E ... 6 = high E).
pub const STRING_RANGE: RangeInclusive<u8> = 1..=6;

/// Valid fret indices (open string through the 12th fret).
pub const FRET_RANGE: RangeInclusive<u8> = 0..=12;

/// One string/fret position with its note name and frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteFrequency {
    /// String index, 1-6.
    pub string: u8,
    /// Human-readable string name ("Low E", "A", ...).
    pub string_name: String,
    /// Fret index, 0-12.
    pub fret: u8,
    /// Note name without octave ("E", "F#", ...).
    pub note: String,
    /// Fundamental frequency in Hz.
    pub frequency: f32,
}

impl NoteFrequency {
    /// Create a note table row.
    pub fn new(
        string: u8,
        string_name: impl Into<String>,
        fret: u8,
        note: impl Into<String>,
        frequency: f32,
    ) -> Self {
        Self {
            string,
            string_name: string_name.into(),
            fret,
            note: note.into(),
            frequency,
        }
    }

    /// True when string, fret and frequency are all within their valid ranges.
    pub fn is_in_range(&self) -> bool {
        STRING_RANGE.contains(&self.string)
            && FRET_RANGE.contains(&self.fret)
            && self.frequency.is_finite()
            && self.frequency > 0.0
    }
}
