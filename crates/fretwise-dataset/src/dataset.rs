//! Dataset container, export, and import.

use crate::csv_text;
use crate::error::DatasetError;
use fretwise_analysis::AnalysisError;
use fretwise_core::{HarmonicSample, NUM_HARMONICS, NoteFrequency};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// A (note, sample index) unit that produced no usable sample.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedSample {
    /// The note table row the waveform was synthesized from.
    pub label: NoteFrequency,
    /// Index of the sample within its note, `0..samples_per_note`.
    pub sample_index: usize,
    /// Fundamental estimate, if one was reached before the failure.
    pub fundamental: Option<f32>,
    /// Why the sample was rejected.
    pub reason: AnalysisError,
}

/// Output of a batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Accepted samples, in table order.
    pub samples: Vec<HarmonicSample>,
    /// Rejected units, in table order.
    pub rejected: Vec<RejectedSample>,
    /// Run seed; absent for datasets loaded from disk.
    pub seed: Option<u64>,
}

/// Why a unit was rejected, as written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// The synthesized waveform had no samples.
    EmptySignal,
    /// No spectral peak cleared the threshold.
    NoPeakDetected,
    /// The harmonic magnitudes could not be normalized.
    DegenerateNormalization,
    /// The analysis settings were unusable.
    InvalidConfig,
}

impl RejectionReason {
    /// Snake-case name used in every output format.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmptySignal => "empty_signal",
            Self::NoPeakDetected => "no_peak_detected",
            Self::DegenerateNormalization => "degenerate_normalization",
            Self::InvalidConfig => "invalid_config",
        }
    }

    fn into_error(self, fundamental: Option<f32>) -> AnalysisError {
        match self {
            Self::EmptySignal => AnalysisError::EmptySignal,
            Self::NoPeakDetected => AnalysisError::NoPeakDetected,
            Self::DegenerateNormalization => AnalysisError::DegenerateNormalization {
                fundamental: fundamental.unwrap_or(f32::NAN),
            },
            Self::InvalidConfig => AnalysisError::InvalidConfig(self.as_str().to_string()),
        }
    }
}

impl From<&AnalysisError> for RejectionReason {
    fn from(err: &AnalysisError) -> Self {
        match err {
            AnalysisError::EmptySignal => Self::EmptySignal,
            AnalysisError::NoPeakDetected => Self::NoPeakDetected,
            AnalysisError::DegenerateNormalization { .. } => Self::DegenerateNormalization,
            AnalysisError::InvalidConfig(_) => Self::InvalidConfig,
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialized form of one unit, accepted or rejected.
///
/// Accepted units carry a fundamental, ratios, and harmonics. Rejected units
/// carry `rejected` and `sample_index`; their fundamental is `null` unless
/// the failure came after estimation, and the ratio fields are `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Ground-truth frequency (Hz).
    pub frequency: f32,
    /// Note name.
    pub note: String,
    /// String number, 1 = Low E.
    pub string: u8,
    /// String name.
    pub string_name: String,
    /// Fret number.
    pub fret: u8,
    /// Estimated fundamental (Hz).
    pub fundamental: Option<f32>,
    /// Normalized harmonic magnitudes.
    pub harmonic_ratios: Option<[f32; NUM_HARMONICS]>,
    /// Harmonic frequencies (Hz).
    pub harmonics: Option<[f32; NUM_HARMONICS]>,
    /// Set on rejected units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected: Option<RejectionReason>,
    /// Index within the note; written for rejected units only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_index: Option<usize>,
}

impl SampleRecord {
    /// True for a rejected unit.
    pub fn is_rejected(&self) -> bool {
        self.rejected.is_some()
    }

    fn label(&self) -> NoteFrequency {
        NoteFrequency {
            string: self.string,
            string_name: self.string_name.clone(),
            fret: self.fret,
            note: self.note.clone(),
            frequency: self.frequency,
        }
    }

    /// Rebuild the in-memory unit; `index` is the record's position for errors.
    fn into_unit(
        self,
        index: usize,
    ) -> Result<Result<HarmonicSample, RejectedSample>, DatasetError> {
        let label = self.label();
        if let Some(reason) = self.rejected {
            return Ok(Err(RejectedSample {
                label,
                sample_index: self.sample_index.unwrap_or(0),
                fundamental: self.fundamental,
                reason: reason.into_error(self.fundamental),
            }));
        }

        let missing = |field: &'static str| DatasetError::IncompleteRecord { index, field };
        Ok(Ok(HarmonicSample {
            label,
            fundamental: self.fundamental.ok_or_else(|| missing("fundamental"))?,
            harmonic_ratios: self.harmonic_ratios.ok_or_else(|| missing("harmonic_ratios"))?,
            harmonics: self.harmonics.ok_or_else(|| missing("harmonics"))?,
        }))
    }
}

impl From<&HarmonicSample> for SampleRecord {
    fn from(sample: &HarmonicSample) -> Self {
        Self {
            frequency: sample.label.frequency,
            note: sample.label.note.clone(),
            string: sample.label.string,
            string_name: sample.label.string_name.clone(),
            fret: sample.label.fret,
            fundamental: Some(sample.fundamental),
            harmonic_ratios: Some(sample.harmonic_ratios),
            harmonics: Some(sample.harmonics),
            rejected: None,
            sample_index: None,
        }
    }
}

impl From<&RejectedSample> for SampleRecord {
    fn from(rejected: &RejectedSample) -> Self {
        Self {
            frequency: rejected.label.frequency,
            note: rejected.label.note.clone(),
            string: rejected.label.string,
            string_name: rejected.label.string_name.clone(),
            fret: rejected.label.fret,
            fundamental: rejected.fundamental,
            harmonic_ratios: None,
            harmonics: None,
            rejected: Some(RejectionReason::from(&rejected.reason)),
            sample_index: Some(rejected.sample_index),
        }
    }
}

/// On-disk dataset format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON array.
    #[default]
    Json,
    /// One JSON object per line.
    JsonLines,
    /// Flat CSV with one column per ratio and harmonic.
    Csv,
}

impl OutputFormat {
    /// Guess the format from a file extension.
    pub fn from_extension(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "ndjson" => Some(Self::JsonLines),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::JsonLines => write!(f, "jsonl"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl Dataset {
    /// Empty dataset tagged with the seed that will produce it.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Number of accepted samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no sample was accepted.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Accepted plus rejected units.
    pub fn total(&self) -> usize {
        self.samples.len() + self.rejected.len()
    }

    /// Every unit in serialized form: accepted samples first, then the
    /// rejected units, each group in table order.
    pub fn records(&self) -> Vec<SampleRecord> {
        self.samples
            .iter()
            .map(SampleRecord::from)
            .chain(self.rejected.iter().map(SampleRecord::from))
            .collect()
    }

    /// Write every unit as a pretty-printed JSON array.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), DatasetError> {
        serde_json::to_writer_pretty(writer, &self.records())?;
        Ok(())
    }

    /// Write one JSON object per unit, newline separated.
    pub fn write_jsonl<W: Write>(&self, mut writer: W) -> Result<(), DatasetError> {
        for record in self.records() {
            serde_json::to_writer(&mut writer, &record)?;
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Write every unit as CSV.
    ///
    /// Ratios and harmonic frequencies are expanded into `ratio_1..ratio_5`
    /// and `harmonic_1..harmonic_5` columns. The trailing `status` column is
    /// `ok` or the rejection reason; rejected rows leave the ratio and
    /// harmonic cells empty and write a missing fundamental as `NaN`.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<(), DatasetError> {
        writeln!(writer, "{}", csv_header())?;
        for record in self.records() {
            let mut fields = vec![
                record.frequency.to_string(),
                record.note.clone(),
                record.string.to_string(),
                record.string_name.clone(),
                record.fret.to_string(),
                record.fundamental.unwrap_or(f32::NAN).to_string(),
            ];
            for values in [record.harmonic_ratios, record.harmonics] {
                match values {
                    Some(values) => fields.extend(values.iter().map(ToString::to_string)),
                    None => fields.extend(std::iter::repeat_n(String::new(), NUM_HARMONICS)),
                }
            }
            fields.push(record.rejected.map_or("ok", RejectionReason::as_str).to_string());
            writeln!(writer, "{}", csv_text::join(&fields))?;
        }
        Ok(())
    }

    /// Write the samples to `path` in `format`.
    pub fn save(&self, path: impl AsRef<Path>, format: OutputFormat) -> Result<(), DatasetError> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|e| DatasetError::write_file(path, e))?;
        let mut writer = BufWriter::new(file);

        match format {
            OutputFormat::Json => self.write_json(&mut writer)?,
            OutputFormat::JsonLines => self.write_jsonl(&mut writer)?,
            OutputFormat::Csv => self.write_csv(&mut writer)?,
        }
        writer.flush().map_err(|e| DatasetError::write_file(path, e))?;

        tracing::info!(
            path = %path.display(),
            %format,
            samples = self.samples.len(),
            rejected = self.rejected.len(),
            "saved dataset"
        );
        Ok(())
    }

    /// Load a dataset from a JSON array file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| DatasetError::read_file(path, e))?;
        Self::read_json(BufReader::new(file))
    }

    /// Parse a dataset from a JSON array.
    pub fn read_json<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let records: Vec<SampleRecord> = serde_json::from_reader(reader)?;
        Self::from_records(records)
    }

    /// Parse samples from JSON Lines; blank lines are skipped.
    pub fn read_jsonl<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut records = Vec::new();
        for line in BufReader::new(reader).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str::<SampleRecord>(&line)?);
        }
        Self::from_records(records)
    }

    fn from_records(records: Vec<SampleRecord>) -> Result<Self, DatasetError> {
        let mut dataset = Self::default();
        for (index, record) in records.into_iter().enumerate() {
            match record.into_unit(index)? {
                Ok(sample) => dataset.samples.push(sample),
                Err(rejected) => dataset.rejected.push(rejected),
            }
        }
        Ok(dataset)
    }
}

fn csv_header() -> String {
    let mut columns: Vec<String> = ["frequency", "note", "string", "string_name", "fret", "fundamental"]
        .iter()
        .map(ToString::to_string)
        .collect();
    columns.extend((1..=NUM_HARMONICS).map(|i| format!("ratio_{i}")));
    columns.extend((1..=NUM_HARMONICS).map(|i| format!("harmonic_{i}")));
    columns.push("status".to_string());
    columns.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(freq: f32) -> HarmonicSample {
        HarmonicSample::new(
            NoteFrequency::new(5, "A", 2, "B", freq),
            freq * 1.01,
            [1.0, 0.5, 0.33, 0.25, 0.2],
        )
    }

    fn dataset() -> Dataset {
        Dataset {
            samples: vec![sample(124.0), sample(131.0)],
            rejected: Vec::new(),
            seed: Some(8),
        }
    }

    #[test]
    fn test_record_fields() {
        let record = SampleRecord::from(&sample(124.0));
        assert_eq!(record.frequency, 124.0);
        assert_eq!(record.string, 5);
        assert_eq!(record.note, "B");
        assert_eq!(record.harmonics.unwrap()[1], 124.0 * 1.01 * 2.0);
        assert!(!record.is_rejected());
    }

    fn with_rejections() -> Dataset {
        let mut d = dataset();
        d.rejected.push(RejectedSample {
            label: NoteFrequency::new(1, "Low E, 6th", 0, "E", 82.0),
            sample_index: 3,
            fundamental: None,
            reason: AnalysisError::EmptySignal,
        });
        d.rejected.push(RejectedSample {
            label: NoteFrequency::new(1, "Low E, 6th", 1, "F", 87.0),
            sample_index: 0,
            fundamental: Some(91.5),
            reason: AnalysisError::DegenerateNormalization { fundamental: 91.5 },
        });
        d
    }

    #[test]
    fn test_rejected_units_are_written() {
        let d = with_rejections();
        let records = d.records();
        assert_eq!(records.len(), d.total());

        let empty = &records[2];
        assert_eq!(empty.rejected, Some(RejectionReason::EmptySignal));
        assert_eq!(empty.sample_index, Some(3));
        assert_eq!(empty.fundamental, None);
        assert_eq!(empty.harmonic_ratios, None);

        let mut out = Vec::new();
        d.write_json(&mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows[0].get("rejected").is_none());
        assert_eq!(rows[2]["rejected"], "empty_signal");
        assert!(rows[2]["fundamental"].is_null());
        assert!(rows[2]["harmonic_ratios"].is_null());
        assert_eq!(rows[3]["rejected"], "degenerate_normalization");
        assert_eq!(rows[3]["fundamental"], 91.5);
    }

    #[test]
    fn test_rejected_units_round_trip() {
        let original = with_rejections();
        let mut out = Vec::new();
        original.write_jsonl(&mut out).unwrap();
        assert_eq!(String::from_utf8_lossy(&out).lines().count(), 4);

        let loaded = Dataset::read_jsonl(out.as_slice()).unwrap();
        assert_eq!(loaded.samples, original.samples);
        assert_eq!(loaded.rejected, original.rejected);
    }

    #[test]
    fn test_accepted_record_needs_ratios() {
        let json = r#"[{"frequency": 82, "note": "E", "string": 1, "string_name": "Low E",
            "fret": 0, "fundamental": 82.1, "harmonic_ratios": null, "harmonics": null}]"#;
        let err = Dataset::read_json(json.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::IncompleteRecord {
                index: 0,
                field: "harmonic_ratios"
            }
        ));
    }

    #[test]
    fn test_json_is_structured_array() {
        let mut out = Vec::new();
        dataset().write_json(&mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0]["harmonic_ratios"].is_array());
        assert_eq!(rows[0]["harmonic_ratios"].as_array().unwrap().len(), 5);
        assert_eq!(rows[1]["frequency"], 131.0);
    }

    #[test]
    fn test_json_round_trip() {
        let original = dataset();
        let mut out = Vec::new();
        original.write_json(&mut out).unwrap();

        let loaded = Dataset::read_json(out.as_slice()).unwrap();
        assert_eq!(loaded.samples, original.samples);
        assert_eq!(loaded.seed, None);
    }

    #[test]
    fn test_jsonl_one_object_per_line() {
        let mut out = Vec::new();
        dataset().write_jsonl(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);

        let loaded = Dataset::read_jsonl(text.as_bytes()).unwrap();
        assert_eq!(loaded.samples, dataset().samples);
    }

    #[test]
    fn test_csv_expands_lists() {
        let mut out = Vec::new();
        dataset().write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        let header: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(header.len(), 17);
        assert_eq!(header[6], "ratio_1");
        assert_eq!(header[15], "harmonic_5");
        assert_eq!(header[16], "status");

        let row: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(row.len(), 17);
        assert_eq!(row[0], "124");
        assert_eq!(row[6], "1");
        assert_eq!(row[7], "0.5");
        assert_eq!(row[16], "ok");
        assert!(!text.contains('['));
    }

    #[test]
    fn test_csv_marks_rejected_rows() {
        let d = with_rejections();
        let mut out = Vec::new();
        d.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), d.total() + 1);

        let row = csv_text::split(lines[3]).unwrap();
        assert_eq!(row.len(), 17);
        assert_eq!(row[3], "Low E, 6th");
        assert_eq!(row[5], "NaN");
        assert!(row[6..16].iter().all(String::is_empty));
        assert_eq!(row[16], "empty_signal");

        let row = csv_text::split(lines[4]).unwrap();
        assert_eq!(row[5], "91.5");
        assert_eq!(row[16], "degenerate_normalization");
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = Dataset::read_json(r#"[{"frequency": "high"}]"#.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::Json(_)));

        let err = Dataset::read_json("__import__('os')".as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::Json(_)));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OutputFormat::from_extension("out.json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_extension("out.JSONL"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::from_extension("out.csv"), Some(OutputFormat::Csv));
        assert_eq!(OutputFormat::from_extension("out.parquet"), None);
        assert_eq!(OutputFormat::from_extension("out"), None);
    }

    #[test]
    fn test_counts() {
        let mut d = dataset();
        d.rejected.push(RejectedSample {
            label: NoteFrequency::new(1, "Low E", 0, "E", 82.0),
            sample_index: 3,
            fundamental: None,
            reason: AnalysisError::NoPeakDetected,
        });
        assert_eq!(d.len(), 2);
        assert_eq!(d.total(), 3);
        assert!(!d.is_empty());
    }
}
