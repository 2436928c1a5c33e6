//! Guitar note tables.
//!
//! A note table enumerates string/fret positions with their note names and
//! frequencies. Tables are validated when constructed, so anything holding
//! a [`NoteTable`] can synthesize from it without further checks.

use crate::csv_text;
use crate::error::{DatasetError, MalformedReason};
use fretwise_core::{FRET_RANGE, NoteFrequency, STRING_RANGE};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

/// Columns every note table CSV must provide.
pub const NOTE_TABLE_COLUMNS: [&str; 5] = ["string", "string_name", "fret", "note", "frequency"];

/// Rows in a complete six-string, thirteen-position table.
pub const STANDARD_TABLE_LEN: usize = 78;

/// Standard tuning, listed high string first with integer-rounded frequencies.
#[rustfmt::skip]
const STANDARD_TUNING: [(u8, &str, [(&str, u16); 13]); 6] = [
    (6, "High E", [
        ("E", 330), ("F", 349), ("F#", 370), ("G", 392), ("G#", 415), ("A", 440), ("A#", 466),
        ("B", 494), ("C", 523), ("C#", 554), ("D", 587), ("D#", 622), ("E", 659),
    ]),
    (5, "B", [
        ("B", 247), ("C", 262), ("C#", 278), ("D", 294), ("D#", 311), ("E", 330), ("F", 349),
        ("F#", 370), ("G", 392), ("G#", 415), ("A", 440), ("A#", 466), ("B", 494),
    ]),
    (4, "G", [
        ("G", 196), ("G#", 208), ("A", 220), ("A#", 233), ("B", 247), ("C", 262), ("C#", 278),
        ("D", 294), ("D#", 311), ("E", 330), ("F", 349), ("F#", 370), ("G", 392),
    ]),
    (3, "D", [
        ("D", 147), ("D#", 156), ("E", 165), ("F", 175), ("F#", 185), ("G", 196), ("G#", 208),
        ("A", 220), ("A#", 233), ("B", 247), ("C", 262), ("C#", 278), ("D", 294),
    ]),
    (2, "A", [
        ("A", 110), ("A#", 117), ("B", 124), ("C", 131), ("C#", 139), ("D", 147), ("D#", 156),
        ("E", 165), ("F", 175), ("F#", 185), ("G", 196), ("G#", 208), ("A", 220),
    ]),
    (1, "Low E", [
        ("E", 82), ("F", 87), ("F#", 93), ("G", 98), ("G#", 104), ("A", 110), ("A#", 117),
        ("B", 124), ("C", 131), ("C#", 139), ("D", 147), ("D#", 156), ("E", 165),
    ]),
];

/// Validated, immutable list of note positions.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteTable {
    entries: Vec<NoteFrequency>,
}

impl NoteTable {
    /// Build a table, rejecting empty input and out-of-range rows.
    pub fn new(entries: Vec<NoteFrequency>) -> Result<Self, DatasetError> {
        if entries.is_empty() {
            return Err(MalformedReason::Empty.into());
        }
        for (i, entry) in entries.iter().enumerate() {
            check_row(entry, i + 1)?;
        }
        Ok(Self { entries })
    }

    /// The 78-position standard-tuning table.
    pub fn standard() -> Self {
        let entries = STANDARD_TUNING
            .iter()
            .flat_map(|(string, name, notes)| {
                notes.iter().enumerate().map(move |(fret, (note, freq))| {
                    NoteFrequency::new(*string, *name, fret as u8, *note, f32::from(*freq))
                })
            })
            .collect();
        Self { entries }
    }

    /// Rows in table order.
    pub fn entries(&self) -> &[NoteFrequency] {
        &self.entries
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed table; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when `note` is one of this table's rows.
    pub fn contains(&self, note: &NoteFrequency) -> bool {
        self.entries.contains(note)
    }

    /// Load a table from a CSV file.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file =
            std::fs::File::open(path).map_err(|e| DatasetError::read_file(path, e))?;
        let table = Self::from_csv_reader(file)?;
        tracing::info!(path = %path.display(), rows = table.len(), "loaded note table");
        Ok(table)
    }

    /// Parse a table from CSV text.
    ///
    /// The header must name every column in [`NOTE_TABLE_COLUMNS`]; column
    /// order is free and extra columns are ignored. Blank lines are skipped.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut lines = BufReader::new(reader).lines();

        let header = loop {
            match lines.next() {
                Some(line) => {
                    let line = line?;
                    if !line.trim().is_empty() {
                        break split_fields(&line, 0)?;
                    }
                }
                None => return Err(MalformedReason::Empty.into()),
            }
        };

        let column = |name: &'static str| -> Result<usize, DatasetError> {
            header
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| MalformedReason::MissingColumn(name).into())
        };
        let string_col = column("string")?;
        let name_col = column("string_name")?;
        let fret_col = column("fret")?;
        let note_col = column("note")?;
        let freq_col = column("frequency")?;

        let mut entries = Vec::new();
        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let row = entries.len() + 1;
            let fields = split_fields(&line, row)?;
            if fields.len() != header.len() {
                return Err(MalformedReason::FieldCount {
                    row,
                    expected: header.len(),
                    found: fields.len(),
                }
                .into());
            }

            let entry = NoteFrequency {
                string: parse_field(&fields[string_col], row, "string")?,
                string_name: fields[name_col].clone(),
                fret: parse_field(&fields[fret_col], row, "fret")?,
                note: fields[note_col].clone(),
                frequency: parse_field(&fields[freq_col], row, "frequency")?,
            };
            check_row(&entry, row)?;
            entries.push(entry);
        }

        if entries.is_empty() {
            return Err(MalformedReason::Empty.into());
        }
        Ok(Self { entries })
    }

    /// Write the table as CSV with the [`NOTE_TABLE_COLUMNS`] header.
    ///
    /// Names holding a comma or a quote are written quoted.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writeln!(writer, "{}", NOTE_TABLE_COLUMNS.join(","))?;
        for e in &self.entries {
            let row = csv_text::join([
                e.string.to_string(),
                e.string_name.clone(),
                e.fret.to_string(),
                e.note.clone(),
                e.frequency.to_string(),
            ]);
            writeln!(writer, "{row}")?;
        }
        Ok(())
    }

    /// Write the table to a CSV file.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<(), DatasetError> {
        let path = path.as_ref();
        let file =
            std::fs::File::create(path).map_err(|e| DatasetError::write_file(path, e))?;
        self.write_csv(std::io::BufWriter::new(file))
            .map_err(|e| DatasetError::write_file(path, e))
    }

    /// Check the invariants of a complete fretboard table.
    ///
    /// - exactly [`STANDARD_TABLE_LEN`] rows, one per (string, fret) pair
    /// - frequency strictly increases with fret along each string
    /// - each string's open note also appears on the next lower string
    pub fn validate_layout(&self) -> Result<(), DatasetError> {
        let layout = |msg: String| DatasetError::from(MalformedReason::Layout(msg));

        if self.entries.len() != STANDARD_TABLE_LEN {
            return Err(layout(format!(
                "expected {STANDARD_TABLE_LEN} rows, found {}",
                self.entries.len()
            )));
        }

        let mut strings: Vec<Vec<&NoteFrequency>> = vec![Vec::new(); STRING_RANGE.len()];
        for entry in &self.entries {
            strings[usize::from(entry.string - STRING_RANGE.start())].push(entry);
        }

        for (offset, frets) in strings.iter_mut().enumerate() {
            let string = offset as u8 + STRING_RANGE.start();
            frets.sort_by_key(|e| e.fret);

            let positions: Vec<u8> = frets.iter().map(|e| e.fret).collect();
            let expected: Vec<u8> = FRET_RANGE.collect();
            if positions != expected {
                return Err(layout(format!(
                    "string {string} does not cover frets {}-{} exactly once",
                    FRET_RANGE.start(),
                    FRET_RANGE.end()
                )));
            }

            if let Some(pair) = frets.windows(2).find(|w| w[1].frequency <= w[0].frequency) {
                return Err(layout(format!(
                    "string {string}: frequency does not increase from fret {} to fret {}",
                    pair[0].fret, pair[1].fret
                )));
            }
        }

        for lower in 0..strings.len() - 1 {
            let open_next = strings[lower + 1][0].frequency;
            if !strings[lower].iter().any(|e| e.frequency == open_next) {
                return Err(layout(format!(
                    "open string {} ({open_next} Hz) is not shared with string {}",
                    lower + 2,
                    lower + 1
                )));
            }
        }

        Ok(())
    }
}

fn check_row(entry: &NoteFrequency, row: usize) -> Result<(), MalformedReason> {
    // rows are read line by line, so a name cannot span lines
    for (column, value) in [("string_name", &entry.string_name), ("note", &entry.note)] {
        if value.contains(['\n', '\r']) {
            return Err(MalformedReason::InvalidValue {
                row,
                column,
                value: value.clone(),
            });
        }
    }
    if !STRING_RANGE.contains(&entry.string) {
        return Err(MalformedReason::OutOfRange {
            row,
            column: "string",
            value: entry.string.to_string(),
        });
    }
    if !FRET_RANGE.contains(&entry.fret) {
        return Err(MalformedReason::OutOfRange {
            row,
            column: "fret",
            value: entry.fret.to_string(),
        });
    }
    if !entry.is_in_range() {
        return Err(MalformedReason::OutOfRange {
            row,
            column: "frequency",
            value: entry.frequency.to_string(),
        });
    }
    Ok(())
}

fn split_fields(line: &str, row: usize) -> Result<Vec<String>, MalformedReason> {
    csv_text::split(line).ok_or(MalformedReason::UnterminatedQuote { row })
}

fn parse_field<T: std::str::FromStr>(
    raw: &str,
    row: usize,
    column: &'static str,
) -> Result<T, MalformedReason> {
    raw.parse().map_err(|_| MalformedReason::InvalidValue {
        row,
        column,
        value: raw.to_string(),
    })
}
