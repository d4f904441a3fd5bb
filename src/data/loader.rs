// ============================================================
// Layer 4 — Tab-Separated Table Loader
// ============================================================
// Reads a delimited text file with one header row into a RawTable.
//
// Decoding happens in up to two attempts:
//   1. UTF-8, with a leading byte-order mark removed
//   2. Latin-1 (every byte maps to one char, so it cannot fail)
//
// Attempt 2 only runs when attempt 1 rejects the bytes. A missing
// or unreadable file is not retried; it aborts the run before any
// artifact directory is created.
//
// Column names frequently carry stray spaces from spreadsheet
// exports (" is_tree"), so every header cell is trimmed.
//
// Reference: csv crate documentation
//            Rust Book §8 (Strings), §9 (Error Handling)

use csv::ReaderBuilder;
use std::{fs, path::PathBuf};

use crate::domain::{error::PipelineError, table::RawTable, traits::TableSource};

const UTF8_BOM: char = '\u{FEFF}';

/// Text encodings tried in order when decoding the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

impl TextEncoding {
    fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes)
                .ok()
                .map(|s| s.strip_prefix(UTF8_BOM).unwrap_or(s).to_string()),
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

/// Loads one delimited file. Implements the TableSource trait from Layer 3.
pub struct TsvLoader {
    path: PathBuf,
}

impl TsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn decode(&self, bytes: &[u8]) -> Result<(String, TextEncoding), PipelineError> {
        if let Some(text) = TextEncoding::Utf8.decode(bytes) {
            return Ok((text, TextEncoding::Utf8));
        }
        tracing::warn!(
            "'{}' is not valid UTF-8, retrying as Latin-1",
            self.path.display()
        );
        TextEncoding::Latin1
            .decode(bytes)
            .map(|text| (text, TextEncoding::Latin1))
            .ok_or_else(|| PipelineError::InputRead {
                path:   self.path.display().to_string(),
                reason: "no supported text encoding".to_string(),
            })
    }

    fn parse(&self, text: &str) -> Result<RawTable, PipelineError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(false)
            .from_reader(text.as_bytes());

        let columns: Vec<String> = rdr
            .headers()
            .map_err(|e| malformed(&e))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(|e| malformed(&e))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(RawTable::new(columns, rows))
    }
}

impl TableSource for TsvLoader {
    fn load(&self) -> Result<RawTable, PipelineError> {
        let bytes = fs::read(&self.path).map_err(|e| PipelineError::InputRead {
            path:   self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        let (text, encoding) = self.decode(&bytes)?;
        let table = self.parse(&text)?;

        tracing::info!(
            "Loaded '{}' ({:?}): {} rows, columns {:?}",
            self.path.display(),
            encoding,
            table.row_count(),
            table.columns,
        );
        Ok(table)
    }
}

fn malformed(e: &csv::Error) -> PipelineError {
    let line = e.position().map(|p| p.line()).unwrap_or(0);
    PipelineError::MalformedTable { line, reason: e.to_string() }
}
