// ============================================================
// Layer 3 — Raw Table Domain Type
// ============================================================
// A tab-separated file after decoding and parsing, before any
// typing: trimmed column names plus rows of string cells.
// Every row has exactly `columns.len()` cells (the loader rejects
// ragged rows), so column indices are valid for every row.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    /// Header names, whitespace-trimmed
    pub columns: Vec<String>,

    /// Data rows in file order
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Position of a column by exact (already trimmed) name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate one column's cells top to bottom
    pub fn column<'a>(&'a self, index: usize) -> impl Iterator<Item = &'a str> + 'a {
        self.rows.iter().map(move |row| row[index].as_str())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
