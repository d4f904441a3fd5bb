// ============================================================
// Layer 4 — Feature Preprocessor
// ============================================================
// Turns a RawTable into numeric feature rows and 0/1 labels.
//
// Steps:
//   1. Locate the label column (names were trimmed by the loader)
//   2. Every other column is a feature column
//   3. Decide per column whether it is numeric or categorical:
//        numeric     — every non-empty cell parses as a number
//        categorical — anything else
//   4. Categorical columns: sort the distinct values and give each
//      one its position as code, so codes span 0..k-1
//
// The schema is fitted on the whole table BEFORE the train/test
// split. Category codes are therefore shared by both splits and no
// category can be unseen at evaluation time. This leaks category
// identity (never target values) across the split.
//
// The fitted FeatureSchema is saved next to the model artifacts so
// `predict` encodes new files exactly like training did.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::domain::{error::PipelineError, table::RawTable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    /// Sorted distinct values; a value's code is its index
    Categorical { categories: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureColumn {
    pub name: String,
    pub kind: ColumnKind,
}

/// Everything needed to encode a table the same way twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub label_column:    String,
    pub feature_columns: Vec<FeatureColumn>,
}

/// Features and labels ready to become samples, in table row order.
#[derive(Debug, Clone)]
pub struct EncodedTable {
    pub features: Vec<Vec<f32>>,
    pub labels:   Vec<f32>,
}

impl FeatureSchema {
    /// Fit column kinds and category codes on the full table.
    pub fn fit(table: &RawTable, label_column: &str) -> Result<Self, PipelineError> {
        if table.column_index(label_column).is_none() {
            return Err(PipelineError::MissingLabelColumn(label_column.to_string()));
        }

        let feature_columns = table
            .columns
            .iter()
            .enumerate()
            .filter(|(_, name)| name.as_str() != label_column)
            .map(|(idx, name)| FeatureColumn {
                name: name.clone(),
                kind: infer_kind(table, idx),
            })
            .collect::<Vec<_>>();

        for col in &feature_columns {
            if let ColumnKind::Categorical { categories } = &col.kind {
                tracing::debug!("Column '{}' is categorical ({} values)", col.name, categories.len());
            }
        }

        Ok(Self { label_column: label_column.to_string(), feature_columns })
    }

    pub fn input_dim(&self) -> usize {
        self.feature_columns.len()
    }

    /// Encode every feature column of `table` into f32 rows.
    /// The table may or may not contain the label column.
    pub fn encode_features(&self, table: &RawTable) -> Result<Vec<Vec<f32>>, PipelineError> {
        let mut columns = Vec::with_capacity(self.feature_columns.len());
        for col in &self.feature_columns {
            let idx = table
                .column_index(&col.name)
                .ok_or_else(|| PipelineError::MissingFeatureColumn(col.name.clone()))?;
            columns.push(encode_column(table, idx, col)?);
        }

        let rows = (0..table.row_count())
            .map(|r| columns.iter().map(|c| c[r]).collect())
            .collect();
        Ok(rows)
    }

    /// Coerce the label column to {0, 1}.
    pub fn encode_labels(&self, table: &RawTable) -> Result<Vec<f32>, PipelineError> {
        let idx = table
            .column_index(&self.label_column)
            .ok_or_else(|| PipelineError::MissingLabelColumn(self.label_column.clone()))?;

        table
            .column(idx)
            .enumerate()
            .map(|(row, value)| {
                parse_label(value).ok_or_else(|| PipelineError::InvalidLabel {
                    column: self.label_column.clone(),
                    row,
                    value: value.to_string(),
                })
            })
            .collect()
    }
}

/// Separates label and features and applies categorical encoding.
pub struct Preprocessor {
    label_column: String,
}

impl Preprocessor {
    pub fn new(label_column: impl Into<String>) -> Self {
        Self { label_column: label_column.into() }
    }

    /// Fit a schema on `table` and encode it in one pass.
    pub fn fit_transform(&self, table: &RawTable) -> Result<(FeatureSchema, EncodedTable), PipelineError> {
        let schema   = FeatureSchema::fit(table, &self.label_column)?;
        let features = schema.encode_features(table)?;
        let labels   = schema.encode_labels(table)?;
        Ok((schema, EncodedTable { features, labels }))
    }
}

fn infer_kind(table: &RawTable, idx: usize) -> ColumnKind {
    let numeric = table
        .column(idx)
        .map(str::trim)
        .all(|v| v.is_empty() || v.parse::<f64>().is_ok());

    if numeric {
        return ColumnKind::Numeric;
    }

    let categories: BTreeSet<String> = table.column(idx).map(str::to_string).collect();
    ColumnKind::Categorical { categories: categories.into_iter().collect() }
}

fn encode_column(table: &RawTable, idx: usize, col: &FeatureColumn) -> Result<Vec<f32>, PipelineError> {
    match &col.kind {
        ColumnKind::Numeric => {
            let mut missing = 0usize;
            let values = table
                .column(idx)
                .enumerate()
                .map(|(row, v)| {
                    let v = v.trim();
                    if v.is_empty() {
                        missing += 1;
                        return Ok(0.0);
                    }
                    // A categorical value in a column fitted as numeric
                    v.parse::<f32>().map_err(|_| PipelineError::UnknownCategory {
                        column: col.name.clone(),
                        row,
                        value:  v.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            if missing > 0 {
                tracing::warn!("Column '{}': {} empty cells encoded as 0", col.name, missing);
            }
            Ok(values)
        }
        ColumnKind::Categorical { categories } => {
            let codes: HashMap<&str, usize> = categories
                .iter()
                .enumerate()
                .map(|(code, value)| (value.as_str(), code))
                .collect();
            table
                .column(idx)
                .enumerate()
                .map(|(row, v)| {
                    codes.get(v).map(|&c| c as f32).ok_or_else(|| PipelineError::UnknownCategory {
                        column: col.name.clone(),
                        row,
                        value:  v.to_string(),
                    })
                })
                .collect()
        }
    }
}

fn parse_label(value: &str) -> Option<f32> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        return Some(1.0);
    }
    if value.eq_ignore_ascii_case("false") {
        return Some(0.0);
    }
    match value.parse::<f64>().ok()? {
        v if v == 0.0 => Some(0.0),
        v if v == 1.0 => Some(1.0),
        _ => None,
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            columns.iter().map(|s| s.to_string()).collect(),
            rows.iter().map(|r| r.iter().map(|s| s.to_string()).collect()).collect(),
        )
    }

    #[test]
    fn test_categorical_codes_are_sorted_and_dense() {
        let t = table(
            &["x", "colour", "is_tree"],
            &[&["1.5", "red", "1"], &["2", "blue", "0"], &["3", "red", "0"], &["4", "green", "1"]],
        );
        let (schema, encoded) = Preprocessor::new("is_tree").fit_transform(&t).unwrap();

        assert_eq!(schema.input_dim(), 2);
        assert_eq!(schema.feature_columns[0].kind, ColumnKind::Numeric);
        // blue=0, green=1, red=2
        let colour: Vec<f32> = encoded.features.iter().map(|r| r[1]).collect();
        assert_eq!(colour, vec![2.0, 0.0, 2.0, 1.0]);
        assert!(colour.iter().all(|&c| (0.0..3.0).contains(&c)));
        assert_eq!(encoded.labels, vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_missing_label_column() {
        let t   = table(&["a", "b"], &[&["1", "2"]]);
        let err = Preprocessor::new("is_tree").fit_transform(&t).unwrap_err();
        assert!(matches!(err, PipelineError::MissingLabelColumn(ref c) if c == "is_tree"));
    }

    #[test]
    fn test_label_coercion() {
        assert_eq!(parse_label("1.0"), Some(1.0));
        assert_eq!(parse_label(" 0 "), Some(0.0));
        assert_eq!(parse_label("TRUE"), Some(1.0));
        assert_eq!(parse_label("2"), None);
        assert_eq!(parse_label("yes"), None);
    }

    #[test]
    fn test_invalid_label_reports_row() {
        let t   = table(&["a", "is_tree"], &[&["1", "0"], &["2", "maybe"]]);
        let err = Preprocessor::new("is_tree").fit_transform(&t).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidLabel { row: 1, .. }));
    }

    #[test]
    fn test_unseen_category_rejected_on_reuse() {
        let train = table(&["c", "is_tree"], &[&["a", "0"], &["b", "1"]]);
        let (schema, _) = Preprocessor::new("is_tree").fit_transform(&train).unwrap();

        let new_rows = table(&["c"], &[&["z"]]);
        let err = schema.encode_features(&new_rows).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownCategory { .. }));
    }

    #[test]
    fn test_empty_numeric_cells_become_zero() {
        let t = table(&["x", "is_tree"], &[&["", "0"], &["3", "1"]]);
        let (_, encoded) = Preprocessor::new("is_tree").fit_transform(&t).unwrap();
        assert_eq!(encoded.features, vec![vec![0.0], vec![3.0]]);
    }
}
