// ============================================================
// Layer 3 — Pipeline Errors
// ============================================================
// Typed failures the experiment must be able to tell apart:
//
//   (a) input-read      — file missing / undecodable / malformed
//   (b) schema          — label column absent, bad label values
//   (c) shape mismatch  — a branch cannot be fused at width 32;
//                         raised when the model is built
//   (d) degenerate AUC  — evaluation labels contain one class only,
//                         or a prediction is NaN / infinite
//
// The application layer wraps these in anyhow for context, but
// tests and the driver can still match on the concrete variant.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("cannot read input '{path}': {reason}")]
    InputRead { path: String, reason: String },

    #[error("malformed table at line {line}: {reason}")]
    MalformedTable { line: u64, reason: String },

    #[error("label column '{0}' not found in input header")]
    MissingLabelColumn(String),

    #[error("feature column '{0}' not found in input header")]
    MissingFeatureColumn(String),

    #[error("label column '{column}', row {row}: value '{value}' is not 0 or 1")]
    InvalidLabel { column: String, row: usize, value: String },

    #[error("column '{column}', row {row}: category '{value}' was not seen during encoding")]
    UnknownCategory { column: String, row: usize, value: String },

    #[error("{branch} branch produces width {actual}, fusion requires {expected}")]
    ShapeMismatch { branch: &'static str, actual: usize, expected: usize },

    #[error("AUC is undefined: evaluation labels contain only class {0}")]
    DegenerateMetric(u8),

    #[error("prediction {index} is not a finite score ({value})")]
    NonFiniteScore { index: usize, value: f32 },

    #[error("{labels} labels but {scores} predictions")]
    LengthMismatch { labels: usize, scores: usize },

    #[error("{0} is empty")]
    EmptyDataset(&'static str),

    #[error("tensor data conversion failed: {0}")]
    TensorData(String),

    #[error("unknown variant '{0}' (expected full, no-embedding or no-attention)")]
    UnknownVariant(String),
}
