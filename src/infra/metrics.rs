// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records experiment metrics next to the artifacts:
//
//   metrics.csv  — one row per (variant, epoch) with the mean
//                  training loss, appended as training runs;
//                  truncated when a new experiment starts
//   results.json — the final results table, one entry per variant
//
// Example CSV output:
//   variant,epoch,train_loss
//   full,1,0.693112
//   full,2,0.688540
//   ...
//   no-embedding,1,0.701954
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::domain::{report::ResultsTable, variant::Variant};

const CSV_HEADER: &str = "variant,epoch,train_loss";

/// Appends epoch losses to a CSV file and writes the results table.
pub struct MetricsLogger {
    csv_path:     PathBuf,
    results_path: PathBuf,
}

impl MetricsLogger {
    /// Create a logger writing into `dir`.
    /// Starts a fresh CSV: rows from an earlier run in the same
    /// directory are discarded, like the records and results.json.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let csv_path = dir.join("metrics.csv");
        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "{CSV_HEADER}")?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path, results_path: dir.join("results.json") })
    }

    /// Append one epoch's mean loss.
    pub fn log_epoch(&self, variant: Variant, epoch: usize, train_loss: f64) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(f, "{},{},{:.6}", variant, epoch, train_loss)?;

        tracing::debug!("Logged {} epoch {}: train_loss={:.4}", variant, epoch, train_loss);
        Ok(())
    }

    /// Overwrite results.json with the full table.
    pub fn write_results(&self, results: &ResultsTable) -> Result<()> {
        let json = serde_json::to_string_pretty(results)?;
        fs::write(&self.results_path, json)
            .with_context(|| format!("Cannot write '{}'", self.results_path.display()))?;
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    pub fn results_path(&self) -> &Path {
        &self.results_path
    }
}
