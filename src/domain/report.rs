// ============================================================
// Layer 3 — Experiment Results Table
// ============================================================
// One row per variant. A row either carries the metrics of a
// completed train/evaluate/save sequence or the error that
// stopped it; a failed variant never removes the other rows.

use serde::{Deserialize, Serialize};

use crate::domain::variant::Variant;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantReport {
    pub variant: Variant,

    /// Held-out AUC, absent when the variant failed
    pub auc: Option<f64>,

    /// Mean training loss of every epoch, in order
    pub epoch_losses: Vec<f64>,

    /// Path of the saved parameter record
    pub artifact: Option<String>,

    /// Rendered error chain when the variant failed
    pub error: Option<String>,
}

impl VariantReport {
    pub fn succeeded(
        variant:      Variant,
        auc:          f64,
        epoch_losses: Vec<f64>,
        artifact:     impl Into<String>,
    ) -> Self {
        Self {
            variant,
            auc: Some(auc),
            epoch_losses,
            artifact: Some(artifact.into()),
            error: None,
        }
    }

    pub fn failed(variant: Variant, error: impl Into<String>) -> Self {
        Self {
            variant,
            auc: None,
            epoch_losses: Vec::new(),
            artifact: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsTable {
    pub reports: Vec<VariantReport>,
}

impl ResultsTable {
    pub fn push(&mut self, report: VariantReport) {
        self.reports.push(report);
    }

    #[cfg(test)]
    pub fn get(&self, variant: Variant) -> Option<&VariantReport> {
        self.reports.iter().find(|r| r.variant == variant)
    }

    pub fn success_count(&self) -> usize {
        self.reports.iter().filter(|r| r.is_success()).count()
    }
}
