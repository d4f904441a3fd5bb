// ============================================================
// Layer 2 — ExperimentUseCase
// ============================================================
// Orchestrates one ablation experiment in order:
//
//   Step 1: Load the tab-separated table      (Layer 4 - data)
//   Step 2: Separate label, encode features   (Layer 4 - data)
//   Step 3: Seeded train/test split           (Layer 4 - data)
//   Step 4: Save config + feature schema      (Layer 6 - infra)
//   Step 5: For each variant, in order:       (Layer 5 - ml)
//             build → train → evaluate → save
//   Step 6: Write the results table           (Layer 6 - infra)
//
// Steps 1–3 abort the whole run: without data there is nothing to
// compare, and no artifact directory has been created yet.
// Step 5 is isolated per variant: a failing variant is recorded in
// the results table and the next variant still runs.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use burn::data::dataset::Dataset;

use crate::data::{
    dataset::TabularDataset,
    loader::TsvLoader,
    preprocessor::Preprocessor,
    splitter::split_train_test,
};
use crate::domain::{
    error::PipelineError,
    report::{ResultsTable, VariantReport},
    traits::TableSource,
    variant::Variant,
};
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::trainer::run_variant;

// ─── Experiment Configuration ─────────────────────────────────────────────────
// Every hyperparameter of a run. Saved beside the artifacts so a
// variant can be rebuilt later for prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub data_path:     String,
    pub label_column:  String,
    pub artifact_dir:  String,
    pub embedding_dim: usize,
    pub epochs:        usize,
    pub lr:            f64,
    pub batch_size:    usize,
    pub test_size:     f64,
    pub random_state:  u64,
    pub variants:      Vec<Variant>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            data_path:     "./merged_label".to_string(),
            label_column:  "is_tree".to_string(),
            artifact_dir:  "artifacts".to_string(),
            embedding_dim: 128,
            epochs:        10,
            lr:            1e-4,
            batch_size:    2000,
            test_size:     0.2,
            random_state:  42,
            variants:      Variant::ALL.to_vec(),
        }
    }
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            bail!("batch_size must be at least 1");
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            bail!("test_size must lie strictly between 0 and 1, got {}", self.test_size);
        }
        if !(self.lr > 0.0) {
            bail!("learning rate must be positive, got {}", self.lr);
        }
        if self.variants.is_empty() {
            bail!("no variants selected");
        }
        Ok(())
    }
}

// ─── ExperimentUseCase ────────────────────────────────────────────────────────
pub struct ExperimentUseCase {
    config: ExperimentConfig,
}

impl ExperimentUseCase {
    pub fn new(config: ExperimentConfig) -> Self {
        Self { config }
    }

    /// Run every selected variant and return the results table.
    pub fn execute(&self) -> Result<ResultsTable> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Load table (header names trimmed) ─────────────────────────
        let table = TsvLoader::new(&cfg.data_path)
            .load()
            .context("loading input table")?;
        println!("Columns: {:?}", table.columns);

        // ── Step 2: Label separation + categorical encoding ───────────────────
        // Fitted on the full table, before splitting
        let (schema, encoded) = Preprocessor::new(&cfg.label_column)
            .fit_transform(&table)
            .context("preparing features")?;
        if encoded.labels.is_empty() {
            return Err(PipelineError::EmptyDataset("input table").into());
        }
        tracing::info!(
            "{} samples, {} features ({} categorical)",
            encoded.labels.len(),
            schema.input_dim(),
            schema
                .feature_columns
                .iter()
                .filter(|c| !matches!(c.kind, crate::data::preprocessor::ColumnKind::Numeric))
                .count(),
        );

        // ── Step 3: Train / test split ────────────────────────────────────────
        let rows = encoded.features.into_iter().zip(encoded.labels).collect::<Vec<_>>();
        let (train_rows, test_rows) = split_train_test(rows, cfg.test_size, cfg.random_state);
        let train_dataset = to_dataset(train_rows);
        let test_dataset  = to_dataset(test_rows);
        tracing::info!(
            "Split: {} train, {} test ({} positive)",
            train_dataset.len(),
            test_dataset.len(),
            test_dataset.labels().filter(|&l| l == 1.0).count(),
        );

        // ── Step 4: Persist config + schema ───────────────────────────────────
        let ckpt_manager = CheckpointManager::create(&cfg.artifact_dir)?;
        ckpt_manager.save_config(cfg)?;
        ckpt_manager.save_schema(&schema)?;
        let metrics = MetricsLogger::new(&cfg.artifact_dir)?;
        tracing::info!("Epoch losses: '{}'", metrics.csv_path().display());

        // ── Step 5: One isolated run per variant ──────────────────────────────
        let mut results = ResultsTable::default();
        for &variant in &cfg.variants {
            println!("Training variant: {variant}");
            let report = match run_variant(
                cfg,
                variant,
                train_dataset.clone(),
                test_dataset.clone(),
                &ckpt_manager,
                &metrics,
            ) {
                Ok(outcome) => VariantReport::succeeded(
                    variant,
                    outcome.auc,
                    outcome.epoch_losses,
                    outcome.artifact.display().to_string(),
                ),
                Err(e) => {
                    tracing::error!("Variant {} failed: {:#}", variant, e);
                    VariantReport::failed(variant, format!("{e:#}"))
                }
            };
            results.push(report);
        }

        // ── Step 6: Results table ─────────────────────────────────────────────
        metrics.write_results(&results)?;
        tracing::info!("Results table: '{}'", metrics.results_path().display());
        tracing::info!(
            "Experiment finished: {}/{} variants succeeded",
            results.success_count(),
            results.reports.len()
        );
        Ok(results)
    }
}

fn to_dataset(rows: Vec<(Vec<f32>, f32)>) -> TabularDataset {
    let (features, labels) = rows.into_iter().unzip();
    TabularDataset::from_columns(features, labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const CATEGORIES: [&str; 3] = ["oak", "pine", "birch"];

    /// 20 rows: 3 numeric features, 1 categorical, label is_tree.
    /// The header has stray spaces around " height ".
    fn write_table(path: &Path) -> Vec<f32> {
        let mut text  = String::from("width\t height \tdepth\tspecies\tis_tree\n");
        let mut labels = Vec::new();
        for i in 0..20 {
            let label = (i % 2) as f32;
            let shift = if label == 1.0 { 2.0 } else { 0.0 };
            text.push_str(&format!(
                "{:.2}\t{:.2}\t{}\t{}\t{}\n",
                i as f32 * 0.1 + shift,
                (20 - i) as f32 * 0.05,
                i % 4,
                CATEGORIES[i % 3],
                label as u8,
            ));
            labels.push(label);
        }
        std::fs::write(path, text).unwrap();
        labels
    }

    /// First seed whose test split holds both classes, so AUC is defined
    fn seed_with_both_classes(labels: &[f32], test_size: f64) -> u64 {
        (0u64..)
            .find(|&seed| {
                let (_, test) = split_train_test(labels.to_vec(), test_size, seed);
                test.contains(&0.0) && test.contains(&1.0)
            })
            .unwrap()
    }

    fn config(dir: &Path, data: &Path, labels: &[f32]) -> ExperimentConfig {
        ExperimentConfig {
            data_path:    data.display().to_string(),
            artifact_dir: dir.join("artifacts").display().to_string(),
            random_state: seed_with_both_classes(labels, 0.2),
            ..ExperimentConfig::default()
        }
    }

    #[test]
    fn test_end_to_end_all_variants() {
        let dir    = tempfile::tempdir().unwrap();
        let data   = dir.path().join("merged_label");
        let labels = write_table(&data);
        let cfg    = config(dir.path(), &data, &labels);

        let results = ExperimentUseCase::new(cfg.clone()).execute().unwrap();

        assert_eq!(results.reports.len(), 3);
        for (report, variant) in results.reports.iter().zip(Variant::ALL) {
            assert_eq!(report.variant, variant);
            assert!(report.is_success(), "{variant}: {:?}", report.error);
            let auc = report.auc.unwrap();
            assert!((0.0..=1.0).contains(&auc), "{variant}: {auc}");
            assert_eq!(report.epoch_losses.len(), 10);
            assert!(Path::new(report.artifact.as_deref().unwrap()).exists());
        }

        let artifacts = Path::new(&cfg.artifact_dir);
        for variant in Variant::ALL {
            assert!(artifacts.join(format!("{}.mpk.gz", variant.artifact_name())).exists());
        }
        assert!(artifacts.join("results.json").exists());

        // Header trimmed, categorical column encoded to 0..k-1
        let schema = CheckpointManager::open(artifacts).load_schema().unwrap();
        assert_eq!(schema.feature_columns[1].name, "height");
        match &schema.feature_columns[3].kind {
            crate::data::preprocessor::ColumnKind::Categorical { categories } => {
                assert_eq!(categories, &vec!["birch", "oak", "pine"]);
            }
            other => panic!("species should be categorical, got {other:?}"),
        }
    }

    #[test]
    fn test_failing_variant_does_not_stop_the_others() {
        let dir    = tempfile::tempdir().unwrap();
        let data   = dir.path().join("merged_label");
        let labels = write_table(&data);
        let cfg = ExperimentConfig {
            // too narrow for the Full variant's truncation
            embedding_dim: 16,
            epochs: 2,
            ..config(dir.path(), &data, &labels)
        };

        let results = ExperimentUseCase::new(cfg).execute().unwrap();

        let full = results.get(Variant::Full).unwrap();
        assert!(!full.is_success());
        assert!(full.error.as_deref().unwrap().contains("fusion requires 32"));
        assert!(results.get(Variant::NoEmbedding).unwrap().is_success());
        assert!(results.get(Variant::NoAttention).unwrap().is_success());
        assert_eq!(results.success_count(), 2);
    }

    #[test]
    fn test_rerun_replaces_epoch_metrics() {
        let dir    = tempfile::tempdir().unwrap();
        let data   = dir.path().join("merged_label");
        let labels = write_table(&data);
        let cfg = ExperimentConfig {
            epochs: 2,
            variants: vec![Variant::NoAttention],
            ..config(dir.path(), &data, &labels)
        };

        ExperimentUseCase::new(cfg.clone()).execute().unwrap();
        ExperimentUseCase::new(cfg.clone()).execute().unwrap();

        let csv = std::fs::read_to_string(Path::new(&cfg.artifact_dir).join("metrics.csv")).unwrap();
        let rows: Vec<_> = csv.lines().skip(1).collect();
        assert_eq!(rows.len(), 2, "{csv}");
        assert!(rows.iter().all(|r| r.starts_with("no-attention,")));
    }

    #[test]
    fn test_missing_label_column_aborts_without_artifacts() {
        let dir  = tempfile::tempdir().unwrap();
        let data = dir.path().join("merged_label");
        std::fs::write(&data, "a\tb\n1\t2\n3\t4\n").unwrap();

        let cfg = ExperimentConfig {
            data_path:    data.display().to_string(),
            artifact_dir: dir.path().join("artifacts").display().to_string(),
            ..ExperimentConfig::default()
        };
        let err = ExperimentUseCase::new(cfg.clone()).execute().unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MissingLabelColumn(c)) if c == "is_tree"
        ));
        assert!(!Path::new(&cfg.artifact_dir).exists());
    }

    #[test]
    fn test_missing_input_file_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ExperimentConfig {
            data_path:    dir.path().join("nope.tsv").display().to_string(),
            artifact_dir: dir.path().join("artifacts").display().to_string(),
            ..ExperimentConfig::default()
        };
        let err = ExperimentUseCase::new(cfg.clone()).execute().unwrap_err();
        assert!(matches!(err.downcast_ref::<PipelineError>(), Some(PipelineError::InputRead { .. })));
        assert!(!Path::new(&cfg.artifact_dir).exists());
    }

    #[test]
    fn test_config_validation() {
        assert!(ExperimentConfig::default().validate().is_ok());
        let bad = ExperimentConfig { test_size: 1.0, ..ExperimentConfig::default() };
        assert!(bad.validate().is_err());
        let bad = ExperimentConfig { batch_size: 0, ..ExperimentConfig::default() };
        assert!(bad.validate().is_err());
    }
}
