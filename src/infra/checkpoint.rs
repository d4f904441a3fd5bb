// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores trained variants using Burn's named MessagePack
// recorder (gzip-compressed, full f32 precision so a reloaded model
// scores exactly like the one that was evaluated).
//
// What gets written per experiment run:
//   1. One parameter record per variant (.mpk.gz)
//   2. experiment_config.json — hyperparameters of the run
//   3. feature_schema.json    — column kinds and category codes
//
// Why save the config and schema separately?
//   A record only holds parameter values. To load one we must first
//   rebuild the same architecture (input_dim, embedding_dim, variant)
//   and to score new rows we must encode them with the same codes.
//
// File naming convention:
//   artifacts/
//     classification_model.mpk.gz      ← Full
//     model_without_embedding.mpk.gz   ← NoEmbedding
//     model_without_attention.mpk.gz   ← NoAttention
//     experiment_config.json
//     feature_schema.json
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};

use crate::application::experiment_use_case::ExperimentConfig;
use crate::data::preprocessor::FeatureSchema;
use crate::domain::variant::Variant;
use crate::ml::model::TabularClassifier;

const CONFIG_FILE: &str = "experiment_config.json";
const SCHEMA_FILE: &str = "feature_schema.json";
const RECORD_EXTENSION: &str = "mpk.gz";

type ArtifactRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

/// Manages saving and loading of variant artifacts in one directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create the manager and its directory (like `mkdir -p`).
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create artifact directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Open an existing artifact directory for loading.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path a variant's record is written to, extension included
    pub fn artifact_path(&self, variant: Variant) -> PathBuf {
        self.dir
            .join(variant.artifact_name())
            .with_extension(RECORD_EXTENSION)
    }

    /// Serialise a variant's parameters. Returns the written path.
    pub fn save_model<B: Backend>(&self, model: &TabularClassifier<B>, variant: Variant) -> Result<PathBuf> {
        // The recorder appends its own extension
        let stem = self.dir.join(variant.artifact_name());

        ArtifactRecorder::new()
            .record(model.clone().into_record(), stem.clone())
            .with_context(|| format!("Failed to save {} to '{}'", variant, stem.display()))?;

        let path = self.artifact_path(variant);
        tracing::info!("Saved {} parameters to '{}'", variant, path.display());
        Ok(path)
    }

    /// Load a variant's parameters into a freshly built model of the
    /// same architecture. Fails if the shapes do not match.
    pub fn load_model<B: Backend>(
        &self,
        model:   TabularClassifier<B>,
        variant: Variant,
        device:  &B::Device,
    ) -> Result<TabularClassifier<B>> {
        let stem = self.dir.join(variant.artifact_name());

        let record = ArtifactRecorder::new()
            .load(stem.clone(), device)
            .with_context(|| {
                format!("Cannot load '{}'. Has this variant been trained?", stem.display())
            })?;

        Ok(model.load_record(record))
    }

    pub fn save_config(&self, cfg: &ExperimentConfig) -> Result<()> {
        self.write_json(CONFIG_FILE, cfg)
    }

    pub fn load_config(&self) -> Result<ExperimentConfig> {
        self.read_json(CONFIG_FILE)
    }

    pub fn save_schema(&self, schema: &FeatureSchema) -> Result<()> {
        self.write_json(SCHEMA_FILE, schema)
    }

    pub fn load_schema(&self) -> Result<FeatureSchema> {
        self.read_json(SCHEMA_FILE)
    }

    fn write_json<T: serde::Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        tracing::debug!("Wrote '{}'", path.display());
        Ok(())
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        let json = fs::read_to_string(&path).with_context(|| {
            format!("Cannot read '{}'. Run the experiment before predicting.", path.display())
        })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Cannot parse '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::TabularClassifierConfig;
    use burn::{backend::NdArray, tensor::Distribution};

    type TestBackend = NdArray;

    #[test]
    fn test_saved_record_reproduces_predictions() {
        let dir     = tempfile::tempdir().unwrap();
        let ckpt    = CheckpointManager::create(dir.path()).unwrap();
        let device  = Default::default();
        let config  = TabularClassifierConfig::new(5, 32, Variant::NoEmbedding);

        let trained: TabularClassifier<TestBackend> = config.init(&device).unwrap();
        let path = ckpt.save_model(&trained, Variant::NoEmbedding).unwrap();
        assert!(path.exists(), "{}", path.display());

        let fresh: TabularClassifier<TestBackend> = config.init(&device).unwrap();
        let loaded = ckpt.load_model(fresh, Variant::NoEmbedding, &device).unwrap();

        let x = Tensor::<TestBackend, 2>::random([6, 5], Distribution::Default, &device);
        let expected = trained.forward(x.clone()).into_data().convert::<f32>().to_vec::<f32>().unwrap();
        let actual   = loaded.forward(x).into_data().convert::<f32>().to_vec::<f32>().unwrap();
        for (a, e) in actual.iter().zip(&expected) {
            assert!((a - e).abs() < 1e-6);
        }
    }

    #[test]
    fn test_missing_record_is_reported() {
        let dir   = tempfile::tempdir().unwrap();
        let ckpt  = CheckpointManager::open(dir.path());
        let model: TabularClassifier<TestBackend> = TabularClassifierConfig::new(3, 32, Variant::Full)
            .init(&Default::default())
            .unwrap();
        assert!(ckpt.load_model(model, Variant::Full, &Default::default()).is_err());
        assert!(ckpt.load_schema().is_err());
    }
}
