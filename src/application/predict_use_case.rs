// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// Scores a new table with one saved variant:
//   1. Load the table with the same TSV loader
//   2. Encode features with the saved schema (label column optional)
//   3. Rebuild the variant and load its parameters
//   4. Write one probability per row

use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use crate::data::loader::TsvLoader;
use crate::domain::{traits::TableSource, variant::Variant};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::inferencer::Inferencer;

pub struct PredictUseCase {
    artifact_dir: String,
    variant:      Variant,
    data_path:    String,
    output:       Option<PathBuf>,
}

impl PredictUseCase {
    pub fn new(artifact_dir: String, variant: Variant, data_path: String, output: Option<PathBuf>) -> Self {
        Self { artifact_dir, variant, data_path, output }
    }

    /// Returns the number of rows scored.
    pub fn execute(&self) -> Result<usize> {
        let ckpt   = CheckpointManager::open(&self.artifact_dir);
        let schema = ckpt.load_schema()?;

        let table = TsvLoader::new(&self.data_path)
            .load()
            .context("loading table to score")?;
        let rows = schema
            .encode_features(&table)
            .context("encoding with the saved feature schema")?;

        let inferencer    = Inferencer::from_checkpoint(&ckpt, self.variant)?;
        let probabilities = inferencer.predict(&rows)?;

        match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Cannot create '{}'", path.display()))?;
                write_predictions(BufWriter::new(file), &probabilities)?;
                tracing::info!("Wrote {} predictions to '{}'", probabilities.len(), path.display());
            }
            None => write_predictions(io::stdout().lock(), &probabilities)?,
        }
        Ok(probabilities.len())
    }
}

fn write_predictions(mut out: impl Write, probabilities: &[f32]) -> Result<()> {
    writeln!(out, "row\tprobability")?;
    for (row, p) in probabilities.iter().enumerate() {
        writeln!(out, "{row}\t{p:.6}")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::experiment_use_case::{ExperimentConfig, ExperimentUseCase};
    use crate::data::splitter::split_train_test;
    use std::path::Path;

    fn write_training_table(path: &Path) {
        let mut text = String::from("x\tcolour\tis_tree\n");
        for i in 0..20 {
            let colour = if i % 3 == 0 { "green" } else { "brown" };
            text.push_str(&format!("{}\t{}\t{}\n", i, colour, i % 2));
        }
        std::fs::write(path, text).unwrap();
    }

    /// Train NoAttention for one epoch and return the artifact directory
    fn train_artifacts(dir: &Path) -> String {
        let data = dir.join("train.tsv");
        write_training_table(&data);

        let labels: Vec<u8> = (0..20).map(|i| i % 2).collect();
        let seed = (0u64..)
            .find(|&s| {
                let (_, test) = split_train_test(labels.clone(), 0.2, s);
                test.contains(&0) && test.contains(&1)
            })
            .unwrap();

        let artifact_dir = dir.join("artifacts").display().to_string();
        let cfg = ExperimentConfig {
            data_path: data.display().to_string(),
            artifact_dir: artifact_dir.clone(),
            epochs: 1,
            random_state: seed,
            variants: vec![Variant::NoAttention],
            ..ExperimentConfig::default()
        };
        let results = ExperimentUseCase::new(cfg).execute().unwrap();
        assert_eq!(results.success_count(), 1);
        artifact_dir
    }

    #[test]
    fn test_predicts_one_probability_per_row() {
        let dir          = tempfile::tempdir().unwrap();
        let artifact_dir = train_artifacts(dir.path());

        // No label column in the scoring table, columns reordered
        let score = dir.path().join("score.tsv");
        std::fs::write(&score, "colour\tx\ngreen\t1.5\nbrown\t7\nbrown\t0\n").unwrap();
        let out = dir.path().join("predictions.tsv");

        let n = PredictUseCase::new(
            artifact_dir,
            Variant::NoAttention,
            score.display().to_string(),
            Some(out.clone()),
        )
        .execute()
        .unwrap();
        assert_eq!(n, 3);

        let text  = std::fs::read_to_string(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "row\tprobability");
        for line in &lines[1..] {
            let p: f32 = line.split('\t').nth(1).unwrap().parse().unwrap();
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_unseen_category_is_rejected() {
        let dir          = tempfile::tempdir().unwrap();
        let artifact_dir = train_artifacts(dir.path());

        let score = dir.path().join("score.tsv");
        std::fs::write(&score, "x\tcolour\n1\tpurple\n").unwrap();
        let err = PredictUseCase::new(artifact_dir, Variant::NoAttention, score.display().to_string(), None)
            .execute()
            .unwrap_err();
        assert!(format!("{err:#}").contains("purple"));
    }

    #[test]
    fn test_missing_artifacts_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = PredictUseCase::new(
            dir.path().display().to_string(),
            Variant::Full,
            dir.path().join("score.tsv").display().to_string(),
            None,
        )
        .execute();
        assert!(result.is_err());
    }
}
