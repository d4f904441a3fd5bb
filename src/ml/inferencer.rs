// ============================================================
// Layer 5 — Inferencer
// ============================================================
use anyhow::{Context, Result};
use burn::prelude::*;

use crate::domain::{error::PipelineError, variant::Variant};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{
    model::{TabularClassifier, TabularClassifierConfig},
    EvalBackend,
};

pub struct Inferencer {
    model:      TabularClassifier<EvalBackend>,
    input_dim:  usize,
    batch_size: usize,
    device:     <EvalBackend as Backend>::Device,
}

impl Inferencer {
    /// Rebuild `variant` from the saved experiment config and schema,
    /// then load its trained parameters.
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager, variant: Variant) -> Result<Self> {
        let device: <EvalBackend as Backend>::Device = Default::default();
        let cfg    = ckpt_manager.load_config()?;
        let schema = ckpt_manager.load_schema()?;

        let input_dim = schema.input_dim();
        let model: TabularClassifier<EvalBackend> =
            TabularClassifierConfig::new(input_dim, cfg.embedding_dim, variant)
                .init(&device)
                .with_context(|| format!("rebuilding {variant} model"))?;
        let model = ckpt_manager.load_model(model, variant, &device)?;

        tracing::info!("Model {} loaded from checkpoint", variant);
        Ok(Self { model, input_dim, batch_size: cfg.batch_size.max(1), device })
    }

    /// Probability of the positive class for every feature row.
    pub fn predict(&self, rows: &[Vec<f32>]) -> Result<Vec<f32>> {
        let mut probabilities = Vec::with_capacity(rows.len());

        for chunk in rows.chunks(self.batch_size) {
            if let Some(bad) = chunk.iter().find(|r| r.len() != self.input_dim) {
                return Err(PipelineError::ShapeMismatch {
                    branch:   "input",
                    actual:   bad.len(),
                    expected: self.input_dim,
                }
                .into());
            }

            let flat: Vec<f32> = chunk.iter().flatten().copied().collect();
            let features = Tensor::<EvalBackend, 1>::from_floats(flat.as_slice(), &self.device)
                .reshape([chunk.len(), self.input_dim]);

            let out = self
                .model
                .forward(features)
                .into_data()
                .convert::<f32>()
                .to_vec::<f32>()
                .map_err(|e| PipelineError::TensorData(format!("{e:?}")))?;
            probabilities.extend(out);
        }

        Ok(probabilities)
    }
}
