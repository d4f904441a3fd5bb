// ============================================================
// Layer 4 — Tabular Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<TabularSample>
// into tensors.
//
// How batching works here:
//   Input:  Vec of N TabularSamples, each with D features
//   Output: TabularBatch with features [N, D] and labels [N, 1]
//
//   All feature rows are flattened into one long Vec, then reshaped:
//   [s1_f1, s1_f2, ..., s1_fD, s2_f1, ..., sN_fD] → [N, D]
//
// Labels stay [N, 1] so they line up with the model's [N, 1]
// probability output for the binary cross-entropy loss.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::TabularSample;

// ─── TabularBatch ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct TabularBatch<B: Backend> {
    /// Shape: [batch_size, input_dim]
    pub features: Tensor<B, 2>,

    /// Shape: [batch_size, 1], values 0 or 1
    pub labels: Tensor<B, 2, Int>,
}

// ─── TabularBatcher ───────────────────────────────────────────────────────────
/// Holds the target device so tensors are created in the right place.
#[derive(Clone, Debug)]
pub struct TabularBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> TabularBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<TabularSample, TabularBatch<B>> for TabularBatcher<B> {
    fn batch(&self, items: Vec<TabularSample>) -> TabularBatch<B> {
        let batch_size = items.len();
        let input_dim  = items.first().map(|s| s.features.len()).unwrap_or(0);

        let features_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();

        let labels: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        let features = Tensor::<B, 1>::from_floats(features_flat.as_slice(), &self.device)
            .reshape([batch_size, input_dim]);

        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device)
            .reshape([batch_size, 1]);

        TabularBatch { features, labels }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes_and_order() {
        let batcher = TabularBatcher::<NdArray>::new(Default::default());
        let batch   = batcher.batch(vec![
            TabularSample::new(vec![1.0, 2.0, 3.0], 0.0),
            TabularSample::new(vec![4.0, 5.0, 6.0], 1.0),
        ]);

        assert_eq!(batch.features.dims(), [2, 3]);
        assert_eq!(batch.labels.dims(), [2, 1]);

        let flat = batch.features.into_data().convert::<f32>().to_vec::<f32>().unwrap();
        assert_eq!(flat, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let labels = batch.labels.float().into_data().convert::<f32>().to_vec::<f32>().unwrap();
        assert_eq!(labels, vec![0.0, 1.0]);
    }
}
