use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One encoded row: a fixed-length feature vector and its 0/1 label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularSample {
    pub features: Vec<f32>,
    pub label:    f32,
}

impl TabularSample {
    pub fn new(features: Vec<f32>, label: f32) -> Self {
        Self { features, label }
    }
}

/// Index-addressable feature/label pairs. Every sample has the
/// same feature width; `from_columns` enforces that.
#[derive(Debug, Clone)]
pub struct TabularDataset {
    samples: Vec<TabularSample>,
}

impl TabularDataset {
    pub fn new(samples: Vec<TabularSample>) -> Self {
        debug_assert!(
            samples.windows(2).all(|w| w[0].features.len() == w[1].features.len()),
            "samples must share one feature width"
        );
        Self { samples }
    }

    /// Zip feature rows with labels. The counts must match.
    pub fn from_columns(features: Vec<Vec<f32>>, labels: Vec<f32>) -> Self {
        debug_assert_eq!(features.len(), labels.len(), "feature/label count mismatch");
        Self::new(
            features
                .into_iter()
                .zip(labels)
                .map(|(f, l)| TabularSample::new(f, l))
                .collect(),
        )
    }

    pub fn input_dim(&self) -> Option<usize> {
        self.samples.first().map(|s| s.features.len())
    }

    pub fn labels(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().map(|s| s.label)
    }
}

impl Dataset<TabularSample> for TabularDataset {
    fn get(&self, index: usize) -> Option<TabularSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
