// ============================================================
// Layer 5 — Evaluation Harness
// ============================================================
// One pass over the held-out batches, in loader order:
//   - collect every true label
//   - collect every predicted probability
//   - compute ROC AUC over the two flat sequences
//
// Callers pass a model on the inner (non-autodiff) backend, e.g.
// `model.valid()`, so no gradient graph is recorded.
//
// AUC is computed in its rank-sum (Mann–Whitney) form:
//
//   AUC = (Σ rank(positive) − P(P+1)/2) / (P·N)
//
// with tied scores sharing their average rank. This equals the
// fraction of (positive, negative) pairs ranked correctly, ties
// counting 1/2, without visiting all P·N pairs.

use burn::{data::dataloader::DataLoader, prelude::*};

use crate::data::batcher::TabularBatch;
use crate::domain::error::PipelineError;
use crate::ml::model::BinaryClassifier;

/// Score `loader` with `model` and return the ROC AUC.
pub fn evaluate<B, M>(model: &M, loader: &dyn DataLoader<TabularBatch<B>>) -> Result<f64, PipelineError>
where
    B: Backend,
    M: BinaryClassifier<B>,
{
    let mut all_labels      = Vec::new();
    let mut all_predictions = Vec::new();

    for batch in loader.iter() {
        let probabilities = model.forward(batch.features);
        all_predictions.extend(tensor_to_vec(probabilities)?);
        all_labels.extend(tensor_to_vec(batch.labels.float())?);
    }

    tracing::debug!("Evaluated {} samples", all_labels.len());
    roc_auc(&all_labels, &all_predictions)
}

/// Area under the ROC curve for 0/1 `labels` and real-valued `scores`.
pub fn roc_auc(labels: &[f32], scores: &[f32]) -> Result<f64, PipelineError> {
    if labels.len() != scores.len() {
        return Err(PipelineError::LengthMismatch { labels: labels.len(), scores: scores.len() });
    }
    if labels.is_empty() {
        return Err(PipelineError::EmptyDataset("evaluation set"));
    }
    if let Some((index, &value)) = scores.iter().enumerate().find(|(_, s)| !s.is_finite()) {
        return Err(PipelineError::NonFiniteScore { index, value });
    }

    let positives = labels.iter().filter(|&&l| l > 0.5).count();
    let negatives = labels.len() - positives;
    if positives == 0 {
        return Err(PipelineError::DegenerateMetric(0));
    }
    if negatives == 0 {
        return Err(PipelineError::DegenerateMetric(1));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    // Walk runs of equal scores, giving each member the run's mean rank
    let mut positive_rank_sum = 0.0f64;
    let mut start = 0usize;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        // 1-based ranks start+1 ..= end
        let mean_rank = (start + 1 + end) as f64 / 2.0;
        let run_positives = order[start..end].iter().filter(|&&i| labels[i] > 0.5).count();
        positive_rank_sum += mean_rank * run_positives as f64;
        start = end;
    }

    let p = positives as f64;
    let n = negatives as f64;
    Ok((positive_rank_sum - p * (p + 1.0) / 2.0) / (p * n))
}

fn tensor_to_vec<B: Backend>(tensor: Tensor<B, 2>) -> Result<Vec<f32>, PipelineError> {
    tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| PipelineError::TensorData(format!("{e:?}")))
}
