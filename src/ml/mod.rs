// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains the Burn model, optimiser and loss code.
// The domain layer never imports burn; data and infra only touch
// the Dataset/Batcher and Recorder seams.
//
//   attention.rs  — SelfAttentionGate: linear scores → softmax →
//                   elementwise reweighting of the input
//
//   model.rs      — TabularClassifier: projection, MLP block, gate
//                   and output head composed per Variant, plus the
//                   BinaryClassifier trait the harness is written to
//
//   trainer.rs    — Architecture-agnostic training loop and the
//                   per-variant build/train/evaluate/save sequence
//
//   evaluator.rs  — Evaluation pass and ROC AUC
//
//   inferencer.rs — Reloads a saved variant and scores new rows
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

/// Self-attention gate (learned soft feature mask)
pub mod attention;

/// Classifier family and the harness seam trait
pub mod model;

/// Training loop and per-variant run
pub mod trainer;

/// Evaluation loop and AUC
pub mod evaluator;

/// Inference engine: loads a checkpoint and predicts probabilities
pub mod inferencer;

/// Backend used while training (gradients tracked)
pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;

/// Backend used for evaluation and inference (`model.valid()` target)
pub type EvalBackend = burn::backend::NdArray;
