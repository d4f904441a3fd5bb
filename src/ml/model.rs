// ============================================================
// Layer 5 — Tabular Classifier Family
// ============================================================
// One composition, three ablation variants:
//
//   Full         x → proj → e ─┬─ MLP(e→64→32) ───────────────┐
//                              └─ gate(e) → first 32 coords ──┴─ + → head → σ
//
//   NoEmbedding  x ────────────┬─ MLP(x→32→32) ───────────────┐
//                              └─ gate(x) → Linear(x,32) ─────┴─ + → head → σ
//
//   NoAttention  x → proj → e ─── MLP(e→64→32) ─────────────────── head → σ
//
// The head emits logits. Training feeds them to a logits-mode BCE so
// saturated scores keep a finite loss; `forward` applies σ for
// evaluation and inference.
//
// Both fusion inputs must be exactly FUSION_WIDTH wide. The width
// contract is checked when the model is built, so an impossible
// configuration fails before any data is touched.

use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::activation::{relu, sigmoid},
};

use crate::domain::{error::PipelineError, variant::Variant};
use crate::ml::attention::{SelfAttentionGate, SelfAttentionGateConfig};

/// Width of both branches at the fusion point and of the head input
pub const FUSION_WIDTH: usize = 32;

const MLP_HIDDEN_EMBEDDED: usize = 64;
const MLP_HIDDEN_RAW: usize = 32;

/// Anything that maps a feature batch [N, D] to a score per row [N, 1].
/// The harness is written against this trait only.
pub trait BinaryClassifier<B: Backend> {
    /// Pre-sigmoid scores
    fn forward_logits(&self, features: Tensor<B, 2>) -> Tensor<B, 2>;

    /// Probabilities in [0, 1]
    fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        sigmoid(self.forward_logits(features))
    }
}

// ─── MLP block ────────────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct MlpBlock<B: Backend> {
    fc1: Linear<B>,
    fc2: Linear<B>,
}

impl<B: Backend> MlpBlock<B> {
    pub fn new(input: usize, hidden: usize, output: usize, device: &B::Device) -> Self {
        Self {
            fc1: LinearConfig::new(input, hidden).init(device),
            fc2: LinearConfig::new(hidden, output).init(device),
        }
    }

    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        relu(self.fc2.forward(relu(self.fc1.forward(x))))
    }
}

// ─── Config ───────────────────────────────────────────────────────────────────
#[derive(Config, Debug)]
pub struct TabularClassifierConfig {
    pub input_dim:     usize,
    pub embedding_dim: usize,
    pub variant:       Variant,
}

impl TabularClassifierConfig {
    /// Width of the representation both branches consume
    fn representation_dim(&self) -> usize {
        if self.variant.use_embedding() { self.embedding_dim } else { self.input_dim }
    }

    /// Check every width the forward pass relies on.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.input_dim == 0 {
            return Err(PipelineError::ShapeMismatch { branch: "input", actual: 0, expected: 1 });
        }
        if self.variant.use_embedding() && self.embedding_dim == 0 {
            return Err(PipelineError::ShapeMismatch { branch: "embedding", actual: 0, expected: 1 });
        }
        // Truncation can only take FUSION_WIDTH coordinates if they exist
        if self.variant.use_attention() && self.variant.use_embedding()
            && self.embedding_dim < FUSION_WIDTH
        {
            return Err(PipelineError::ShapeMismatch {
                branch:   "attention",
                actual:   self.embedding_dim,
                expected: FUSION_WIDTH,
            });
        }
        Ok(())
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<TabularClassifier<B>, PipelineError> {
        self.validate()?;

        let repr_dim = self.representation_dim();
        let embedding = self
            .variant
            .use_embedding()
            .then(|| LinearConfig::new(self.input_dim, self.embedding_dim).init(device));

        let hidden = if self.variant.use_embedding() { MLP_HIDDEN_EMBEDDED } else { MLP_HIDDEN_RAW };
        let mlp    = MlpBlock::new(repr_dim, hidden, FUSION_WIDTH, device);

        let attention = self
            .variant
            .use_attention()
            .then(|| SelfAttentionGateConfig::new(repr_dim).init(device));

        // Raw features have arbitrary width: project instead of truncating.
        // Built once here so the same parameters serve every forward pass.
        let attention_proj = (self.variant.use_attention() && !self.variant.use_embedding())
            .then(|| LinearConfig::new(repr_dim, FUSION_WIDTH).init(device));

        let head = LinearConfig::new(FUSION_WIDTH, 1).init(device);

        Ok(TabularClassifier { embedding, mlp, attention, attention_proj, head })
    }
}

// ─── Model ────────────────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct TabularClassifier<B: Backend> {
    embedding:      Option<Linear<B>>,
    mlp:            MlpBlock<B>,
    attention:      Option<SelfAttentionGate<B>>,
    attention_proj: Option<Linear<B>>,
    head:           Linear<B>,
}

impl<B: Backend> TabularClassifier<B> {
    /// x: [batch, input_dim] → probabilities [batch, 1]
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        sigmoid(self.forward_logits(x))
    }

    /// x: [batch, input_dim] → logits [batch, 1]
    pub fn forward_logits(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let repr = match &self.embedding {
            Some(projection) => projection.forward(x),
            None => x,
        };

        let mlp_out = self.mlp.forward(repr.clone());
        let fused = match &self.attention {
            Some(gate) => mlp_out + self.reduce_attention(gate.forward(repr)),
            None => mlp_out,
        };

        self.head.forward(fused)
    }

    /// Bring the gate output down to FUSION_WIDTH: a learned projection
    /// when one was built, otherwise the first FUSION_WIDTH coordinates.
    pub fn reduce_attention(&self, attended: Tensor<B, 2>) -> Tensor<B, 2> {
        match &self.attention_proj {
            Some(projection) => projection.forward(attended),
            None => {
                let [batch, _] = attended.dims();
                attended.slice([0..batch, 0..FUSION_WIDTH])
            }
        }
    }

    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }

    pub fn has_attention(&self) -> bool {
        self.attention.is_some()
    }

    /// Width the attention gate operates on, if there is one
    pub fn gate_dim(&self) -> Option<usize> {
        self.attention.as_ref().map(SelfAttentionGate::dim)
    }
}

impl<B: Backend> BinaryClassifier<B> for TabularClassifier<B> {
    fn forward_logits(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        TabularClassifier::forward_logits(self, features)
    }
}
