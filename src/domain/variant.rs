// ============================================================
// Layer 3 — Architecture Variant
// ============================================================
// The ablation compares three configurations of one classifier:
//
//   Variant        projection   attention gate
//   ───────────    ──────────   ──────────────
//   Full           yes          yes
//   NoEmbedding    no           yes
//   NoAttention    yes          no
//
// Rather than three copy-pasted model types, the ml layer builds a
// single composition and asks the variant which submodules to include.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::domain::error::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// projection → {MLP, gate} → fused → head
    Full,
    /// raw features → {MLP, gate → projection} → fused → head
    NoEmbedding,
    /// projection → MLP → head
    NoAttention,
}

impl Variant {
    /// Fixed training order of a full experiment
    pub const ALL: [Variant; 3] = [Variant::Full, Variant::NoEmbedding, Variant::NoAttention];

    pub fn use_embedding(self) -> bool {
        matches!(self, Variant::Full | Variant::NoAttention)
    }

    pub fn use_attention(self) -> bool {
        matches!(self, Variant::Full | Variant::NoEmbedding)
    }

    /// Name used on the command line and in logs
    pub fn name(self) -> &'static str {
        match self {
            Variant::Full        => "full",
            Variant::NoEmbedding => "no-embedding",
            Variant::NoAttention => "no-attention",
        }
    }

    /// File stem of the persisted parameter record
    pub fn artifact_name(self) -> &'static str {
        match self {
            Variant::Full        => "classification_model",
            Variant::NoEmbedding => "model_without_embedding",
            Variant::NoAttention => "model_without_attention",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Variant {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.name() == s.trim())
            .ok_or_else(|| PipelineError::UnknownVariant(s.to_string()))
    }
}
