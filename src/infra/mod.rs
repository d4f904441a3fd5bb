// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence that doesn't belong to any one
// business layer:
//
//   checkpoint.rs — One parameter record per variant, plus the
//                   experiment config and feature schema as JSON
//                   so `predict` can rebuild and re-encode.
//
//   metrics.rs    — Per-epoch loss CSV and the final results table.
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Variant artifact saving and loading
pub mod checkpoint;

/// Epoch loss CSV and results table writer
pub mod metrics;
