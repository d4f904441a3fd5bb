// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from a tab-separated file on disk to tensor batches.
//
//   .tsv file
//       │
//       ▼
//   TsvLoader         → decodes bytes, parses rows, trims headers
//       │
//       ▼
//   Preprocessor      → separates the label, encodes categoricals
//       │
//       ▼
//   split_train_test  → seeded 80/20 partition
//       │
//       ▼
//   TabularDataset    → implements Burn's Dataset trait
//       │
//       ▼
//   TabularBatcher    → stacks samples into [N, D] / [N, 1] tensors
//       │
//       ▼
//   DataLoader        → feeds batches to the harness
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads delimited text files with an encoding fallback
pub mod loader;

/// Label separation and categorical encoding
pub mod preprocessor;

/// Implements Burn's Dataset trait for tabular samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Seeded shuffle and train/test partition
pub mod splitter;
