// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `run` and `predict`
// and all their configurable flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::experiment_use_case::ExperimentConfig;
use crate::domain::variant::Variant;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train, evaluate and save each model variant, then compare AUCs
    Run(RunArgs),

    /// Score a table with a previously trained variant
    Predict(PredictArgs),
}

/// All arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Tab-separated input table with a header row
    #[arg(long, default_value = "./merged_label")]
    pub data: String,

    /// Name of the binary label column
    #[arg(long, default_value = "is_tree")]
    pub label_column: String,

    /// Where model records, metrics and the results table are written
    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: String,

    /// Width of the input projection. The full variant needs at least 32
    #[arg(long, default_value_t = 128)]
    pub embedding_dim: usize,

    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// Adam learning rate, fixed for the whole run
    #[arg(long, default_value_t = 1e-4)]
    pub lr: f64,

    #[arg(long, default_value_t = 2000)]
    pub batch_size: usize,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    pub test_size: f64,

    /// Seed for the split, shuffling and parameter initialisation
    #[arg(long, default_value_t = 42)]
    pub random_state: u64,

    /// Comma-separated variants to run, in order
    #[arg(long, value_delimiter = ',', default_values_t = Variant::ALL.to_vec())]
    pub variants: Vec<Variant>,
}

/// Boundary between Layer 1 and Layer 2:
/// the application layer never sees clap types.
impl From<RunArgs> for ExperimentConfig {
    fn from(a: RunArgs) -> Self {
        ExperimentConfig {
            data_path:     a.data,
            label_column:  a.label_column,
            artifact_dir:  a.artifact_dir,
            embedding_dim: a.embedding_dim,
            epochs:        a.epochs,
            lr:            a.lr,
            batch_size:    a.batch_size,
            test_size:     a.test_size,
            random_state:  a.random_state,
            variants:      a.variants,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Tab-separated table to score; the label column may be absent
    #[arg(long)]
    pub data: String,

    /// Which trained variant to load
    #[arg(long, default_value_t = Variant::Full)]
    pub variant: Variant,

    /// Directory written by a previous `run`
    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: String,

    /// Write predictions here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}
