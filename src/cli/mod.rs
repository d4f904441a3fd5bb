// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and delegates everything else to Layer 2 (application).
//
// Two commands are supported:
//   1. `run`     — trains, evaluates and saves each variant
//   2. `predict` — loads one saved variant and scores a table
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::{bail, Result};
use clap::Parser;
use commands::{Commands, PredictArgs, RunArgs};

use crate::domain::report::ResultsTable;

#[derive(Parser, Debug)]
#[command(
    name = "tabular-ablation",
    version = "0.1.0",
    about = "Compare embedding and attention ablations of a tabular binary classifier."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Run(args)     => run_experiment(args),
            Commands::Predict(args) => run_predict(args),
        }
    }
}

fn run_experiment(args: RunArgs) -> Result<()> {
    use crate::application::experiment_use_case::ExperimentUseCase;

    tracing::info!("Starting experiment on: {}", args.data);
    let results = ExperimentUseCase::new(args.into()).execute()?;

    print_summary(&results);
    if results.success_count() == 0 {
        bail!("every variant failed");
    }
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let n = PredictUseCase::new(args.artifact_dir, args.variant, args.data, args.output).execute()?;
    tracing::info!("Scored {} rows", n);
    Ok(())
}

fn print_summary(results: &ResultsTable) {
    println!("\n{:<14} {:>10}", "variant", "auc");
    for report in &results.reports {
        match (report.auc, &report.error) {
            (Some(auc), _)    => println!("{:<14} {:>10.6}", report.variant, auc),
            (None, Some(err)) => println!("{:<14} {:>10}  {}", report.variant, "failed", err),
            (None, None)      => println!("{:<14} {:>10}", report.variant, "-"),
        }
    }
}
