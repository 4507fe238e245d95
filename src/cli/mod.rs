// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All work is delegated to Layer 2 (application); this layer
// only routes and prints.
//
// Three commands are supported:
//   1. `train`    — trains a GRU/LSTM classifier on MNIST
//   2. `evaluate` — scores the latest checkpoint on the test set
//   3. `predict`  — classifies one image with the latest checkpoint
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvaluateArgs, PredictArgs, TrainArgs};

use crate::ml::evaluator::TestReport;

#[derive(Parser, Debug)]
#[command(
    name = "mnist-rnn",
    version,
    about = "Train GRU / LSTM classifiers on MNIST, one pixel row per time step."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Evaluate(args) => run_evaluate(args),
            Commands::Predict(args)  => run_predict(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::{TrainConfig, TrainUseCase};

    let config: TrainConfig = args.into();
    tracing::info!("Training {} classifier on '{}'", config.cell, config.data_dir);

    let summary = TrainUseCase::new(config).execute()?;
    print_test_report(&summary.test);
    tracing::info!("{} steps, {} examples", summary.steps, summary.examples);
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    let report = EvaluateUseCase::new(args.checkpoint_dir, args.data_dir, args.backend).execute()?;
    print_test_report(&report);
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let use_case = PredictUseCase::new(args.checkpoint_dir, args.data_dir, args.backend);
    let report   = use_case.execute(args.split.into(), args.index)?;

    println!(
        "Image {:?}[{}]: predicted {} (p={:.4}), expected {}{}",
        report.split,
        report.index,
        report.prediction.predicted,
        report.prediction.confidence,
        report.expected,
        if report.is_correct() { "" } else { "  ✗" },
    );
    for (digit, p) in report.prediction.probabilities.iter().enumerate() {
        println!("  {digit}: {p:.4}");
    }
    Ok(())
}

fn print_test_report(report: &TestReport) {
    println!("Testing Accuracy ({}): {}", report.subset_len, report.subset.accuracy());
    println!("Test accuracy : {}", report.full.accuracy());
}
