// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records loss and accuracy to a CSV file while training runs.
//
// Two kinds of rows share the file:
//   - train: minibatch figures every `display_step` steps
//            (dropout disabled when measuring)
//   - valid: held-out figures at the end of every pass over
//            the training set
//
// Output file: checkpoints/metrics.csv
//
// Example CSV output:
//   phase,step,examples,loss,accuracy
//   train,10,1280,2.104533,0.289062
//   train,20,2560,1.873310,0.351562
//   valid,430,55040,0.412207,0.871400

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

const HEADER: &str = "phase,step,examples,loss,accuracy";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Train,
    Valid,
}

impl Phase {
    fn as_str(self) -> &'static str {
        match self {
            Phase::Train => "train",
            Phase::Valid => "valid",
        }
    }
}

/// One row of the metrics CSV
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepMetrics {
    pub phase: Phase,

    /// Optimiser steps taken so far (starts at 1)
    pub step: usize,

    /// Training examples consumed so far (step * batch_size)
    pub examples: usize,

    /// Mean cross-entropy
    pub loss: f64,

    /// Fraction correctly classified, in [0.0, 1.0]
    pub accuracy: f64,
}

impl StepMetrics {
    pub fn new(phase: Phase, step: usize, examples: usize, loss: f64, accuracy: f64) -> Self {
        Self { phase, step, examples, loss, accuracy }
    }

    /// Returns true if this row improved over the previous best loss
    pub fn is_improvement(&self, best_loss: f64) -> bool {
        self.loss < best_loss
    }
}

/// Appends metrics rows to a CSV file.
#[derive(Debug)]
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger in `dir`.
    /// Writes the CSV header if the file doesn't exist yet, so
    /// repeated runs append to the same log.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create metrics directory '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one row.
    pub fn log(&self, m: &StepMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{},{},{:.6},{:.6}",
            m.phase.as_str(),
            m.step,
            m.examples,
            m.loss,
            m.accuracy,
        )?;

        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
