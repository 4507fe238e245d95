// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// What gets saved:
//   1. Model weights (.mpk.gz file) — all learned parameters
//   2. latest_step.json             — which step was last saved
//   3. train_config.json            — cell type and topology
//
// The config is stored separately because the weights alone do
// not say whether they belong to a GRU or an LSTM, or how many
// units it has; evaluate/predict rebuild the model from it first.
//
// File naming convention:
//   checkpoints/
//     model_step_390.mpk.gz   ← weights after step 390
//     model_step_781.mpk.gz   ← weights after step 781
//     latest_step.json        ← "781"
//     train_config.json       ← TrainConfig as JSON
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::RnnClassifier;

const LATEST_FILE: &str = "latest_step.json";
const CONFIG_FILE: &str = "train_config.json";

/// Manages saving and loading of model checkpoints.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Point at a checkpoint directory without touching the filesystem.
    /// Used when only reading.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the directory (like `mkdir -p`) and return a manager for it.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Save model weights for a given step and mark them as latest.
    pub fn save_model<B: Backend>(&self, model: &RnnClassifier<B>, step: usize) -> Result<()> {
        // Recorder adds the .mpk.gz extension itself
        let path = self.dir.join(format!("model_step_{step}"));

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        let latest_path = self.dir.join(LATEST_FILE);
        fs::write(&latest_path, serde_json::to_string(&step)?)
            .with_context(|| format!("Failed to write '{}'", latest_path.display()))?;

        tracing::debug!("Saved checkpoint: step {}", step);
        Ok(())
    }

    /// Load the latest saved weights into `model`.
    ///
    /// The model must have been built from the same config as the
    /// checkpoint or loading will fail.
    pub fn load_model<B: Backend>(
        &self,
        model:  RnnClassifier<B>,
        device: &B::Device,
    ) -> Result<RnnClassifier<B>> {
        let step = self.latest_step()?;
        let path = self.dir.join(format!("model_step_{step}"));

        tracing::info!("Loading checkpoint from step {}", step);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display())
            })?;

        Ok(model.load_record(record))
    }

    /// Save the training configuration to JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the training configuration from JSON.
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(CONFIG_FILE);

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. \
                     Make sure you have run 'train' first.",
                    path.display()
                )
            })?;

        serde_json::from_str(&json)
            .with_context(|| format!("Malformed config in '{}'", path.display()))
    }

    /// Step number of the most recent checkpoint.
    pub fn latest_step(&self) -> Result<usize> {
        let path = self.dir.join(LATEST_FILE);

        let s = fs::read_to_string(&path)
            .with_context(|| {
                format!("Cannot find '{}'. Have you run 'train' first?", path.display())
            })?;

        Ok(serde_json::from_str::<usize>(&s)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::CellKind;
    use crate::ml::model::RnnClassifierConfig;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_config_round_trip() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::create(dir.path()).unwrap();
        let cfg  = TrainConfig { cell: CellKind::Lstm, hidden_size: 32, ..TrainConfig::default() };

        ckpt.save_config(&cfg).unwrap();
        let loaded = ckpt.load_config().unwrap();
        assert_eq!(loaded.cell, CellKind::Lstm);
        assert_eq!(loaded.hidden_size, 32);
    }

    #[test]
    fn test_saved_weights_reproduce_predictions() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::create(dir.path()).unwrap();
        let device = Default::default();
        let config = RnnClassifierConfig::new(CellKind::Gru, 28, 8);

        let trained: RnnClassifier<TestBackend> = config.init(&device);
        ckpt.save_model(&trained, 5).unwrap();
        assert_eq!(ckpt.latest_step().unwrap(), 5);

        let fresh: RnnClassifier<TestBackend> = config.init(&device);
        let restored = ckpt.load_model(fresh, &device).unwrap();

        let x = Tensor::<TestBackend, 3>::ones([2, 28, 28], &device);
        trained
            .forward(x.clone())
            .into_data()
            .assert_approx_eq(&restored.forward(x).into_data(), 5);
    }

    #[test]
    fn test_missing_checkpoint_is_an_error() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::open(dir.path());
        assert!(ckpt.latest_step().is_err());
        assert!(ckpt.load_config().is_err());
    }
}
