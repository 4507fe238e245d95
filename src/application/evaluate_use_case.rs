// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Scores the latest checkpoint on the MNIST test split:
//
//   1. Rebuild the model from train_config.json + weights
//   2. Load the test split with the same rotation it was trained on
//   3. Report accuracy on the first test_len images and on all
//
// Runs on the plain (non-autodiff) backend.

use anyhow::Result;
use burn::prelude::Backend;

use crate::application::train_use_case::load_samples;
use crate::data::loader::IdxLoader;
use crate::domain::traits::Split;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{
    backend::{ndarray_device, wgpu_device, BackendKind, NdArrayBackend, WgpuBackend},
    evaluator::{test_report, TestReport},
    inferencer::Inferencer,
};

pub struct EvaluateUseCase {
    checkpoint_dir: String,
    /// Overrides the data directory recorded at training time
    data_dir:       Option<String>,
    backend:        BackendKind,
}

impl EvaluateUseCase {
    pub fn new(checkpoint_dir: String, data_dir: Option<String>, backend: BackendKind) -> Self {
        Self { checkpoint_dir, data_dir, backend }
    }

    pub fn execute(&self) -> Result<TestReport> {
        let ckpt = CheckpointManager::open(&self.checkpoint_dir);
        match self.backend {
            BackendKind::Wgpu    => self.evaluate_on::<WgpuBackend>(&ckpt, wgpu_device()),
            BackendKind::Ndarray => self.evaluate_on::<NdArrayBackend>(&ckpt, ndarray_device()),
        }
    }

    fn evaluate_on<B: Backend>(&self, ckpt: &CheckpointManager, device: B::Device) -> Result<TestReport> {
        let inferencer = Inferencer::<B>::from_checkpoint(ckpt, device)?;
        let cfg        = inferencer.config();

        let data_dir = self.data_dir.as_deref().unwrap_or(&cfg.data_dir);
        tracing::info!("Evaluating on test split from '{}'", data_dir);
        let samples = load_samples(&IdxLoader::new(data_dir), Split::Test, cfg.rotate)?;

        Ok(test_report(
            inferencer.model(),
            inferencer.batcher(),
            &samples,
            cfg.test_len,
            cfg.eval_chunk,
        ))
    }
}
