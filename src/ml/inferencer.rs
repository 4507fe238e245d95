// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Rebuilds a trained classifier from its checkpoint directory
// and classifies individual images.
use anyhow::{Context, Result};
use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::MnistBatcher, dataset::MnistSample};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::RnnClassifier;

/// Result of classifying one image
#[derive(Debug, Clone)]
pub struct Prediction {
    pub predicted:     usize,
    pub confidence:    f32,
    /// Softmax output, one entry per digit
    pub probabilities: Vec<f32>,
}

pub struct Inferencer<B: Backend> {
    model:   RnnClassifier<B>,
    batcher: MnistBatcher<B>,
    config:  TrainConfig,
}

impl<B: Backend> Inferencer<B> {
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager, device: B::Device) -> Result<Self> {
        let config = ckpt_manager.load_config()?;
        // Dropout is irrelevant at inference; build without it
        let model_cfg = config.model_config().with_dropout(0.0);
        let model: RnnClassifier<B> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("{} model loaded from '{}'", config.cell, ckpt_manager.dir().display());

        let batcher = MnistBatcher::new(device, config.seq_len, config.input_size);
        Ok(Self { model, batcher, config })
    }

    pub fn model(&self) -> &RnnClassifier<B> {
        &self.model
    }

    pub fn batcher(&self) -> &MnistBatcher<B> {
        &self.batcher
    }

    /// The configuration the checkpoint was trained with
    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn predict(&self, sample: &MnistSample) -> Result<Prediction> {
        let batch = self.batcher.batch(vec![sample.clone()]);
        let probabilities: Vec<f32> = self
            .model
            .probabilities(batch.images)
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("Cannot read probabilities: {e:?}"))?;

        let (predicted, confidence) = probabilities
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .context("Model produced no class scores")?;

        tracing::debug!("Predicted {} with p={:.4}", predicted, confidence);

        Ok(Prediction { predicted, confidence, probabilities })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::CellKind;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_prediction_from_saved_checkpoint() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::create(dir.path()).unwrap();
        let cfg  = TrainConfig { cell: CellKind::Lstm, hidden_size: 8, ..TrainConfig::default() };
        ckpt.save_config(&cfg).unwrap();

        let device = Default::default();
        let model: RnnClassifier<TestBackend> = cfg.model_config().init(&device);
        ckpt.save_model(&model, 1).unwrap();

        let inferencer = Inferencer::<TestBackend>::from_checkpoint(&ckpt, device).unwrap();
        let sample     = MnistSample { pixels: vec![0.5; 784], label: 3 };
        let prediction = inferencer.predict(&sample).unwrap();

        assert_eq!(prediction.probabilities.len(), 10);
        assert!(prediction.predicted < 10);
        assert_eq!(prediction.confidence, prediction.probabilities[prediction.predicted]);
        let total: f32 = prediction.probabilities.iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_missing_checkpoint_fails() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::open(dir.path());
        assert!(Inferencer::<TestBackend>::from_checkpoint(&ckpt, Default::default()).is_err());
    }
}
