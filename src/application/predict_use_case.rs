// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Classifies a single MNIST image picked by split and index,
// using the latest checkpoint.

use anyhow::{ensure, Result};
use burn::prelude::Backend;

use crate::data::{loader::IdxLoader, transform::ImageTransform};
use crate::domain::traits::{ImageSource, Split};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{
    backend::{ndarray_device, wgpu_device, BackendKind, NdArrayBackend, WgpuBackend},
    inferencer::{Inferencer, Prediction},
};

/// A prediction together with the label the dataset gives it.
#[derive(Debug, Clone)]
pub struct PredictionReport {
    pub split:      Split,
    pub index:      usize,
    pub expected:   usize,
    pub prediction: Prediction,
}

impl PredictionReport {
    pub fn is_correct(&self) -> bool {
        self.prediction.predicted == self.expected
    }
}

pub struct PredictUseCase {
    checkpoint_dir: String,
    data_dir:       Option<String>,
    backend:        BackendKind,
}

impl PredictUseCase {
    pub fn new(checkpoint_dir: String, data_dir: Option<String>, backend: BackendKind) -> Self {
        Self { checkpoint_dir, data_dir, backend }
    }

    pub fn execute(&self, split: Split, index: usize) -> Result<PredictionReport> {
        let ckpt = CheckpointManager::open(&self.checkpoint_dir);
        match self.backend {
            BackendKind::Wgpu    => self.predict_on::<WgpuBackend>(&ckpt, wgpu_device(), split, index),
            BackendKind::Ndarray => self.predict_on::<NdArrayBackend>(&ckpt, ndarray_device(), split, index),
        }
    }

    fn predict_on<B: Backend>(
        &self,
        ckpt:   &CheckpointManager,
        device: B::Device,
        split:  Split,
        index:  usize,
    ) -> Result<PredictionReport> {
        let inferencer = Inferencer::<B>::from_checkpoint(ckpt, device)?;
        let data_dir   = self.data_dir.as_deref().unwrap_or(&inferencer.config().data_dir);
        predict_from(&inferencer, &IdxLoader::new(data_dir), split, index)
    }
}

fn predict_from<B: Backend>(
    inferencer: &Inferencer<B>,
    source:     &impl ImageSource,
    split:      Split,
    index:      usize,
) -> Result<PredictionReport> {
    let images = source.load_split(split)?;
    ensure!(
        index < images.len(),
        "Index {} is out of range: the {:?} split has {} images",
        index,
        split,
        images.len()
    );

    // Only the requested image is rotated and scaled
    let sample     = ImageTransform::new(inferencer.config().rotate).apply(&images[index])?;
    let prediction = inferencer.predict(&sample)?;
    tracing::info!(
        "{:?}[{}]: predicted {} (expected {})",
        split, index, prediction.predicted, sample.label
    );

    Ok(PredictionReport { split, index, expected: sample.label, prediction })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;
    use crate::data::loader::fixtures::write_dataset;
    use crate::domain::{cell::CellKind, image::DigitImage};
    use crate::ml::model::RnnClassifier;

    fn saved_checkpoint(dir: &std::path::Path, data_dir: &std::path::Path) {
        let ckpt = CheckpointManager::create(dir).unwrap();
        let cfg  = TrainConfig {
            data_dir:    data_dir.display().to_string(),
            cell:        CellKind::Gru,
            hidden_size: 6,
            ..TrainConfig::default()
        };
        ckpt.save_config(&cfg).unwrap();
        let model: RnnClassifier<NdArrayBackend> = cfg.model_config().init(&Default::default());
        ckpt.save_model(&model, 3).unwrap();
    }

    #[test]
    fn test_predicts_indexed_image() {
        let data = tempfile::tempdir().unwrap();
        let ckpt = tempfile::tempdir().unwrap();
        write_dataset(data.path(), 12, 6, false);
        saved_checkpoint(ckpt.path(), data.path());

        let use_case = PredictUseCase::new(ckpt.path().display().to_string(), None, BackendKind::Ndarray);
        let report   = use_case.execute(Split::Train, 7).unwrap();

        assert_eq!(report.index, 7);
        assert_eq!(report.split, Split::Train);
        // Synthetic labels cycle 0..10
        assert_eq!(report.expected, 7);
        assert_eq!(report.prediction.probabilities.len(), 10);
        assert_eq!(report.is_correct(), report.prediction.predicted == 7);
    }

    #[test]
    fn test_index_out_of_range_is_an_error() {
        let data = tempfile::tempdir().unwrap();
        let ckpt = tempfile::tempdir().unwrap();
        write_dataset(data.path(), 12, 6, false);
        saved_checkpoint(ckpt.path(), data.path());

        let use_case = PredictUseCase::new(ckpt.path().display().to_string(), None, BackendKind::Ndarray);
        let err = use_case.execute(Split::Test, 6).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    /// Yields one malformed image followed by one valid image.
    struct MixedSource;

    impl ImageSource for MixedSource {
        fn load_split(&self, _split: Split) -> Result<Vec<DigitImage>> {
            Ok(vec![
                DigitImage { pixels: vec![0u8; 10], label: 0 },
                DigitImage::new(vec![128u8; 784], 5),
            ])
        }
    }

    #[test]
    fn test_only_the_requested_image_is_transformed() {
        let data = tempfile::tempdir().unwrap();
        let ckpt = tempfile::tempdir().unwrap();
        saved_checkpoint(ckpt.path(), data.path());

        let inferencer = Inferencer::<NdArrayBackend>::from_checkpoint(
            &CheckpointManager::open(ckpt.path()),
            Default::default(),
        )
        .unwrap();

        // The malformed neighbour at index 0 is never touched
        let report = predict_from(&inferencer, &MixedSource, Split::Test, 1).unwrap();
        assert_eq!(report.expected, 5);
        assert_eq!(report.prediction.probabilities.len(), 10);

        assert!(predict_from(&inferencer, &MixedSource, Split::Test, 0).is_err());
        assert!(predict_from(&inferencer, &MixedSource, Split::Test, 2).is_err());
    }
}
