// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Validate the configuration
//   Step 2: Load train + test splits     (Layer 4 - data)
//   Step 3: Rotate (optional) + scale    (Layer 4 - data)
//   Step 4: Hold out a validation set    (Layer 4 - data)
//   Step 5: Save config, open metrics    (Layer 6 - infra)
//   Step 6: Run training loop            (Layer 5 - ml)
//   Step 7: Score the test set           (Layer 5 - ml)
//
// Step 6 and 7 run on whichever backend the config names; the
// match in execute() is the only place that decision is made.
//
// Reference: Burn Book §5 (Training)

use anyhow::{ensure, Result};
use burn::{module::AutodiffModule, tensor::backend::AutodiffBackend};
use serde::{Deserialize, Serialize};

use crate::data::{
    batcher::MnistBatcher,
    dataset::{MnistDataset, MnistSample},
    loader::IdxLoader,
    splitter::split_validation,
    transform::ImageTransform,
};
use crate::domain::{
    cell::CellKind,
    image::{IMAGE_PIXELS, NUM_CLASSES},
    traits::{ImageSource, Split},
};
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::{
    backend::{ndarray_device, wgpu_device, BackendKind, NdArrayAutodiff, WgpuAutodiff},
    evaluator::{test_report, TestReport},
    model::RnnClassifierConfig,
    trainer::run_training,
};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Saved next to the weights as train_config.json so evaluate and
// predict can rebuild exactly the same model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dir:        String,
    pub checkpoint_dir:  String,
    pub cell:            CellKind,
    pub backend:         BackendKind,
    pub hidden_size:     usize,
    /// Time steps per image (rows)
    pub seq_len:         usize,
    /// Features per time step (columns)
    pub input_size:      usize,
    /// Probability of zeroing a unit of the last recurrent output
    pub dropout:         f64,
    pub batch_size:      usize,
    pub lr:              f64,
    /// Budget in training examples, not steps
    pub training_iters:  usize,
    pub display_step:    usize,
    pub validation_size: usize,
    pub rotate:          bool,
    pub seed:            u64,
    pub num_workers:     usize,
    /// Size of the test prefix reported as "Testing Accuracy"
    pub test_len:        usize,
    pub eval_chunk:      usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:        "MNIST_data".to_string(),
            checkpoint_dir:  "checkpoints".to_string(),
            cell:            CellKind::Lstm,
            backend:         BackendKind::Wgpu,
            hidden_size:     128,
            seq_len:         28,
            input_size:      28,
            dropout:         0.5,
            batch_size:      128,
            lr:              0.001,
            training_iters:  100_000,
            display_step:    10,
            validation_size: 5_000,
            rotate:          false,
            seed:            42,
            num_workers:     1,
            test_len:        1_024,
            eval_chunk:      500,
        }
    }
}

impl TrainConfig {
    /// Reject settings the model or the loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.seq_len * self.input_size == IMAGE_PIXELS,
            "seq_len ({}) x input_size ({}) must equal {} pixels",
            self.seq_len,
            self.input_size,
            IMAGE_PIXELS
        );
        ensure!(self.hidden_size > 0, "hidden_size must be positive");
        ensure!(self.batch_size > 0, "batch_size must be positive");
        ensure!(
            (0.0..1.0).contains(&self.dropout),
            "dropout must be in [0, 1), got {}",
            self.dropout
        );
        ensure!(self.display_step > 0, "display_step must be positive");
        ensure!(self.eval_chunk > 0, "eval_chunk must be positive");
        Ok(())
    }

    pub fn model_config(&self) -> RnnClassifierConfig {
        RnnClassifierConfig::new(self.cell, self.input_size, self.hidden_size)
            .with_num_classes(NUM_CLASSES)
            .with_dropout(self.dropout)
    }
}

/// What `train` reports once the run is over.
#[derive(Debug, Clone, Copy)]
pub struct TrainSummary {
    pub steps:    usize,
    pub examples: usize,
    pub test:     TestReport,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainSummary> {
        let cfg = &self.config;

        // ── Step 1: Validate ──────────────────────────────────────────────────
        cfg.validate()?;

        // ── Step 2 + 3: Load and transform both splits ────────────────────────
        tracing::info!("Loading MNIST from '{}'", cfg.data_dir);
        let loader = IdxLoader::new(&cfg.data_dir);
        let train_samples = load_samples(&loader, Split::Train, cfg.rotate)?;
        let test_samples  = load_samples(&loader, Split::Test, cfg.rotate)?;

        // ── Step 4: Hold out a validation set ─────────────────────────────────
        let (train_samples, valid_samples) =
            split_validation(train_samples, cfg.validation_size, cfg.seed);
        tracing::info!(
            "Split: {} train, {} validation, {} test",
            train_samples.len(),
            valid_samples.len(),
            test_samples.len()
        );

        // ── Step 5: Persist config, open metrics ──────────────────────────────
        let ckpt_manager = CheckpointManager::create(&cfg.checkpoint_dir)?;
        ckpt_manager.save_config(cfg)?;
        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;

        // ── Step 6 + 7: Train and score on the chosen backend ─────────────────
        let run = TrainRun {
            train:   MnistDataset::new(train_samples),
            valid:   MnistDataset::new(valid_samples),
            test:    test_samples,
            ckpt:    &ckpt_manager,
            metrics: &metrics,
        };
        match cfg.backend {
            BackendKind::Wgpu    => run.execute::<WgpuAutodiff>(cfg, wgpu_device()),
            BackendKind::Ndarray => run.execute::<NdArrayAutodiff>(cfg, ndarray_device()),
        }
    }
}

/// Everything a training run needs besides the backend.
struct TrainRun<'a> {
    train:   MnistDataset,
    valid:   MnistDataset,
    test:    Vec<MnistSample>,
    ckpt:    &'a CheckpointManager,
    metrics: &'a MetricsLogger,
}

impl TrainRun<'_> {
    fn execute<B: AutodiffBackend>(self, cfg: &TrainConfig, device: B::Device) -> Result<TrainSummary> {
        let outcome = run_training::<B>(
            cfg,
            self.train,
            self.valid,
            self.ckpt,
            self.metrics,
            device.clone(),
        )?;

        // Test scoring never needs gradients
        let model   = outcome.model.valid();
        let batcher = MnistBatcher::<B::InnerBackend>::new(device, cfg.seq_len, cfg.input_size);
        let test    = test_report(&model, &batcher, &self.test, cfg.test_len, cfg.eval_chunk);

        Ok(TrainSummary { steps: outcome.steps, examples: outcome.examples, test })
    }
}

/// Load one split and turn it into model-ready samples.
pub(crate) fn load_samples(
    source: &impl ImageSource,
    split:  Split,
    rotate: bool,
) -> Result<Vec<MnistSample>> {
    let images = source.load_split(split)?;
    if rotate {
        tracing::info!("Rotating {} {:?} images 90° counter-clockwise", images.len(), split);
    }
    ImageTransform::new(rotate).apply_all(&images)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::fixtures::write_dataset;
    use crate::domain::image::DigitImage;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = TrainConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.seq_len * cfg.input_size, 784);
        assert_eq!(cfg.batch_size, 128);
        assert_eq!(cfg.training_iters, 100_000);
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let bad = [
            TrainConfig { seq_len: 14, ..TrainConfig::default() },
            TrainConfig { hidden_size: 0, ..TrainConfig::default() },
            TrainConfig { batch_size: 0, ..TrainConfig::default() },
            TrainConfig { dropout: 1.0, ..TrainConfig::default() },
            TrainConfig { dropout: -0.1, ..TrainConfig::default() },
            TrainConfig { display_step: 0, ..TrainConfig::default() },
            TrainConfig { eval_chunk: 0, ..TrainConfig::default() },
        ];
        for cfg in bad {
            assert!(cfg.validate().is_err(), "{cfg:?} should be rejected");
        }
    }

    #[test]
    fn test_transposed_layout_is_valid() {
        let cfg = TrainConfig { seq_len: 56, input_size: 14, ..TrainConfig::default() };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_model_config_carries_topology() {
        let cfg = TrainConfig { cell: CellKind::Gru, hidden_size: 64, dropout: 0.2, ..TrainConfig::default() };
        let model_cfg = cfg.model_config();
        assert_eq!(model_cfg.cell, CellKind::Gru);
        assert_eq!(model_cfg.hidden_size, 64);
        assert_eq!(model_cfg.input_size, 28);
        assert_eq!(model_cfg.num_classes, 10);
        assert_eq!(model_cfg.dropout, 0.2);
    }

    #[test]
    fn test_config_json_round_trip() {
        let cfg  = TrainConfig { cell: CellKind::Gru, rotate: true, ..TrainConfig::default() };
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"cell\":\"gru\""));
        let back: TrainConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.cell, CellKind::Gru);
        assert!(back.rotate);
    }

    struct OneImage;

    impl ImageSource for OneImage {
        fn load_split(&self, _split: Split) -> Result<Vec<DigitImage>> {
            let mut pixels = vec![0u8; 784];
            pixels[27] = 255; // top-right corner
            Ok(vec![DigitImage::new(pixels, 4)])
        }
    }

    #[test]
    fn test_load_samples_rotates_when_asked() {
        let plain   = load_samples(&OneImage, Split::Test, false).unwrap();
        let rotated = load_samples(&OneImage, Split::Test, true).unwrap();
        assert_eq!(plain[0].pixels[27], 1.0);
        // Top-right moves to top-left after a counter-clockwise turn
        assert_eq!(rotated[0].pixels[0], 1.0);
        assert_eq!(rotated[0].label, 4);
    }

    #[test]
    fn test_execute_end_to_end_on_ndarray() {
        let data = tempfile::tempdir().unwrap();
        let ckpt = tempfile::tempdir().unwrap();
        write_dataset(data.path(), 30, 12, true);

        let cfg = TrainConfig {
            data_dir:        data.path().display().to_string(),
            checkpoint_dir:  ckpt.path().display().to_string(),
            cell:            CellKind::Gru,
            backend:         BackendKind::Ndarray,
            hidden_size:     8,
            batch_size:      5,
            training_iters:  5 * 7,
            display_step:    3,
            validation_size: 10,
            test_len:        8,
            eval_chunk:      5,
            ..TrainConfig::default()
        };
        let summary = TrainUseCase::new(cfg).execute().unwrap();

        assert_eq!(summary.steps, 6);
        assert_eq!(summary.test.subset_len, 8);
        assert_eq!(summary.test.subset.total, 8);
        assert_eq!(summary.test.full.total, 12);
        assert!((0.0..=1.0).contains(&summary.test.full.accuracy()));

        let saved = CheckpointManager::open(ckpt.path());
        assert_eq!(saved.latest_step().unwrap(), 6);
        assert_eq!(saved.load_config().unwrap().cell, CellKind::Gru);
    }

    #[test]
    fn test_execute_rejects_invalid_config_before_loading() {
        let cfg = TrainConfig { data_dir: "/nonexistent".into(), hidden_size: 0, ..TrainConfig::default() };
        let err = TrainUseCase::new(cfg).execute().unwrap_err();
        assert!(err.to_string().contains("hidden_size"));
    }
}
