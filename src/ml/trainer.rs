// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Minibatch Adam training with an example budget:
//
//   step = 1
//   while step * batch_size < training_iters:
//       draw the next shuffled minibatch
//       forward (dropout on) → cross-entropy → backward → Adam
//       every display_step steps: re-score the same minibatch
//                                 with dropout off and report
//       step += 1
//
// The loader is re-iterated (a new shuffled pass) whenever it
// runs dry before the budget is spent. At the end of every pass
// the held-out validation set is scored and a checkpoint saved.
//
// Key Burn detail:
//   - Training runs on B (Autodiff<…>) for gradients
//   - model.valid() returns the model on B::InnerBackend with
//     dropout disabled; everything measured goes through it
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{ensure, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    data::dataset::Dataset,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::MnistBatcher, dataset::MnistDataset};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{MetricsLogger, Phase, StepMetrics},
};
use crate::ml::evaluator::{evaluate, score_batch};
use crate::ml::model::RnnClassifier;

/// What a finished run hands back to the use case.
pub struct TrainOutcome<B: AutodiffBackend> {
    pub model:    RnnClassifier<B>,
    /// Optimiser steps actually taken
    pub steps:    usize,
    /// Training examples consumed
    pub examples: usize,
}

pub fn run_training<B: AutodiffBackend>(
    cfg:          &TrainConfig,
    train_data:   MnistDataset,
    valid_data:   MnistDataset,
    ckpt_manager: &CheckpointManager,
    metrics:      &MetricsLogger,
    device:       B::Device,
) -> Result<TrainOutcome<B>> {
    ensure!(!train_data.is_empty(), "Training set is empty");

    B::seed(cfg.seed);

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: RnnClassifier<B> = cfg.model_config().init(&device);
    tracing::info!(
        "Model ready: {} with {} units over {} steps of {} features",
        cfg.cell, cfg.hidden_size, cfg.seq_len, cfg.input_size
    );

    let mut optim = AdamConfig::new().init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = MnistBatcher::<B>::new(device.clone(), cfg.seq_len, cfg.input_size);
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(cfg.num_workers)
        .build(train_data);

    // ── Validation batcher (InnerBackend — no autodiff overhead) ──────────────
    let valid_batcher = MnistBatcher::<B::InnerBackend>::new(device.clone(), cfg.seq_len, cfg.input_size);

    let mut step          = 1usize;
    let mut pass          = 0usize;
    let mut best_val_loss = f64::INFINITY;
    let mut last_saved: Option<usize> = None;

    while step * cfg.batch_size < cfg.training_iters {
        pass += 1;
        tracing::debug!("Starting pass {} over the training set", pass);

        for batch in train_loader.iter() {
            if step * cfg.batch_size >= cfg.training_iters {
                break;
            }

            // Backward pass + Adam update
            let (loss, _) = model.forward_classification(batch.images.clone(), batch.targets.clone());
            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optim.step(cfg.lr, model, grads);

            if step % cfg.display_step == 0 {
                // Measure with dropout off, on the batch just trained on
                let score = score_batch(&model.valid(), batch.images.inner(), batch.targets.inner());
                let examples = step * cfg.batch_size;
                println!(
                    "Iter {}, Minibatch Loss= {:.6}, Training Accuracy= {:.5}",
                    examples,
                    score.loss(),
                    score.accuracy(),
                );
                metrics.log(&StepMetrics::new(Phase::Train, step, examples, score.loss(), score.accuracy()))?;
            }

            step += 1;
        }

        // ── End of pass: validation + checkpoint ──────────────────────────────
        let steps_done = step - 1;
        if !valid_data.is_empty() {
            let val = evaluate(&model.valid(), &valid_batcher, valid_data.samples(), cfg.eval_chunk);
            let row = StepMetrics::new(
                Phase::Valid, steps_done, steps_done * cfg.batch_size, val.loss(), val.accuracy(),
            );
            println!(
                "Pass {:>3} | step {} | val_loss={:.4} | val_acc={:.2}%",
                pass, steps_done, val.loss(), val.accuracy() * 100.0,
            );
            if row.is_improvement(best_val_loss) {
                best_val_loss = row.loss;
                tracing::info!("New best validation loss {:.4} at step {}", best_val_loss, steps_done);
            }
            metrics.log(&row)?;
        }

        ckpt_manager.save_model(&model, steps_done)?;
        last_saved = Some(steps_done);
        tracing::info!("Checkpoint saved for step {}", steps_done);
    }

    let steps = step - 1;
    if last_saved != Some(steps) {
        // Budget smaller than a single batch: keep the untrained weights
        // so evaluate/predict still have something to load.
        tracing::warn!(
            "training_iters={} does not exceed batch_size={}; no optimisation steps were taken",
            cfg.training_iters, cfg.batch_size
        );
        ckpt_manager.save_model(&model, steps)?;
    }

    println!("Optimization Finished!");
    tracing::info!("Training complete after {} steps", steps);

    Ok(TrainOutcome { model, steps, examples: steps * cfg.batch_size })
}
