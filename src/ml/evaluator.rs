// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Accuracy and loss of a model over a set of samples.
//
// Samples are fed in fixed-size chunks so the full 10,000-image
// test set never has to sit on the device at once. Correct
// predictions are counted per chunk and divided by the number of
// images actually evaluated, so the result is the same as a
// single whole-set pass.

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::{
    batcher::MnistBatcher,
    dataset::MnistSample,
};
use crate::ml::model::RnnClassifier;

/// Totals accumulated over one or more batches.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Evaluation {
    /// Sum of per-sample cross-entropy
    pub loss_sum: f64,
    pub correct:  usize,
    pub total:    usize,
}

impl Evaluation {
    /// Fraction classified correctly, 0.0 for an empty set
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 { 0.0 } else { self.correct as f64 / self.total as f64 }
    }

    /// Mean cross-entropy, NaN for an empty set
    pub fn loss(&self) -> f64 {
        if self.total == 0 { f64::NAN } else { self.loss_sum / self.total as f64 }
    }

    pub fn merge(self, other: Evaluation) -> Evaluation {
        Evaluation {
            loss_sum: self.loss_sum + other.loss_sum,
            correct:  self.correct + other.correct,
            total:    self.total + other.total,
        }
    }
}

/// Number of rows whose argmax equals the target.
pub fn count_correct<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> usize {
    // argmax(1) returns shape [batch, 1] — flatten to [batch]
    let predicted = logits.argmax(1).flatten::<1>(0, 1);
    let correct: i64 = predicted
        .equal(targets)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();
    correct as usize
}

/// Score a single batch without touching gradients.
pub fn score_batch<B: Backend>(
    model:   &RnnClassifier<B>,
    images:  Tensor<B, 3>,
    targets: Tensor<B, 1, Int>,
) -> Evaluation {
    let total = targets.dims()[0];
    if total == 0 {
        return Evaluation::default();
    }
    let (loss, logits) = model.forward_classification(images, targets.clone());
    let loss: f64 = loss.into_scalar().elem::<f64>();
    Evaluation {
        loss_sum: loss * total as f64,
        correct:  count_correct(logits, targets),
        total,
    }
}

/// Evaluate `samples` in chunks of `chunk_size`.
pub fn evaluate<B: Backend>(
    model:      &RnnClassifier<B>,
    batcher:    &MnistBatcher<B>,
    samples:    &[MnistSample],
    chunk_size: usize,
) -> Evaluation {
    samples
        .chunks(chunk_size.max(1))
        .map(|chunk| {
            let batch = batcher.batch(chunk.to_vec());
            score_batch(model, batch.images, batch.targets)
        })
        .fold(Evaluation::default(), Evaluation::merge)
}

/// The two figures reported after training: accuracy on the first
/// `subset_len` test images and on the whole test set.
#[derive(Debug, Clone, Copy)]
pub struct TestReport {
    pub subset_len: usize,
    pub subset:     Evaluation,
    pub full:       Evaluation,
}

pub fn test_report<B: Backend>(
    model:      &RnnClassifier<B>,
    batcher:    &MnistBatcher<B>,
    samples:    &[MnistSample],
    subset_len: usize,
    chunk_size: usize,
) -> TestReport {
    let subset_len = subset_len.min(samples.len());
    TestReport {
        subset_len,
        subset: evaluate(model, batcher, &samples[..subset_len], chunk_size),
        full:   evaluate(model, batcher, samples, chunk_size),
    }
}
