// ============================================================
// Layer 4 — MNIST Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<MnistSample>
// into tensors the recurrent model can consume.
//
// How an image becomes a sequence:
//   Each sample is 784 floats, row-major. Reshaping to
//   [seq_len, input_size] = [28, 28] makes every pixel row one
//   time step of 28 features, so the model reads the digit top
//   to bottom. Other factorisations (e.g. [56, 14]) work the same
//   way as long as seq_len * input_size == 784.
//
//   Input:  Vec of N MnistSamples
//   Output: MnistBatch { images: [N, seq_len, input_size],
//                        targets: [N] }
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::MnistSample;

// ─── MnistBatch ───────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct MnistBatch<B: Backend> {
    /// Pixel sequences — shape: [batch_size, seq_len, input_size]
    pub images: Tensor<B, 3>,

    /// Digit labels — shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

// ─── MnistBatcher ─────────────────────────────────────────────────────────────
/// Holds the target device and the sequence layout.
#[derive(Clone, Debug)]
pub struct MnistBatcher<B: Backend> {
    pub device:     B::Device,
    pub seq_len:    usize,
    pub input_size: usize,
}

impl<B: Backend> MnistBatcher<B> {
    pub fn new(device: B::Device, seq_len: usize, input_size: usize) -> Self {
        Self { device, seq_len, input_size }
    }
}

impl<B: Backend> Batcher<MnistSample, MnistBatch<B>> for MnistBatcher<B> {
    fn batch(&self, items: Vec<MnistSample>) -> MnistBatch<B> {
        let batch_size = items.len();

        let pixels_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.pixels.iter().copied())
            .collect();

        let labels: Vec<i32> = items
            .iter()
            .map(|s| s.label as i32)
            .collect();

        let images = Tensor::<B, 1>::from_floats(pixels_flat.as_slice(), &self.device)
            .reshape([batch_size, self.seq_len, self.input_size]);

        let targets = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        MnistBatch { images, targets }
    }
}
