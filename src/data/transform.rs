// ============================================================
// Layer 4 — Image Transforms
// ============================================================
// Turns raw DigitImages into model-ready pixel vectors.
//
// Steps (applied in order):
//   1. Optional quarter-turn rotation (counter-clockwise)
//      Reading a rotated digit row by row means the recurrent
//      model sees the columns of the original image instead,
//      which is a useful experiment on how much the sequence
//      order matters.
//   2. Scale bytes 0..=255 to floats 0.0..=1.0
//
// Reference: Rust Book §13 (Iterators)

use anyhow::{ensure, Result};

use crate::data::dataset::MnistSample;
use crate::domain::image::{DigitImage, IMAGE_HEIGHT, IMAGE_PIXELS, IMAGE_WIDTH};

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageTransform {
    /// Rotate every image 90° counter-clockwise before scaling
    pub rotate: bool,
}

impl ImageTransform {
    pub fn new(rotate: bool) -> Self {
        Self { rotate }
    }

    /// Convert one image into a training sample.
    ///
    /// Images that are not exactly 28x28 are rejected; any
    /// ImageSource can build a DigitImage by hand.
    pub fn apply(&self, image: &DigitImage) -> Result<MnistSample> {
        ensure!(
            image.pixels.len() == IMAGE_PIXELS,
            "Image has {} pixels, expected {}",
            image.pixels.len(),
            IMAGE_PIXELS
        );

        let pixels = if self.rotate {
            rotate90(&image.pixels)
        } else {
            image.pixels.clone()
        };

        Ok(MnistSample {
            pixels: normalize(&pixels),
            label:  image.label as usize,
        })
    }

    /// Convert a whole split, failing on the first malformed image
    pub fn apply_all(&self, images: &[DigitImage]) -> Result<Vec<MnistSample>> {
        images.iter().map(|img| self.apply(img)).collect()
    }
}

/// Rotate a row-major 28x28 image a quarter turn counter-clockwise.
///
/// The top row of the output is the right-most column of the input:
/// `out[r][c] = in[c][W - 1 - r]`.
pub fn rotate90(pixels: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; pixels.len()];
    for r in 0..IMAGE_HEIGHT {
        for c in 0..IMAGE_WIDTH {
            out[r * IMAGE_WIDTH + c] = pixels[c * IMAGE_WIDTH + (IMAGE_WIDTH - 1 - r)];
        }
    }
    out
}

/// Scale grey levels to [0, 1]
pub fn normalize(pixels: &[u8]) -> Vec<f32> {
    pixels.iter().map(|&p| p as f32 / 255.0).collect()
}
