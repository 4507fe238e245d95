// ============================================================
// Layer 3 — DigitImage Domain Type
// ============================================================
// One MNIST example exactly as it is stored on disk:
// 784 grey-level bytes (28 rows of 28 pixels, row-major)
// and the digit it depicts.
//
// Pixel values are kept as raw bytes here. Scaling to [0, 1]
// happens in the data layer so this type stays format-agnostic.

use serde::{Deserialize, Serialize};

/// Width of an MNIST image in pixels
pub const IMAGE_WIDTH: usize = 28;

/// Height of an MNIST image in pixels
pub const IMAGE_HEIGHT: usize = 28;

/// Number of pixels in one image
pub const IMAGE_PIXELS: usize = IMAGE_WIDTH * IMAGE_HEIGHT;

/// Number of digit classes (0-9)
pub const NUM_CLASSES: usize = 10;

/// A labelled handwritten digit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitImage {
    /// Row-major grey levels, `IMAGE_PIXELS` long.
    /// 0 = background, 255 = full ink
    pub pixels: Vec<u8>,

    /// The digit drawn in the image, always < NUM_CLASSES
    pub label: u8,
}

impl DigitImage {
    /// Create a new DigitImage.
    ///
    /// Callers are expected to pass exactly `IMAGE_PIXELS` bytes;
    /// the IDX loader guarantees this for everything it produces.
    pub fn new(pixels: Vec<u8>, label: u8) -> Self {
        debug_assert_eq!(pixels.len(), IMAGE_PIXELS);
        Self { pixels, label }
    }
}
