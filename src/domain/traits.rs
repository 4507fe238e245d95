// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer asks for images through ImageSource and
// never learns where they came from. IdxLoader (Layer 4) reads
// the standard MNIST files; tests plug in an in-memory source.

use anyhow::Result;
use crate::domain::image::DigitImage;

// ─── Split ────────────────────────────────────────────────────────────────────
/// The two partitions MNIST is distributed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    /// 60,000 training images
    Train,
    /// 10,000 test images
    Test,
}

// ─── ImageSource ──────────────────────────────────────────────────────────────
/// Any component that can produce labelled digit images.
pub trait ImageSource {
    /// Load every image of the requested split, in file order.
    fn load_split(&self, split: Split) -> Result<Vec<DigitImage>>;
}
