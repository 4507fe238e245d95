// ============================================================
// Layer 4 — IDX Dataset Loader
// ============================================================
// Reads the four MNIST files from a local directory.
//
// The IDX format is a tiny big-endian container:
//
//   images (magic 0x00000803)         labels (magic 0x00000801)
//   ┌──────────────┐                  ┌──────────────┐
//   │ magic   u32  │                  │ magic   u32  │
//   │ count   u32  │                  │ count   u32  │
//   │ rows    u32  │                  │ label   u8   │ × count
//   │ cols    u32  │                  └──────────────┘
//   │ pixel   u8   │ × count·rows·cols
//   └──────────────┘
//
// Files may sit on disk either raw (as distributed after
// unpacking) or still gzip-compressed with a `.gz` suffix.
// The raw file wins when both are present.
//
// Reference: http://yann.lecun.com/exdb/mnist/ (file format)
//            flate2 crate documentation

use anyhow::{bail, ensure, Context, Result};
use flate2::read::GzDecoder;
use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use crate::domain::image::{DigitImage, IMAGE_HEIGHT, IMAGE_PIXELS, IMAGE_WIDTH, NUM_CLASSES};
use crate::domain::traits::{ImageSource, Split};

pub const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
pub const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
pub const TEST_IMAGES:  &str = "t10k-images-idx3-ubyte";
pub const TEST_LABELS:  &str = "t10k-labels-idx1-ubyte";

const IMAGES_MAGIC: u32 = 0x0000_0803;
const LABELS_MAGIC: u32 = 0x0000_0801;

/// Loads MNIST splits from a directory of IDX files.
/// Implements the ImageSource trait from Layer 3.
pub struct IdxLoader {
    dir: PathBuf,
}

impl IdxLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Locate `name` or `name.gz` inside the data directory
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        let raw = self.dir.join(name);
        if raw.is_file() {
            return Ok(raw);
        }
        let gz = self.dir.join(format!("{name}.gz"));
        if gz.is_file() {
            return Ok(gz);
        }
        bail!(
            "MNIST file '{}' (or '{}.gz') not found in '{}'",
            name,
            name,
            self.dir.display()
        )
    }
}

impl ImageSource for IdxLoader {
    fn load_split(&self, split: Split) -> Result<Vec<DigitImage>> {
        ensure!(
            self.dir.is_dir(),
            "Data directory '{}' does not exist",
            self.dir.display()
        );

        let (images_name, labels_name) = match split {
            Split::Train => (TRAIN_IMAGES, TRAIN_LABELS),
            Split::Test  => (TEST_IMAGES, TEST_LABELS),
        };

        let images_path = self.resolve(images_name)?;
        let labels_path = self.resolve(labels_name)?;

        let images = parse_images(&read_maybe_gz(&images_path)?)
            .with_context(|| format!("Invalid IDX image file '{}'", images_path.display()))?;
        let labels = parse_labels(&read_maybe_gz(&labels_path)?)
            .with_context(|| format!("Invalid IDX label file '{}'", labels_path.display()))?;

        ensure!(
            images.len() == labels.len(),
            "'{}' holds {} images but '{}' holds {} labels",
            images_path.display(),
            images.len(),
            labels_path.display(),
            labels.len()
        );

        tracing::info!("Loaded {} {:?} images from '{}'", images.len(), split, self.dir.display());

        Ok(images
            .into_iter()
            .zip(labels)
            .map(|(pixels, label)| DigitImage::new(pixels, label))
            .collect())
    }
}

/// Read a whole file, transparently gunzipping `.gz` files.
fn read_maybe_gz(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;

    if path.extension().and_then(|e| e.to_str()) != Some("gz") {
        return Ok(bytes);
    }

    let mut decoded = Vec::new();
    GzDecoder::new(bytes.as_slice())
        .read_to_end(&mut decoded)
        .with_context(|| format!("Cannot decompress '{}'", path.display()))?;
    Ok(decoded)
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32> {
    let word: [u8; 4] = bytes
        .get(offset..offset + 4)
        .and_then(|s| s.try_into().ok())
        .with_context(|| format!("Truncated header at byte {offset}"))?;
    Ok(u32::from_be_bytes(word))
}

/// Parse an IDX3 image file into one Vec<u8> of IMAGE_PIXELS per image.
pub fn parse_images(bytes: &[u8]) -> Result<Vec<Vec<u8>>> {
    let magic = read_u32(bytes, 0)?;
    ensure!(magic == IMAGES_MAGIC, "Bad magic number {magic:#010x}, expected {IMAGES_MAGIC:#010x}");

    let count = read_u32(bytes, 4)? as usize;
    let rows  = read_u32(bytes, 8)? as usize;
    let cols  = read_u32(bytes, 12)? as usize;
    ensure!(
        rows == IMAGE_HEIGHT && cols == IMAGE_WIDTH,
        "Images are {rows}x{cols}, expected {IMAGE_HEIGHT}x{IMAGE_WIDTH}"
    );

    let payload = &bytes[16..];
    ensure!(
        payload.len() == count * IMAGE_PIXELS,
        "Header announces {count} images ({} bytes) but payload has {} bytes",
        count * IMAGE_PIXELS,
        payload.len()
    );

    Ok(payload.chunks_exact(IMAGE_PIXELS).map(<[u8]>::to_vec).collect())
}

/// Parse an IDX1 label file.
pub fn parse_labels(bytes: &[u8]) -> Result<Vec<u8>> {
    let magic = read_u32(bytes, 0)?;
    ensure!(magic == LABELS_MAGIC, "Bad magic number {magic:#010x}, expected {LABELS_MAGIC:#010x}");

    let count   = read_u32(bytes, 4)? as usize;
    let payload = &bytes[8..];
    ensure!(
        payload.len() == count,
        "Header announces {count} labels but payload has {} bytes",
        payload.len()
    );

    if let Some(bad) = payload.iter().find(|&&l| l as usize >= NUM_CLASSES) {
        bail!("Label {bad} is not a digit");
    }

    Ok(payload.to_vec())
}

// ─── Test helpers ─────────────────────────────────────────────────────────────
// Encoders for synthetic IDX files, shared by tests in other modules.
#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    pub fn encode_images(images: &[Vec<u8>]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&IMAGES_MAGIC.to_be_bytes());
        out.extend_from_slice(&(images.len() as u32).to_be_bytes());
        out.extend_from_slice(&(IMAGE_HEIGHT as u32).to_be_bytes());
        out.extend_from_slice(&(IMAGE_WIDTH as u32).to_be_bytes());
        for img in images {
            out.extend_from_slice(img);
        }
        out
    }

    pub fn encode_labels(labels: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&LABELS_MAGIC.to_be_bytes());
        out.extend_from_slice(&(labels.len() as u32).to_be_bytes());
        out.extend_from_slice(labels);
        out
    }

    pub fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(bytes).unwrap();
        enc.finish().unwrap()
    }

    /// A tiny, learnable "digit" image: a bright horizontal bar whose
    /// row depends on the label, so each class has a distinct sequence.
    pub fn bar_image(label: u8) -> Vec<u8> {
        let mut pixels = vec![0u8; IMAGE_PIXELS];
        let row = 2 + 2 * label as usize;
        for col in 4..24 {
            pixels[row * IMAGE_WIDTH + col] = 255;
        }
        pixels
    }

    /// Write a complete synthetic MNIST directory (train + test).
    pub fn write_dataset(dir: &Path, train: usize, test: usize, gz: bool) {
        let write = |name: &str, bytes: Vec<u8>| {
            if gz {
                fs::write(dir.join(format!("{name}.gz")), gzip(&bytes)).unwrap();
            } else {
                fs::write(dir.join(name), bytes).unwrap();
            }
        };
        for (n, images_name, labels_name) in [
            (train, TRAIN_IMAGES, TRAIN_LABELS),
            (test, TEST_IMAGES, TEST_LABELS),
        ] {
            let labels: Vec<u8> = (0..n).map(|i| (i % NUM_CLASSES) as u8).collect();
            let images: Vec<Vec<u8>> = labels.iter().map(|&l| bar_image(l)).collect();
            write(images_name, encode_images(&images));
            write(labels_name, encode_labels(&labels));
        }
    }
}
