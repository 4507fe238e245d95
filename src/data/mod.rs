// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from IDX files on disk to tensor batches:
//
//   IDX files (raw or .gz)
//       │
//       ▼
//   IdxLoader         → parses headers, yields DigitImages
//       │
//       ▼
//   ImageTransform    → optional rotation, scale to [0, 1]
//       │
//       ▼
//   split_validation  → seeded train / validation split
//       │
//       ▼
//   MnistDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   MnistBatcher      → stacks samples into [N, steps, features]
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads MNIST IDX files from a directory
pub mod loader;

/// Rotation and pixel scaling
pub mod transform;

/// Implements Burn's Dataset trait for MNIST samples
pub mod dataset;

/// Implements Burn's Batcher trait to create sequence batches
pub mod batcher;

/// Seeded train/validation split
pub mod splitter;
