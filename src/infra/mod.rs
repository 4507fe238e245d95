// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence that no single business layer owns:
//
//   checkpoint.rs — model weights (Burn CompactRecorder) plus
//                   the TrainConfig JSON needed to rebuild the
//                   model before loading them
//
//   metrics.rs    — loss / accuracy rows appended to a CSV file
//                   during training
//
// Reference: Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
