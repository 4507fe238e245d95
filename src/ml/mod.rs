// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// Every piece of code that builds or runs tensors lives here.
//
//   model.rs      — GRU / LSTM layers wired from Burn Linear
//                   layers, plus the classifier head
//
//   trainer.rs    — Adam training loop with an example budget,
//                   periodic minibatch reports, per-pass
//                   validation and checkpointing
//
//   evaluator.rs  — chunked accuracy / loss over a sample set
//
//   inferencer.rs — rebuilds a model from a checkpoint and
//                   classifies single images
//
//   backend.rs    — the only place concrete backends are named
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

/// Recurrent classifier architecture
pub mod model;

/// Training loop with validation and checkpointing
pub mod trainer;

/// Accuracy and loss over a set of samples
pub mod evaluator;

/// Inference engine — loads checkpoint and classifies images
pub mod inferencer;

/// Concrete backend selection
pub mod backend;
