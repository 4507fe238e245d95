// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// one user-level goal: train, evaluate or predict.
//
// Rules for this layer:
//   - No tensor math or model code here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - No direct file parsing (that's Layer 4 and 6)
//   - Picks the concrete backend, then stays generic
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// Test-set accuracy of a saved checkpoint
pub mod evaluate_use_case;

// Single-image classification
pub mod predict_use_case;
