// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that describe the problem: a labelled digit
// image, the kind of recurrent cell to train, and the trait a
// dataset source must implement.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §6 (Enums), §10 (Traits)

// A single 28x28 digit with its label
pub mod image;

// GRU / LSTM selection
pub mod cell;

// Core abstractions (traits) that other layers implement
pub mod traits;
