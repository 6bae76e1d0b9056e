// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that define what the
// system talks about: patients, outcomes and predictions.
//
// Rules for this layer:
//   - NO ndarray or model types
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Patient measurements, feature order and the outcome label
pub mod patient;

// The per-patient prediction and its failure modes
pub mod prediction;

// Core abstractions (traits) that other layers implement
pub mod traits;
