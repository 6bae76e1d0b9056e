// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// one goal per use case (train, serve predictions, validate a
// batch file).
//
// Rules for this layer:
//   - No ML math here (that's Layer 5)
//   - No argument parsing or HTTP types (Layers 1 and 7)
//   - File access only through Layer 4 and Layer 6
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// The loaded model + scaler shared by the HTTP service
pub mod predict_use_case;

// The batch CSV scoring workflow
pub mod validate_use_case;
