// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by more than one use case:
//
//   artifact_store.rs — Saving and loading the fitted forest and
//                       scaler (bincode), plus the training
//                       config and evaluation report (JSON).
//                       Training writes; the HTTP service and
//                       the batch validator only read.
//
//   metrics.rs        — Confusion matrix and held-out
//                       evaluation report.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Model and scaler persistence
pub mod artifact_store;

/// Held-out evaluation metrics
pub mod metrics;
