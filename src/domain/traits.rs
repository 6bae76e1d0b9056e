// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The two seams the rest of the system is written against:
//
//   RiskPredictor — anything that turns a PatientRecord into a
//                   Prediction (the HTTP layer only sees this)
//   Persistable   — anything written to and read back from the
//                   build directory as a training artifact
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use std::path::Path;

use crate::domain::patient::PatientRecord;
use crate::domain::prediction::{PredictError, Prediction};

// ─── RiskPredictor ────────────────────────────────────────────────────────────
/// Any component that can score a single patient.
///
/// Implementations:
///   - PredictionService → scaler + random forest loaded from artifacts
pub trait RiskPredictor: Send + Sync {
    /// Score one patient. Must not mutate shared state.
    fn predict(&self, record: &PatientRecord) -> std::result::Result<Prediction, PredictError>;

    /// Whether predictions can currently be served
    fn is_ready(&self) -> bool;
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Any component whose fitted state is saved to and restored from disk.
///
/// Implementations:
///   - RandomForest   → build/diabetes_model.bin
///   - StandardScaler → build/scaler.bin
pub trait Persistable: Sized {
    /// Save this component's state to the given path, replacing any existing file
    fn save(&self, path: &Path) -> Result<()>;

    /// Load a component's state from the given path.
    fn load(path: &Path) -> Result<Self>;
}
