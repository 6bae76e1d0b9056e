// ============================================================
// Layer 3 — Prediction Domain Type
// ============================================================
// The answer for one patient. Serialises directly into the
// HTTP response body:
//
//   {"has_diabetes": bool,
//    "diabetes_probability": f64,
//    "no_diabetes_probability": f64}

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::patient::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub has_diabetes:            bool,
    pub diabetes_probability:    f64,
    pub no_diabetes_probability: f64,
}

impl Prediction {
    /// Build a prediction from the classifier's decision and the
    /// probability row it was derived from.
    pub fn new(outcome: Outcome, no_diabetes_probability: f64, diabetes_probability: f64) -> Self {
        Self {
            has_diabetes: outcome.is_positive(),
            diabetes_probability,
            no_diabetes_probability,
        }
    }

    pub fn outcome(&self) -> Outcome {
        if self.has_diabetes { Outcome::Positive } else { Outcome::Negative }
    }
}

/// Why a prediction could not be produced.
#[derive(Debug, Error)]
pub enum PredictError {
    /// Artifacts were missing or unreadable when the service started
    #[error("Model or scaler not loaded. Please check server logs.")]
    ModelUnavailable,

    #[error("Inference failed: {0}")]
    Inference(String),
}
