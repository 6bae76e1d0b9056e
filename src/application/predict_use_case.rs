// ============================================================
// Layer 2 — Prediction Service
// ============================================================
// Holds the fitted scaler and forest for the lifetime of the
// process. Built once at startup, then shared read-only (behind
// an Arc) by every request handler.
//
// Degraded mode:
//   If either artifact cannot be loaded the service is still
//   constructed, with no artifacts. Every prediction then fails
//   with PredictError::ModelUnavailable instead of the process
//   refusing to start.
//
// Each patient is scaled exactly once. The probability row from
// that scaled vector decides the class and supplies the two
// reported probabilities, so they can never disagree.

use anyhow::Result;
use ndarray::{Array2, ArrayView2};

use crate::domain::{
    patient::{Outcome, PatientRecord, N_FEATURES},
    prediction::{PredictError, Prediction},
    traits::RiskPredictor,
};
use crate::infra::artifact_store::ArtifactStore;
use crate::ml::{argmax, forest::RandomForest, scaler::StandardScaler, Classifier};

struct LoadedArtifacts {
    model:  RandomForest,
    scaler: StandardScaler,
}

pub struct PredictionService {
    artifacts: Option<LoadedArtifacts>,
}

impl PredictionService {
    pub fn new(model: RandomForest, scaler: StandardScaler) -> Self {
        Self { artifacts: Some(LoadedArtifacts { model, scaler }) }
    }

    /// A service that answers every request with ModelUnavailable.
    pub fn unavailable() -> Self {
        Self { artifacts: None }
    }

    /// Load both artifacts, falling back to degraded mode on failure.
    pub fn load(store: &ArtifactStore) -> Self {
        match Self::load_strict(store) {
            Ok(service) => {
                tracing::info!("Model and scaler loaded from '{}'", store.dir().display());
                service
            }
            Err(e) => {
                tracing::warn!("Error loading model or scaler: {:#}", e);
                Self::unavailable()
            }
        }
    }

    /// Load both artifacts or fail.
    pub fn load_strict(store: &ArtifactStore) -> Result<Self> {
        let model  = store.load_model()?;
        let scaler = store.load_scaler()?;
        Ok(Self::new(model, scaler))
    }

    /// Score every row of a raw (unscaled) n×8 feature matrix.
    pub fn predict_batch(&self, raw: ArrayView2<'_, f64>) -> Result<Vec<Prediction>, PredictError> {
        let artifacts = self.artifacts.as_ref().ok_or(PredictError::ModelUnavailable)?;

        let scaled = artifacts.scaler.transform(raw).map_err(inference_error)?;
        let proba  = artifacts.model.predict_proba(scaled.view()).map_err(inference_error)?;

        Ok(proba
            .rows()
            .into_iter()
            .map(|row| Prediction::new(Outcome::from_class(argmax(row)), row[0], row[1]))
            .collect())
    }
}

fn inference_error(e: anyhow::Error) -> PredictError {
    PredictError::Inference(format!("{e:#}"))
}

impl RiskPredictor for PredictionService {
    fn predict(&self, record: &PatientRecord) -> Result<Prediction, PredictError> {
        let raw = Array2::from_shape_vec((1, N_FEATURES), record.to_features().to_vec())
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        self.predict_batch(raw.view())?
            .pop()
            .ok_or_else(|| PredictError::Inference("empty prediction".to_string()))
    }

    fn is_ready(&self) -> bool {
        self.artifacts.is_some()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::forest::ForestConfig;
    use crate::test_support::{example_patient, synthetic_dataset, trained_service};

    #[test]
    fn test_example_patient_gets_consistent_answer() {
        let service = trained_service();
        let p       = service.predict(&example_patient()).unwrap();

        assert!((p.diabetes_probability + p.no_diabetes_probability - 1.0).abs() < 1e-9);
        assert_eq!(p.has_diabetes, p.diabetes_probability > p.no_diabetes_probability);
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let service = trained_service();
        let a       = service.predict(&example_patient()).unwrap();
        let b       = service.predict(&example_patient()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_batch_matches_single_predictions() {
        let service = trained_service();
        let ds      = synthetic_dataset(30, 9);
        let batch   = service.predict_batch(ds.features()).unwrap();

        assert_eq!(batch.len(), 30);
        for p in &batch {
            assert!((p.diabetes_probability + p.no_diabetes_probability - 1.0).abs() < 1e-9);
            assert_eq!(p.has_diabetes, p.diabetes_probability > p.no_diabetes_probability);
        }
    }

    #[test]
    fn test_unavailable_service_reports_model_unavailable() {
        let service = PredictionService::unavailable();
        assert!(!service.is_ready());
        assert!(matches!(
            service.predict(&example_patient()),
            Err(PredictError::ModelUnavailable)
        ));
    }

    #[test]
    fn test_load_from_empty_dir_degrades() {
        let dir     = tempfile::tempdir().unwrap();
        let store   = ArtifactStore::new(dir.path());
        let service = PredictionService::load(&store);
        assert!(!service.is_ready());
        assert!(PredictionService::load_strict(&store).is_err());
    }

    #[test]
    fn test_load_after_save_is_ready() {
        let dir    = tempfile::tempdir().unwrap();
        let store  = ArtifactStore::new(dir.path());
        let ds     = synthetic_dataset(80, 10);
        let scaler = StandardScaler::fit(ds.features()).unwrap();
        let scaled = scaler.transform(ds.features()).unwrap();
        let model  = RandomForest::fit(scaled.view(), ds.labels(), ForestConfig::new(5, 42)).unwrap();
        store.save_model(&model).unwrap();
        store.save_scaler(&scaler).unwrap();

        let service = PredictionService::load(&store);
        assert!(service.is_ready());
        assert_eq!(
            service.predict(&example_patient()).unwrap(),
            PredictionService::new(model, scaler).predict(&example_patient()).unwrap()
        );
    }

    #[test]
    fn test_wrong_width_is_an_inference_error() {
        let service = trained_service();
        let bad     = Array2::<f64>::zeros((1, 3));
        assert!(matches!(
            service.predict_batch(bad.view()),
            Err(PredictError::Inference(_))
        ));
    }
}
