// ============================================================
// Layer 7 — Request Handlers
// ============================================================
// POST /predict   body: PatientRequest   → Prediction
// GET  /health                           → HealthResponse
//
// Request bodies are parsed into a strongly typed struct and
// validated before any model code runs. Every field is required;
// pregnancies and age must be non-negative integers, the other
// six non-negative numbers.
//
// Example:
//   curl -X POST http://localhost:8000/predict \
//        -H 'Content-Type: application/json' \
//        -d '{"pregnancies":5,"glucose":120,"blood_pressure":72,
//             "skin_thickness":23,"insulin":84,"bmi":32.1,
//             "diabetes_pedigree_function":0.25,"age":30}'

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{patient::PatientRecord, prediction::Prediction};
use crate::server::{error::ApiError, AppState};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PatientRequest {
    pub pregnancies: u32,

    #[validate(range(min = 0.0))]
    pub glucose: f64,

    #[validate(range(min = 0.0))]
    pub blood_pressure: f64,

    #[validate(range(min = 0.0))]
    pub skin_thickness: f64,

    #[validate(range(min = 0.0))]
    pub insulin: f64,

    #[validate(range(min = 0.0))]
    pub bmi: f64,

    #[validate(range(min = 0.0))]
    pub diabetes_pedigree_function: f64,

    pub age: u32,
}

impl From<PatientRequest> for PatientRecord {
    fn from(r: PatientRequest) -> Self {
        PatientRecord {
            pregnancies:                r.pregnancies,
            glucose:                    r.glucose,
            blood_pressure:             r.blood_pressure,
            skin_thickness:             r.skin_thickness,
            insulin:                    r.insulin,
            bmi:                        r.bmi,
            diabetes_pedigree_function: r.diabetes_pedigree_function,
            age:                        r.age,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status:       String,
    pub model_loaded: bool,
}

/// Score one patient
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PatientRequest>, JsonRejection>,
) -> Result<Json<Prediction>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let record     = PatientRecord::from(request);
    let prediction = state.predictor.predict(&record)?;

    tracing::debug!(
        has_diabetes = prediction.has_diabetes,
        probability  = prediction.diabetes_probability,
        "Prediction served"
    );
    Ok(Json(prediction))
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let model_loaded = state.predictor.is_ready();
    Json(HealthResponse {
        status: if model_loaded { "healthy" } else { "degraded" }.to_string(),
        model_loaded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_measurement_fails_validation() {
        let request: PatientRequest = serde_json::from_str(
            r#"{"pregnancies":1,"glucose":-5,"blood_pressure":72,"skin_thickness":23,
                "insulin":84,"bmi":32.1,"diabetes_pedigree_function":0.25,"age":30}"#,
        )
        .unwrap();
        let err = request.validate().unwrap_err();
        assert!(err.field_errors().contains_key("glucose"));
    }

    #[test]
    fn test_negative_age_is_rejected_by_type() {
        let parsed = serde_json::from_str::<PatientRequest>(
            r#"{"pregnancies":1,"glucose":120,"blood_pressure":72,"skin_thickness":23,
                "insulin":84,"bmi":32.1,"diabetes_pedigree_function":0.25,"age":-3}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_request_maps_fields_in_order() {
        let request: PatientRequest = serde_json::from_str(
            r#"{"pregnancies":5,"glucose":120,"blood_pressure":72,"skin_thickness":23,
                "insulin":84,"bmi":32.1,"diabetes_pedigree_function":0.25,"age":30}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(
            PatientRecord::from(request).to_features(),
            [5.0, 120.0, 72.0, 23.0, 84.0, 32.1, 0.25, 30.0]
        );
    }
}
