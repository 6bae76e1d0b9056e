// ============================================================
// Layer 4 — CSV Loaders
// ============================================================
// Two input formats are read here:
//
//   Training CSV — the Pima dataset. The header row is skipped
//                  and the nine columns are read by POSITION:
//                  Pregnancies, Glucose, BloodPressure,
//                  SkinThickness, Insulin, BMI,
//                  DiabetesPedigreeFunction, Age, Outcome
//
//   Batch CSV    — new patients to score. Columns are found by
//                  NAME (exact, case-sensitive), may appear in
//                  any order, and extra columns are carried
//                  through untouched. Outcome is optional.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use csv::StringRecord;
use ndarray::Array2;
use std::{fs::File, path::{Path, PathBuf}};

use crate::data::{dataset::Dataset, DataError};
use crate::domain::patient::{Outcome, FEATURE_COLUMNS, N_FEATURES, OUTCOME_COLUMN};

// ─── Training CSV ─────────────────────────────────────────────────────────────
pub struct TrainingCsvLoader {
    path: PathBuf,
}

impl TrainingCsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read every data row into a Dataset.
    ///
    /// A short row fails with a missing-column error naming the first
    /// absent column; a non-numeric cell fails naming row and column.
    pub fn load(&self) -> Result<Dataset> {
        let file = File::open(&self.path)
            .with_context(|| format!("Cannot open training data '{}'", self.path.display()))?;

        // flexible: short rows reach parse_field and get a named error,
        // long rows are rejected below
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let mut features = Vec::new();
        let mut labels   = Vec::new();

        for (idx, result) in reader.records().enumerate() {
            let row    = idx + 1;
            let record = result
                .with_context(|| format!("Failed to read row {} of '{}'", row, self.path.display()))?;

            if record.len() > N_FEATURES + 1 {
                return Err(DataError::ExtraFields {
                    row,
                    found:    record.len(),
                    expected: N_FEATURES + 1,
                }
                .into());
            }

            for (col, name) in FEATURE_COLUMNS.iter().enumerate() {
                features.push(parse_field(&record, col, name, row)?);
            }

            let raw_outcome = parse_field(&record, N_FEATURES, OUTCOME_COLUMN, row)?;
            let outcome     = Outcome::from_value(raw_outcome).ok_or_else(|| DataError::InvalidValue {
                column: OUTCOME_COLUMN.to_string(),
                row,
                value:  raw_outcome.to_string(),
            })?;
            labels.push(outcome.class_index());
        }

        let n_rows   = labels.len();
        let features = Array2::from_shape_vec((n_rows, N_FEATURES), features)
            .map_err(DataError::from)?;

        tracing::info!("Loaded {} rows from '{}'", n_rows, self.path.display());
        Dataset::new(features, labels)
    }
}

fn parse_field(
    record: &StringRecord,
    index:  usize,
    column: &'static str,
    row:    usize,
) -> std::result::Result<f64, DataError> {
    let raw = record
        .get(index)
        .ok_or(DataError::MissingColumn { column, row })?;

    // NaN and inf parse as f64 but would poison the scaler statistics
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(DataError::InvalidValue {
            column: column.to_string(),
            row,
            value:  raw.to_string(),
        }),
    }
}

// ─── Batch CSV ────────────────────────────────────────────────────────────────
/// A headed CSV of patients to score, kept verbatim so the output
/// can reproduce every input column.
#[derive(Debug, Clone)]
pub struct BatchTable {
    headers: StringRecord,
    rows:    Vec<StringRecord>,
}

impl BatchTable {
    pub fn read(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| {
            format!(
                "Error: '{}' not found. Please create this file with your new data.",
                path.display()
            )
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        let headers = reader
            .headers()
            .with_context(|| format!("Cannot read header row of '{}'", path.display()))?
            .clone();

        let rows = reader
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context(|| format!("Cannot read rows of '{}'", path.display()))?;

        tracing::debug!("Read {} batch rows from '{}'", rows.len(), path.display());
        Ok(Self { headers, rows })
    }

    pub fn from_parts(headers: StringRecord, rows: Vec<StringRecord>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &StringRecord { &self.headers }

    pub fn rows(&self) -> &[StringRecord] { &self.rows }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Feature columns absent from the header, in FEATURE_COLUMNS order
    pub fn missing_columns(&self) -> Vec<&'static str> {
        FEATURE_COLUMNS
            .iter()
            .copied()
            .filter(|name| !self.headers.iter().any(|h| h == *name))
            .collect()
    }

    /// Extract the eight feature columns (in FEATURE_COLUMNS order)
    /// as an n×8 matrix. Fails before reading any row if a required
    /// column is missing.
    pub fn feature_matrix(&self) -> std::result::Result<Array2<f64>, DataError> {
        let missing = self.missing_columns();
        if !missing.is_empty() {
            return Err(DataError::MissingColumns {
                missing:  missing.iter().map(|s| s.to_string()).collect(),
                required: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
            });
        }

        let positions: Vec<usize> = FEATURE_COLUMNS
            .iter()
            .filter_map(|name| self.headers.iter().position(|h| h == *name))
            .collect();

        let mut values = Vec::with_capacity(self.rows.len() * N_FEATURES);
        for (idx, record) in self.rows.iter().enumerate() {
            for (&pos, name) in positions.iter().zip(FEATURE_COLUMNS.iter()) {
                values.push(parse_field(record, pos, name, idx + 1)?);
            }
        }

        Ok(Array2::from_shape_vec((self.rows.len(), N_FEATURES), values)?)
    }
}
