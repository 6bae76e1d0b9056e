// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a CSV on disk and a numeric matrix the
// model layer can consume.
//
//   remote archive
//       │
//       ▼
//   DatasetProvider     → downloads + unzips diabetes.csv if absent
//       │
//       ▼
//   TrainingCsvLoader   → 9 positional columns → Dataset
//       │
//       ▼
//   split_train_test    → seeded 80/20 partition
//
//   BatchTable          → headed CSV of new patients, required
//                         columns checked by name
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use thiserror::Error;

/// Downloads and extracts the training dataset
pub mod provider;

/// Reads training and batch CSV files
pub mod loader;

/// Feature matrix + label container
pub mod dataset;

/// Seeded train/test partitioning
pub mod splitter;

/// Failures while turning CSV rows into features.
#[derive(Debug, Error)]
pub enum DataError {
    /// A training row ended before the given column
    #[error("missing column '{column}' in row {row}")]
    MissingColumn { column: &'static str, row: usize },

    /// Unparsable or non-finite (NaN, inf) cell
    #[error("invalid value '{value}' for column '{column}' in row {row}")]
    InvalidValue { column: String, row: usize, value: String },

    /// A training row with cells beyond the Outcome column
    #[error("row {row} has {found} fields, expected {expected}")]
    ExtraFields { row: usize, found: usize, expected: usize },

    /// A batch file header lacks one or more feature columns
    #[error(
        "The input dataset is missing one or more required columns: {}. Required columns are: [{}]",
        .missing.join(", "),
        .required.join(", ")
    )]
    MissingColumns { missing: Vec<String>, required: Vec<String> },

    #[error("feature matrix shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}
