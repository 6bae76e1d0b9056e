use anyhow::{ensure, Result};
use ndarray::{Array2, ArrayView2, Axis};

use crate::domain::patient::{Outcome, N_FEATURES};

/// Feature matrix (one row per patient, FEATURE_COLUMNS order) and class labels.
#[derive(Debug, Clone)]
pub struct Dataset {
    features: Array2<f64>,
    labels:   Vec<usize>,
}

impl Dataset {
    pub fn new(features: Array2<f64>, labels: Vec<usize>) -> Result<Self> {
        ensure!(
            features.nrows() == labels.len(),
            "feature rows ({}) and labels ({}) differ in length",
            features.nrows(),
            labels.len()
        );
        ensure!(
            features.ncols() == N_FEATURES,
            "expected {} feature columns, got {}",
            N_FEATURES,
            features.ncols()
        );
        ensure!(
            labels.iter().all(|&l| l < Outcome::N_CLASSES),
            "labels must be 0 or 1"
        );
        Ok(Self { features, labels })
    }

    pub fn len(&self) -> usize { self.labels.len() }

    pub fn is_empty(&self) -> bool { self.labels.is_empty() }

    pub fn features(&self) -> ArrayView2<'_, f64> { self.features.view() }

    pub fn labels(&self) -> &[usize] { &self.labels }

    pub fn outcomes(&self) -> Vec<Outcome> {
        self.labels.iter().map(|&l| Outcome::from_class(l)).collect()
    }

    /// Copy the given rows (in the given order) into a new Dataset.
    pub fn select(&self, rows: &[usize]) -> Self {
        Self {
            features: self.features.select(Axis(0), rows),
            labels:   rows.iter().map(|&r| self.labels[r]).collect(),
        }
    }

    pub fn positive_count(&self) -> usize {
        self.labels.iter().filter(|&&l| l == 1).count()
    }
}
