// ============================================================
// Layer 6 — Evaluation Metrics
// ============================================================
// Scores the forest on the held-out test split after training.
//
// Metrics recorded (positive class = has diabetes):
//   - accuracy:    (TP + TN) / total
//   - precision:   TP / (TP + FP)
//   - recall:      TP / (TP + FN)
//   - specificity: TN / (TN + FP)
//   - f1:          harmonic mean of precision and recall
//
// Any ratio with a zero denominator is reported as 0.0.
//
// Output file: build/metrics.json
//
// Example:
//   {
//     "n_samples": 154,
//     "confusion": {"tp": 36, "tn": 83, "fp": 16, "fn_": 19},
//     "accuracy": 0.772727, ...
//   }

use serde::{Deserialize, Serialize};

use crate::domain::patient::Outcome;

/// Binary confusion matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub tp:  usize,
    pub tn:  usize,
    pub fp:  usize,
    pub fn_: usize,
}

impl ConfusionMatrix {
    /// Pairs predictions with ground truth; extra elements of the
    /// longer slice are ignored.
    pub fn from_predictions(predicted: &[Outcome], actual: &[Outcome]) -> Self {
        let mut m = Self::default();
        for (pred, truth) in predicted.iter().zip(actual) {
            match (pred, truth) {
                (Outcome::Positive, Outcome::Positive) => m.tp  += 1,
                (Outcome::Negative, Outcome::Negative) => m.tn  += 1,
                (Outcome::Positive, Outcome::Negative) => m.fp  += 1,
                (Outcome::Negative, Outcome::Positive) => m.fn_ += 1,
            }
        }
        m
    }

    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.tp + self.tn, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_)
    }

    pub fn specificity(&self) -> f64 {
        ratio(self.tn, self.tn + self.fp)
    }

    pub fn f1_score(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 { 0.0 } else { 2.0 * p * r / (p + r) }
    }
}

fn ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 { 0.0 } else { num as f64 / denom as f64 }
}

/// Held-out evaluation of one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub n_samples:   usize,
    pub confusion:   ConfusionMatrix,
    pub accuracy:    f64,
    pub precision:   f64,
    pub recall:      f64,
    pub specificity: f64,
    pub f1:          f64,
}

impl EvaluationReport {
    pub fn from_predictions(predicted: &[Outcome], actual: &[Outcome]) -> Self {
        let confusion = ConfusionMatrix::from_predictions(predicted, actual);
        Self {
            n_samples:   confusion.total(),
            confusion,
            accuracy:    confusion.accuracy(),
            precision:   confusion.precision(),
            recall:      confusion.recall(),
            specificity: confusion.specificity(),
            f1:          confusion.f1_score(),
        }
    }

    pub fn log(&self) {
        tracing::info!(
            "Held-out evaluation on {} rows | accuracy={:.3} precision={:.3} recall={:.3} specificity={:.3} f1={:.3}",
            self.n_samples,
            self.accuracy,
            self.precision,
            self.recall,
            self.specificity,
            self.f1,
        );
        tracing::debug!("Confusion matrix: {:?}", self.confusion);
    }
}
