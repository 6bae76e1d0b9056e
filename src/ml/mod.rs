// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// All ndarray-level numeric code lives here.
//
//   scaler.rs — StandardScaler
//               Per-feature z-score: (x - mean) / std, with
//               mean and std learned from the training split
//
//   tree.rs   — DecisionTree
//               CART classifier, gini impurity, midpoint
//               thresholds, leaf class frequencies
//
//   forest.rs — RandomForest
//               Bagged ensemble of DecisionTrees with random
//               feature subsets; probabilities are the mean of
//               the trees' leaf frequencies
//
// Reference: Breiman (2001) Random Forests
//            Breiman et al. (1984) Classification and Regression Trees

use anyhow::Result;
use ndarray::{Array2, ArrayView1, ArrayView2};

/// Standard (z-score) feature scaling
pub mod scaler;

/// Single CART decision tree
pub mod tree;

/// Bagged random forest built from `tree`
pub mod forest;

// ─── Classifier ───────────────────────────────────────────────────────────────
/// A fitted probabilistic classifier over dense feature rows.
pub trait Classifier {
    /// Number of input columns the model was fitted on
    fn n_features(&self) -> usize;

    /// Class probabilities, shape [n_rows, n_classes]; each row sums to 1.
    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>>;

    /// Class index per row: the argmax of `predict_proba`.
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Vec<usize>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.rows().into_iter().map(argmax).collect())
    }
}

/// Index of the largest value; the first one wins ties.
pub fn argmax(row: ArrayView1<'_, f64>) -> usize {
    let mut best = 0;
    for (i, &v) in row.iter().enumerate() {
        if v > row[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_argmax_picks_largest() {
        assert_eq!(argmax(array![0.2, 0.8].view()), 1);
        assert_eq!(argmax(array![0.9, 0.1].view()), 0);
    }

    #[test]
    fn test_argmax_tie_goes_to_first_class() {
        assert_eq!(argmax(array![0.5, 0.5].view()), 0);
    }
}
