// ============================================================
// Layer 5 — Random Forest Classifier
// ============================================================
// An ensemble of CART trees, each grown on its own bootstrap
// sample (n rows drawn with replacement) and considering a
// random subset of sqrt(n_features) features at every split.
//
// predict_proba averages the leaf class frequencies of all
// trees; predict is the argmax of that average.
//
// Determinism:
//   A master ChaCha8 RNG seeded from ForestConfig::seed hands
//   one u64 seed to each tree, and each tree owns its RNG. The
//   same (data, config) therefore always gives the same forest.
//
// Reference: Breiman (2001) Random Forests

use anyhow::{ensure, Result};
use ndarray::{Array2, ArrayView2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::ml::tree::{DecisionTree, TreeParams};
use crate::ml::Classifier;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_trees:           usize,
    pub seed:              u64,
    pub max_depth:         Option<usize>,
    pub min_samples_split: usize,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees:           100,
            seed:              42,
            max_depth:         None,
            min_samples_split: 2,
        }
    }
}

impl ForestConfig {
    pub fn new(n_trees: usize, seed: u64) -> Self {
        Self { n_trees, seed, ..Self::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees:      Vec<DecisionTree>,
    n_features: usize,
    n_classes:  usize,
    config:     ForestConfig,
}

impl RandomForest {
    /// Fit `config.n_trees` trees on (x, y). Labels are class indices.
    pub fn fit(x: ArrayView2<'_, f64>, y: &[usize], config: ForestConfig) -> Result<Self> {
        let n_rows = x.nrows();
        ensure!(n_rows > 0, "cannot fit a forest on zero rows");
        ensure!(n_rows == y.len(), "x has {} rows but y has {} labels", n_rows, y.len());
        ensure!(config.n_trees > 0, "n_trees must be at least 1");

        let n_features = x.ncols();
        let n_classes  = y.iter().copied().max().unwrap_or(0).max(1) + 1;
        let params     = TreeParams {
            max_features:      ((n_features as f64).sqrt() as usize).max(1),
            min_samples_split: config.min_samples_split,
            max_depth:         config.max_depth,
        };

        let mut master = ChaCha8Rng::seed_from_u64(config.seed);
        let trees: Vec<DecisionTree> = (0..config.n_trees)
            .map(|_| {
                let mut rng = ChaCha8Rng::seed_from_u64(master.gen());
                let mut bootstrap: Vec<usize> = (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect();
                DecisionTree::fit(x, y, &mut bootstrap, n_classes, &params, &mut rng)
            })
            .collect();

        tracing::debug!(
            "Forest fitted: {} trees, max_features={}, mean depth={:.1}",
            trees.len(),
            params.max_features,
            trees.iter().map(DecisionTree::depth).sum::<usize>() as f64 / trees.len() as f64,
        );

        Ok(Self { trees, n_features, n_classes, config })
    }

    pub fn n_trees(&self) -> usize { self.trees.len() }

    pub fn n_classes(&self) -> usize { self.n_classes }

    pub fn config(&self) -> &ForestConfig { &self.config }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        ensure!(
            x.ncols() == self.n_features,
            "model expects {} features, got {}",
            self.n_features,
            x.ncols()
        );

        let n_trees   = self.trees.len() as f64;
        let mut proba = Array2::<f64>::zeros((x.nrows(), self.n_classes));

        for (row, mut out) in x.rows().into_iter().zip(proba.rows_mut()) {
            for tree in &self.trees {
                for (c, p) in tree.predict_row(row).iter().enumerate() {
                    out[c] += p;
                }
            }
            out.mapv_inplace(|v| v / n_trees);
        }
        Ok(proba)
    }
}
