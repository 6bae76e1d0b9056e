use ndarray::{ArrayView1, ArrayView2};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// Candidate features drawn per split (at least this many are tried)
    pub max_features:      usize,
    /// Nodes with fewer samples become leaves
    pub min_samples_split: usize,
    /// None grows until leaves are pure
    pub max_depth:         Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// Class frequencies of the training samples that reached this leaf
    Leaf { proba: Vec<f64> },
    /// `x[feature] <= threshold` goes left, everything else right
    Split { feature: usize, threshold: f64, left: usize, right: usize },
}

/// CART classifier stored as a flat node arena; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes:     Vec<TreeNode>,
    n_classes: usize,
}

struct SplitCandidate {
    feature:   usize,
    threshold: f64,
    impurity:  f64,
}

impl DecisionTree {
    /// Grow a tree on the rows listed in `samples` (duplicates allowed,
    /// which is how bootstrap samples are passed in).
    pub fn fit<R: Rng>(
        x:         ArrayView2<'_, f64>,
        y:         &[usize],
        samples:   &mut [usize],
        n_classes: usize,
        params:    &TreeParams,
        rng:       &mut R,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new(), n_classes };
        tree.grow(x, y, samples, 0, params, rng);
        tree
    }

    pub fn n_nodes(&self) -> usize { self.nodes.len() }

    pub fn depth(&self) -> usize { self.depth_from(0) }

    /// Leaf class frequencies for one feature row.
    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { proba } => return proba,
                TreeNode::Split { feature, threshold, left, right } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    fn depth_from(&self, idx: usize) -> usize {
        match &self.nodes[idx] {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => {
                1 + self.depth_from(*left).max(self.depth_from(*right))
            }
        }
    }

    fn grow<R: Rng>(
        &mut self,
        x:       ArrayView2<'_, f64>,
        y:       &[usize],
        samples: &mut [usize],
        depth:   usize,
        params:  &TreeParams,
        rng:     &mut R,
    ) -> usize {
        let counts     = class_counts(y, samples, self.n_classes);
        let is_pure    = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let too_small  = samples.len() < params.min_samples_split.max(2);
        let too_deep   = params.max_depth.map_or(false, |d| depth >= d);

        if is_pure || too_small || too_deep {
            return self.push_leaf(&counts, samples.len());
        }

        let Some(split) = best_split(x, y, samples, &counts, params.max_features, rng) else {
            return self.push_leaf(&counts, samples.len());
        };

        // In-place partition: rows going left end up in samples[..mid]
        let mut mid = 0;
        for k in 0..samples.len() {
            if x[[samples[k], split.feature]] <= split.threshold {
                samples.swap(k, mid);
                mid += 1;
            }
        }

        let node = self.nodes.len();
        self.nodes.push(TreeNode::Leaf { proba: Vec::new() });

        let (left_rows, right_rows) = samples.split_at_mut(mid);
        let left  = self.grow(x, y, left_rows, depth + 1, params, rng);
        let right = self.grow(x, y, right_rows, depth + 1, params, rng);

        self.nodes[node] = TreeNode::Split {
            feature:   split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node
    }

    fn push_leaf(&mut self, counts: &[usize], n: usize) -> usize {
        let total = n.max(1) as f64;
        let proba = counts.iter().map(|&c| c as f64 / total).collect();
        self.nodes.push(TreeNode::Leaf { proba });
        self.nodes.len() - 1
    }
}

fn class_counts(y: &[usize], samples: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0; n_classes];
    for &i in samples {
        counts[y[i]] += 1;
    }
    counts
}

fn gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts.iter().map(|&c| (c as f64 / n).powi(2)).sum::<f64>()
}

/// Try `max_features` randomly ordered features; if none of them can
/// separate the samples, keep drawing until one does or all are used.
fn best_split<R: Rng>(
    x:            ArrayView2<'_, f64>,
    y:            &[usize],
    samples:      &[usize],
    counts:       &[usize],
    max_features: usize,
    rng:          &mut R,
) -> Option<SplitCandidate> {
    let mut features: Vec<usize> = (0..x.ncols()).collect();
    features.shuffle(rng);

    let mut best: Option<SplitCandidate> = None;
    for (visited, &feature) in features.iter().enumerate() {
        if visited >= max_features.max(1) && best.is_some() {
            break;
        }
        if let Some(candidate) = best_threshold(x, y, samples, counts, feature) {
            if best.as_ref().map_or(true, |b| candidate.impurity < b.impurity) {
                best = Some(candidate);
            }
        }
    }
    best
}

/// Scan sorted values of one feature and return the threshold with the
/// lowest weighted child gini. None if the feature is constant here.
fn best_threshold(
    x:       ArrayView2<'_, f64>,
    y:       &[usize],
    samples: &[usize],
    counts:  &[usize],
    feature: usize,
) -> Option<SplitCandidate> {
    let n = samples.len();
    let mut sorted: Vec<(f64, usize)> = samples
        .iter()
        .map(|&i| (x[[i, feature]], y[i]))
        .collect();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut left_counts  = vec![0usize; counts.len()];
    let mut right_counts = counts.to_vec();
    let mut best: Option<SplitCandidate> = None;

    for pos in 0..n.saturating_sub(1) {
        let (value, label) = sorted[pos];
        left_counts[label]  += 1;
        right_counts[label] -= 1;

        let next = sorted[pos + 1].0;
        if next <= value {
            continue;
        }

        let n_left   = pos + 1;
        let n_right  = n - n_left;
        let impurity = (n_left as f64 * gini(&left_counts, n_left)
            + n_right as f64 * gini(&right_counts, n_right))
            / n as f64;

        if best.as_ref().map_or(true, |b| impurity < b.impurity) {
            let mut threshold = value / 2.0 + next / 2.0;
            if threshold >= next {
                threshold = value;
            }
            best = Some(SplitCandidate { feature, threshold, impurity });
        }
    }
    best
}
