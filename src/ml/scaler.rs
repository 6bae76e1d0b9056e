// ============================================================
// Layer 5 — Standard Scaler
// ============================================================
// z = (x - mean) / std, per feature column.
//
// mean and std are computed on the TRAINING split only and are
// never refitted: the test split, HTTP requests and batch files
// are all transformed with the stored values.
//
// std is the population standard deviation (divide by n). A
// column with zero spread gets std = 1.0 so it is centred but
// never divided by zero.

use anyhow::{ensure, Result};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean:           Vec<f64>,
    scale:          Vec<f64>,
    n_samples_seen: usize,
}

impl StandardScaler {
    /// Learn per-column mean and standard deviation.
    pub fn fit(x: ArrayView2<'_, f64>) -> Result<Self> {
        let n = x.nrows();
        ensure!(n > 0, "cannot fit a scaler on zero rows");

        let mut mean  = Vec::with_capacity(x.ncols());
        let mut scale = Vec::with_capacity(x.ncols());

        for column in x.columns() {
            let m   = column.sum() / n as f64;
            let var = column.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / n as f64;
            let std = var.sqrt();

            mean.push(m);
            scale.push(if std > f64::EPSILON { std } else { 1.0 });
        }

        tracing::debug!("Scaler fitted on {} rows: mean={:?}", n, mean);
        Ok(Self { mean, scale, n_samples_seen: n })
    }

    /// Apply the stored transform. Column count must match the fit.
    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        ensure!(
            x.ncols() == self.n_features(),
            "scaler expects {} features, got {}",
            self.n_features(),
            x.ncols()
        );

        let mut out = x.to_owned();
        for mut row in out.rows_mut() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = (*v - self.mean[j]) / self.scale[j];
            }
        }
        Ok(out)
    }

    pub fn n_features(&self) -> usize { self.mean.len() }

    pub fn mean(&self) -> &[f64] { &self.mean }

    pub fn scale(&self) -> &[f64] { &self.scale }

    pub fn n_samples_seen(&self) -> usize { self.n_samples_seen }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Axis};

    #[test]
    fn test_fit_learns_mean_and_population_std() {
        let x = array![[1.0, 10.0], [3.0, 10.0], [5.0, 10.0], [7.0, 10.0]];
        let s = StandardScaler::fit(x.view()).unwrap();

        assert_eq!(s.mean(), &[4.0, 10.0]);
        // population variance of 1,3,5,7 = 5
        assert!((s.scale()[0] - 5.0_f64.sqrt()).abs() < 1e-12);
        // constant column → scale 1
        assert_eq!(s.scale()[1], 1.0);
        assert_eq!(s.n_samples_seen(), 4);
    }

    #[test]
    fn test_transformed_training_data_is_standardised() {
        let x = array![[1.0, 200.0], [2.0, 100.0], [3.0, 300.0], [6.0, 0.0]];
        let s = StandardScaler::fit(x.view()).unwrap();
        let z = s.transform(x.view()).unwrap();

        for column in z.axis_iter(Axis(1)) {
            let n    = column.len() as f64;
            let mean = column.sum() / n;
            let var  = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            assert!(mean.abs() < 1e-12);
            assert!((var - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_constant_column_is_centred() {
        let x = array![[4.0], [4.0]];
        let s = StandardScaler::fit(x.view()).unwrap();
        let z = s.transform(array![[4.0], [6.0]].view()).unwrap();
        assert_eq!(z, array![[0.0], [2.0]]);
    }

    #[test]
    fn test_transform_does_not_refit() {
        let s = StandardScaler::fit(array![[0.0], [2.0]].view()).unwrap();
        let z = s.transform(array![[100.0]].view()).unwrap();
        // mean 1, std 1 from the fit, not from the new data
        assert_eq!(z, array![[99.0]]);
    }

    #[test]
    fn test_rejects_wrong_width() {
        let s = StandardScaler::fit(array![[1.0, 2.0]].view()).unwrap();
        assert!(s.transform(array![[1.0, 2.0, 3.0]].view()).is_err());
    }

    #[test]
    fn test_rejects_empty_fit() {
        let x: Array2<f64> = Array2::zeros((0, 3));
        assert!(StandardScaler::fit(x.view()).is_err());
    }
}
