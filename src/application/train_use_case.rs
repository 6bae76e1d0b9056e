// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Ensure dataset on disk     (Layer 4 - data)
//   Step 2: Load the training CSV      (Layer 4 - data)
//   Step 3: Split train/test 80/20     (Layer 4 - data)
//   Step 4: Fit scaler on train only   (Layer 5 - ml)
//   Step 5: Scale training features    (Layer 5 - ml)
//   Step 6: Fit the random forest      (Layer 5 - ml)
//   Step 7: Score the test split       (Layer 6 - infra)
//   Step 8: Save artifacts + config    (Layer 6 - infra)
//
// Steps 3–7 are pure and live in `fit_pipeline`, so tests can run
// them on an in-memory Dataset without touching the filesystem.
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    dataset::Dataset,
    loader::TrainingCsvLoader,
    provider::{DatasetProvider, DEFAULT_DATASET_DIR, DEFAULT_DATASET_URL, DEFAULT_DATA_PATH},
    splitter::split_train_test,
};
use crate::infra::{artifact_store::ArtifactStore, metrics::EvaluationReport};
use crate::ml::{
    forest::{ForestConfig, RandomForest},
    scaler::StandardScaler,
    Classifier,
};
use crate::domain::patient::Outcome;

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything a training run depends on. Saved next to the artifacts
// as train_config.json so a run can be reproduced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_path:     String,
    pub dataset_dir:   String,
    pub dataset_url:   String,
    pub build_dir:     String,
    pub seed:          u64,
    pub test_fraction: f64,
    pub n_trees:       usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:     DEFAULT_DATA_PATH.to_string(),
            dataset_dir:   DEFAULT_DATASET_DIR.to_string(),
            dataset_url:   DEFAULT_DATASET_URL.to_string(),
            build_dir:     "build".to_string(),
            seed:          42,
            test_fraction: 0.2,
            n_trees:       100,
        }
    }
}

impl TrainConfig {
    pub fn provider(&self) -> DatasetProvider {
        DatasetProvider::new(&self.dataset_url, &self.dataset_dir, &self.data_path)
    }

    pub fn forest_config(&self) -> ForestConfig {
        ForestConfig::new(self.n_trees, self.seed)
    }
}

/// Scaler, forest and held-out score from one pass over a Dataset.
#[derive(Debug, Clone)]
pub struct FittedPipeline {
    pub scaler:  StandardScaler,
    pub model:   RandomForest,
    pub report:  EvaluationReport,
    pub n_train: usize,
    pub n_test:  usize,
}

/// Split, scale, fit and evaluate. The scaler only ever sees
/// training rows; test rows are transformed with it afterwards.
pub fn fit_pipeline(dataset: &Dataset, cfg: &TrainConfig) -> Result<FittedPipeline> {
    ensure!(
        (0.0..1.0).contains(&cfg.test_fraction),
        "test_fraction must be in [0, 1), got {}",
        cfg.test_fraction
    );

    let indices: Vec<usize> = (0..dataset.len()).collect();
    let (train_idx, test_idx) = split_train_test(indices, cfg.test_fraction, cfg.seed);
    ensure!(!train_idx.is_empty(), "training split is empty");

    let train = dataset.select(&train_idx);
    let test  = dataset.select(&test_idx);
    tracing::info!(
        "Split: {} train, {} test ({} positive in train)",
        train.len(),
        test.len(),
        train.positive_count()
    );

    let scaler       = StandardScaler::fit(train.features())?;
    let train_scaled = scaler.transform(train.features())?;

    tracing::info!("Fitting random forest with {} trees (seed {})", cfg.n_trees, cfg.seed);
    let model = RandomForest::fit(train_scaled.view(), train.labels(), cfg.forest_config())?;

    let test_scaled = scaler.transform(test.features())?;
    let predicted: Vec<Outcome> = model
        .predict(test_scaled.view())?
        .into_iter()
        .map(Outcome::from_class)
        .collect();
    let report = EvaluationReport::from_predictions(&predicted, &test.outcomes());

    Ok(FittedPipeline {
        scaler,
        model,
        report,
        n_train: train.len(),
        n_test:  test.len(),
    })
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<FittedPipeline> {
        let cfg = &self.config;

        // ── Step 1: Make sure the CSV exists ─────────────────────────────────
        let data_path = cfg.provider().ensure()?;

        // ── Step 2: Load rows positionally ───────────────────────────────────
        let dataset = TrainingCsvLoader::new(&data_path).load()?;

        // ── Steps 3–7: Split, scale, fit, evaluate ───────────────────────────
        let fitted = fit_pipeline(&dataset, cfg)?;
        fitted.report.log();

        // ── Step 8: Persist (overwrites previous artifacts) ──────────────────
        let store = ArtifactStore::new(&cfg.build_dir);
        store.save_model(&fitted.model)?;
        store.save_scaler(&fitted.scaler)?;
        store.save_config(cfg)?;
        store.save_report(&fitted.report)?;
        tracing::info!(
            "Artifacts saved to '{}' and '{}'",
            store.model_path().display(),
            store.scaler_path().display()
        );

        Ok(fitted)
    }
}

/// Download and unpack the dataset if it is not already present.
pub fn fetch_dataset(cfg: &TrainConfig) -> Result<PathBuf> {
    cfg.provider().ensure()
}
