// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Saves and restores everything `train` produces.
//
// File layout (all inside the build directory):
//   build/
//     diabetes_model.bin   ← RandomForest, bincode
//     scaler.bin           ← StandardScaler, bincode
//     train_config.json    ← TrainConfig used for the run
//     metrics.json         ← EvaluationReport on the test split
//
// bincode writes f64 values bit-for-bit, so a loaded forest and
// scaler give exactly the predictions they gave before saving.
//
// Every save overwrites the previous file; there is no versioning.
//
// Reference: bincode / serde_json crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::domain::traits::Persistable;
use crate::infra::metrics::EvaluationReport;
use crate::ml::{forest::RandomForest, scaler::StandardScaler};

pub const MODEL_FILE:   &str = "diabetes_model.bin";
pub const SCALER_FILE:  &str = "scaler.bin";
pub const CONFIG_FILE:  &str = "train_config.json";
pub const METRICS_FILE: &str = "metrics.json";

/// Reads and writes training artifacts in one directory.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path { &self.dir }

    pub fn model_path(&self) -> PathBuf { self.dir.join(MODEL_FILE) }

    pub fn scaler_path(&self) -> PathBuf { self.dir.join(SCALER_FILE) }

    pub fn save_model(&self, model: &RandomForest) -> Result<()> {
        self.ensure_dir()?;
        model.save(&self.model_path())
    }

    pub fn save_scaler(&self, scaler: &StandardScaler) -> Result<()> {
        self.ensure_dir()?;
        scaler.save(&self.scaler_path())
    }

    pub fn load_model(&self) -> Result<RandomForest> {
        RandomForest::load(&self.model_path())
            .context("Cannot load model. Have you run 'train' first?")
    }

    pub fn load_scaler(&self) -> Result<StandardScaler> {
        StandardScaler::load(&self.scaler_path())
            .context("Cannot load scaler. Have you run 'train' first?")
    }

    /// Save the training configuration next to the artifacts.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        self.write_json(CONFIG_FILE, cfg)
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(CONFIG_FILE);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Save the held-out evaluation report.
    pub fn save_report(&self, report: &EvaluationReport) -> Result<()> {
        self.write_json(METRICS_FILE, report)
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        self.ensure_dir()?;
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        tracing::debug!("Saved '{}'", path.display());
        Ok(())
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create build directory '{}'", self.dir.display()))
    }
}

// ─── Persistable implementations ──────────────────────────────────────────────
impl Persistable for RandomForest {
    fn save(&self, path: &Path) -> Result<()> {
        write_binary(path, self)
    }

    fn load(path: &Path) -> Result<Self> {
        read_binary(path)
    }
}

impl Persistable for StandardScaler {
    fn save(&self, path: &Path) -> Result<()> {
        write_binary(path, self)
    }

    fn load(path: &Path) -> Result<Self> {
        read_binary(path)
    }
}

fn write_binary<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Cannot create '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, value)
        .with_context(|| format!("Cannot serialise '{}'", path.display()))?;
    writer.flush()?;
    tracing::debug!("Saved '{}'", path.display());
    Ok(())
}

fn read_binary<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)
        .with_context(|| format!("Cannot open '{}'", path.display()))?;
    bincode::deserialize_from(BufReader::new(file))
        .with_context(|| format!("Cannot deserialise '{}'", path.display()))
}
