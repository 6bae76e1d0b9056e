// ============================================================
// Layer 4 — Dataset Provider
// ============================================================
// Makes sure the training CSV exists locally.
//
//   csv present?  ── yes ──▶ no-op
//        │
//        no
//        ▼
//   download archive  → <dataset_dir>/pima.zip   (any failure aborts)
//   extract archive   → <dataset_dir>/
//   csv present now?  ── no ──▶ error, archive kept for inspection
//        │
//        yes
//        ▼
//   delete archive
//
// There is no retry: a failed download is reported and the
// caller (fetch or train) stops.

use anyhow::{bail, Context, Result};
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

/// Kaggle download endpoint for the Pima Indians Diabetes Database
pub const DEFAULT_DATASET_URL: &str =
    "https://www.kaggle.com/api/v1/datasets/download/uciml/pima-indians-diabetes-database";

pub const DEFAULT_DATASET_DIR: &str = "data/dataset";

pub const DEFAULT_DATA_PATH: &str = "data/dataset/diabetes.csv";

const ARCHIVE_NAME: &str = "pima.zip";

pub struct DatasetProvider {
    url:         String,
    dataset_dir: PathBuf,
    csv_path:    PathBuf,
}

impl DatasetProvider {
    pub fn new(
        url:         impl Into<String>,
        dataset_dir: impl Into<PathBuf>,
        csv_path:    impl Into<PathBuf>,
    ) -> Self {
        Self {
            url:         url.into(),
            dataset_dir: dataset_dir.into(),
            csv_path:    csv_path.into(),
        }
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// Ensure the CSV exists, downloading and extracting it if needed.
    /// Returns the CSV path.
    pub fn ensure(&self) -> Result<PathBuf> {
        if self.csv_path.exists() {
            tracing::debug!("Dataset already present at '{}'", self.csv_path.display());
            return Ok(self.csv_path.clone());
        }

        fs::create_dir_all(&self.dataset_dir).with_context(|| {
            format!("Cannot create dataset directory '{}'", self.dataset_dir.display())
        })?;

        let archive_path = self.dataset_dir.join(ARCHIVE_NAME);
        download_file(&self.url, &archive_path)?;

        let extracted = extract_zip(&archive_path, &self.dataset_dir)?;
        tracing::info!("Extracted {} files into '{}'", extracted, self.dataset_dir.display());

        if !self.csv_path.exists() {
            bail!(
                "Archive '{}' did not contain '{}'",
                archive_path.display(),
                self.csv_path.display()
            );
        }

        fs::remove_file(&archive_path)
            .with_context(|| format!("Cannot remove archive '{}'", archive_path.display()))?;
        tracing::info!("Zip file removed. Dataset ready at '{}'", self.csv_path.display());

        Ok(self.csv_path.clone())
    }
}

fn download_file(url: &str, output_path: &Path) -> Result<()> {
    tracing::info!("Downloading dataset from: {}", url);

    let response = reqwest::blocking::Client::builder()
        .build()?
        .get(url)
        .send()
        .with_context(|| format!("Failed to fetch dataset archive from '{url}'"))?;

    if !response.status().is_success() {
        bail!("Dataset download failed with status: {}", response.status());
    }

    let content = response.bytes().context("Failed to read dataset archive")?;
    fs::write(output_path, &content)
        .with_context(|| format!("Cannot write archive to '{}'", output_path.display()))?;

    tracing::info!("Downloaded {} bytes to '{}'", content.len(), output_path.display());
    Ok(())
}

/// Unpack every entry of a ZIP archive into `output_dir`.
/// Entries whose names would escape `output_dir` are skipped.
pub fn extract_zip(archive_path: &Path, output_dir: &Path) -> Result<usize> {
    let file = File::open(archive_path)
        .with_context(|| format!("Cannot open archive '{}'", archive_path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("'{}' is not a valid ZIP archive", archive_path.display()))?;

    let mut extracted = 0usize;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        let Some(relative) = entry.enclosed_name().map(Path::to_path_buf) else {
            tracing::warn!("Skipping unsafe archive entry '{}'", entry.name());
            continue;
        };
        let outpath = output_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath)?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut outfile = File::create(&outpath)
            .with_context(|| format!("Cannot create '{}'", outpath.display()))?;
        std::io::copy(&mut entry, &mut outfile)?;
        extracted += 1;
    }

    Ok(extracted)
}
