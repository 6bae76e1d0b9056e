// Shared fixtures for unit tests: seeded synthetic patients with
// Pima-like value ranges, and small fitted services.

use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::{fs::File, io::Write, path::Path};

use crate::application::predict_use_case::PredictionService;
use crate::application::train_use_case::{fit_pipeline, TrainConfig};
use crate::data::dataset::Dataset;
use crate::domain::patient::{PatientRecord, FEATURE_COLUMNS, N_FEATURES, OUTCOME_COLUMN};

/// One synthetic patient row plus its label. Glucose, BMI and age
/// push the label towards positive, with noise so classes overlap.
fn synthetic_row(rng: &mut ChaCha8Rng) -> ([f64; N_FEATURES], usize) {
    let pregnancies = rng.gen_range(0..12) as f64;
    let glucose     = rng.gen_range(70.0..200.0_f64).round();
    let pressure    = rng.gen_range(50.0..100.0_f64).round();
    let skin        = rng.gen_range(0.0..50.0_f64).round();
    let insulin     = rng.gen_range(0.0..300.0_f64).round();
    let bmi         = (rng.gen_range(18.0..50.0_f64) * 10.0).round() / 10.0;
    let pedigree    = (rng.gen_range(0.08..2.0_f64) * 1000.0).round() / 1000.0;
    let age         = rng.gen_range(21..70) as f64;

    let score = (glucose - 120.0) / 30.0
        + (bmi - 32.0) / 7.0
        + (age - 35.0) / 15.0
        + rng.gen_range(-1.0..1.0);
    let label = usize::from(score > 0.5);

    ([pregnancies, glucose, pressure, skin, insulin, bmi, pedigree, age], label)
}

pub fn synthetic_dataset(n: usize, seed: u64) -> Dataset {
    let mut rng    = ChaCha8Rng::seed_from_u64(seed);
    let mut values = Vec::with_capacity(n * N_FEATURES);
    let mut labels = Vec::with_capacity(n);

    for _ in 0..n {
        let (row, label) = synthetic_row(&mut rng);
        values.extend_from_slice(&row);
        labels.push(label);
    }

    let features = Array2::from_shape_vec((n, N_FEATURES), values).unwrap();
    Dataset::new(features, labels).unwrap()
}

/// Write a headed 9-column training CSV of synthetic patients.
pub fn write_training_csv(path: &Path, n: usize, seed: u64) {
    let ds    = synthetic_dataset(n, seed);
    let mut f = File::create(path).unwrap();

    writeln!(f, "{},{}", FEATURE_COLUMNS.join(","), OUTCOME_COLUMN).unwrap();
    for (row, label) in ds.features().rows().into_iter().zip(ds.labels()) {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(f, "{},{}", cells.join(","), label).unwrap();
    }
}

/// The example patient used in the service's usage notes.
pub fn example_patient() -> PatientRecord {
    PatientRecord {
        pregnancies:                5,
        glucose:                    120.0,
        blood_pressure:             72.0,
        skin_thickness:             23.0,
        insulin:                    84.0,
        bmi:                        32.1,
        diabetes_pedigree_function: 0.25,
        age:                        30,
    }
}

/// Training config small enough for unit tests.
pub fn small_train_config(dir: &Path) -> TrainConfig {
    TrainConfig {
        data_path:   dir.join("diabetes.csv").display().to_string(),
        dataset_dir: dir.display().to_string(),
        build_dir:   dir.join("build").display().to_string(),
        n_trees:     20,
        ..TrainConfig::default()
    }
}

/// A PredictionService fitted in memory on synthetic data.
pub fn trained_service() -> PredictionService {
    let ds  = synthetic_dataset(300, 42);
    let cfg = TrainConfig { n_trees: 20, ..TrainConfig::default() };
    let fitted = fit_pipeline(&ds, &cfg).unwrap();
    PredictionService::new(fitted.model, fitted.scaler)
}
