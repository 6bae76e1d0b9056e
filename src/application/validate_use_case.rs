// ============================================================
// Layer 2 — ValidateUseCase
// ============================================================
// Scores a CSV of new patients with the saved artifacts:
//
//   Step 1: Load model + scaler      (hard failure if missing)
//   Step 2: Read the input CSV       (hard failure if missing)
//   Step 3: Check required columns   (fail before any output)
//   Step 4: Scale + predict          (same path as the service)
//   Step 5: Write input + 3 columns  (stdout or --output)
//
// Appended columns:
//   Predicted_Outcome, Probability_Diabetes (1),
//   Probability_No_Diabetes (0)

use anyhow::{Context, Result};
use csv::StringRecord;
use std::{fs::File, io::Write, path::Path};

use crate::application::predict_use_case::PredictionService;
use crate::data::loader::BatchTable;
use crate::domain::prediction::Prediction;
use crate::infra::artifact_store::ArtifactStore;

pub const PREDICTED_COLUMN:   &str = "Predicted_Outcome";
pub const PROB_YES_COLUMN:    &str = "Probability_Diabetes (1)";
pub const PROB_NO_COLUMN:     &str = "Probability_No_Diabetes (0)";

#[derive(Debug, Clone)]
pub struct ValidateConfig {
    pub input_path:  String,
    pub build_dir:   String,
    /// None writes to stdout
    pub output_path: Option<String>,
}

impl Default for ValidateConfig {
    fn default() -> Self {
        Self {
            input_path:  "tests/data.csv".to_string(),
            build_dir:   "build".to_string(),
            output_path: None,
        }
    }
}

pub struct ValidateUseCase {
    config: ValidateConfig,
}

impl ValidateUseCase {
    pub fn new(config: ValidateConfig) -> Self {
        Self { config }
    }

    /// Returns the number of rows scored.
    pub fn execute(&self) -> Result<usize> {
        match &self.config.output_path {
            Some(path) => {
                // scored before the file is created, so a failed run leaves no output
                let (table, predictions) = self.score()?;
                let file = File::create(path)
                    .with_context(|| format!("Cannot create output file '{}'", path))?;
                write_augmented(file, &table, &predictions)?;
                tracing::info!("Predictions written to '{}'", path);
                Ok(predictions.len())
            }
            // stdout carries only the table; logs go to stderr
            None => self.execute_to(std::io::stdout().lock()),
        }
    }

    /// Score the input and write the augmented table to `sink`.
    pub fn execute_to<W: Write>(&self, sink: W) -> Result<usize> {
        let (table, predictions) = self.score()?;
        write_augmented(sink, &table, &predictions)?;
        Ok(predictions.len())
    }

    fn score(&self) -> Result<(BatchTable, Vec<Prediction>)> {
        let cfg = &self.config;

        let service = PredictionService::load_strict(&ArtifactStore::new(&cfg.build_dir))?;
        tracing::info!("Model and scaler loaded successfully.");

        let table = BatchTable::read(Path::new(&cfg.input_path))?;
        tracing::info!("Loaded {} rows from '{}'", table.len(), cfg.input_path);

        let features    = table.feature_matrix()?;
        let predictions = service.predict_batch(features.view())?;
        Ok((table, predictions))
    }
}

/// Write every input column followed by the prediction columns.
pub fn write_augmented<W: Write>(out: W, table: &BatchTable, predictions: &[Prediction]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = table.headers().clone();
    header.push_field(PREDICTED_COLUMN);
    header.push_field(PROB_YES_COLUMN);
    header.push_field(PROB_NO_COLUMN);
    writer.write_record(&header)?;

    for (row, p) in table.rows().iter().zip(predictions) {
        let mut record: StringRecord = row.clone();
        record.push_field(&p.outcome().class_index().to_string());
        record.push_field(&p.diabetes_probability.to_string());
        record.push_field(&p.no_diabetes_probability.to_string());
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainUseCase;
    use crate::test_support::{small_train_config, write_training_csv};
    use std::fs;

    const BATCH: &str = "\
Pregnancies,Glucose,BloodPressure,SkinThickness,Insulin,BMI,DiabetesPedigreeFunction,Age,Outcome
6,148,72,35,0,33.6,0.627,50,1
1,85,66,29,0,26.6,0.351,31,0
8,183,64,0,0,23.3,0.672,32,1
";

    fn trained_build_dir(dir: &Path) -> String {
        let cfg = small_train_config(dir);
        write_training_csv(Path::new(&cfg.data_path), 150, 21);
        TrainUseCase::new(cfg.clone()).execute().unwrap();
        cfg.build_dir
    }

    #[test]
    fn test_writes_three_extra_columns() {
        let dir    = tempfile::tempdir().unwrap();
        let build  = trained_build_dir(dir.path());
        let input  = dir.path().join("data.csv");
        let output = dir.path().join("out.csv");
        fs::write(&input, BATCH).unwrap();

        let cfg = ValidateConfig {
            input_path:  input.display().to_string(),
            build_dir:   build,
            output_path: Some(output.display().to_string()),
        };
        assert_eq!(ValidateUseCase::new(cfg).execute().unwrap(), 3);

        let mut reader = csv::Reader::from_path(&output).unwrap();
        let headers    = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 12);
        assert_eq!(&headers[9],  PREDICTED_COLUMN);
        assert_eq!(&headers[10], PROB_YES_COLUMN);
        assert_eq!(&headers[11], PROB_NO_COLUMN);

        for record in reader.records() {
            let record = record.unwrap();
            let yes: f64 = record[10].parse().unwrap();
            let no:  f64 = record[11].parse().unwrap();
            assert!((yes + no - 1.0).abs() < 1e-9);
            assert_eq!(&record[9], if yes > no { "1" } else { "0" });
        }
    }

    #[test]
    fn test_missing_glucose_fails_without_output() {
        let dir    = tempfile::tempdir().unwrap();
        let build  = trained_build_dir(dir.path());
        let input  = dir.path().join("data.csv");
        let output = dir.path().join("out.csv");
        fs::write(
            &input,
            "Pregnancies,BloodPressure,SkinThickness,Insulin,BMI,DiabetesPedigreeFunction,Age\n\
             6,72,35,0,33.6,0.627,50\n",
        )
        .unwrap();

        let cfg = ValidateConfig {
            input_path:  input.display().to_string(),
            build_dir:   build,
            output_path: Some(output.display().to_string()),
        };
        let err = ValidateUseCase::new(cfg).execute().unwrap_err();

        assert!(err.to_string().contains("Glucose"), "{err}");
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_artifacts_is_hard_failure() {
        let dir   = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.csv");
        fs::write(&input, BATCH).unwrap();

        let cfg = ValidateConfig {
            input_path:  input.display().to_string(),
            build_dir:   dir.path().join("build").display().to_string(),
            output_path: None,
        };
        let err = ValidateUseCase::new(cfg).execute().unwrap_err();
        assert!(format!("{err:#}").contains("Have you run 'train' first?"));
    }

    #[test]
    fn test_missing_input_file_is_named() {
        let dir   = tempfile::tempdir().unwrap();
        let build = trained_build_dir(dir.path());

        let cfg = ValidateConfig {
            input_path:  dir.path().join("nope.csv").display().to_string(),
            build_dir:   build,
            output_path: None,
        };
        let err = ValidateUseCase::new(cfg).execute().unwrap_err();
        assert!(err.to_string().contains("nope.csv"));
    }

    #[test]
    fn test_sink_receives_only_csv_records() {
        let dir   = tempfile::tempdir().unwrap();
        let build = trained_build_dir(dir.path());
        let input = dir.path().join("data.csv");
        fs::write(&input, BATCH).unwrap();

        let cfg = ValidateConfig {
            input_path:  input.display().to_string(),
            build_dir:   build,
            output_path: None,
        };
        let mut sink = Vec::new();
        let scored   = ValidateUseCase::new(cfg).execute_to(&mut sink).unwrap();
        assert_eq!(scored, 3);

        let text  = String::from_utf8(sink).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Pregnancies,Glucose,"));
        assert!(!text.contains("INFO") && !text.contains('\u{1b}'));

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        for record in reader.records() {
            assert_eq!(record.unwrap().len(), 12);
        }
    }

    #[test]
    fn test_write_augmented_keeps_extra_columns() {
        let table = BatchTable::from_parts(
            StringRecord::from(vec!["id", "Glucose"]),
            vec![StringRecord::from(vec!["p1", "148"])],
        );
        let pred = Prediction::new(crate::domain::patient::Outcome::Positive, 0.25, 0.75);

        let mut buf = Vec::new();
        write_augmented(&mut buf, &table, &[pred]).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "id,Glucose,Predicted_Outcome,Probability_Diabetes (1),Probability_No_Diabetes (0)\n\
             p1,148,1,0.75,0.25\n"
        );
    }
}
