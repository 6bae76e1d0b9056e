// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the four subcommands: `fetch`, `train`, `serve` and
// `validate`, and all their configurable flags.
//
// `serve` flags can also be set through DIABETES_* environment
// variables so the service can be configured in a container.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::{train_use_case::TrainConfig, validate_use_case::ValidateConfig};
use crate::data::provider::{DEFAULT_DATASET_DIR, DEFAULT_DATASET_URL, DEFAULT_DATA_PATH};
use crate::server::ServeConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download and unpack the training dataset if it is missing
    Fetch(FetchArgs),

    /// Train the random forest and save model + scaler artifacts
    Train(TrainArgs),

    /// Serve predictions over HTTP using the saved artifacts
    Serve(ServeArgs),

    /// Score a CSV of new patients with the saved artifacts
    Validate(ValidateArgs),
}

/// Where the dataset lives and where to get it from
#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// Training CSV (8 features + Outcome)
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    pub data_path: String,

    /// Directory the downloaded archive is extracted into
    #[arg(long, default_value = DEFAULT_DATASET_DIR)]
    pub dataset_dir: String,

    /// Archive URL used when the CSV is missing
    #[arg(long, default_value = DEFAULT_DATASET_URL)]
    pub dataset_url: String,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Directory the model and scaler are written to
    #[arg(long, default_value = "build")]
    pub build_dir: String,

    /// Seed for the train/test split and the forest
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Share of rows held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Number of trees in the forest
    #[arg(long, default_value_t = 100)]
    pub n_trees: usize,
}

impl From<FetchArgs> for TrainConfig {
    fn from(a: FetchArgs) -> Self {
        TrainConfig {
            data_path:   a.dataset.data_path,
            dataset_dir: a.dataset.dataset_dir,
            dataset_url: a.dataset.dataset_url,
            ..TrainConfig::default()
        }
    }
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_path:     a.dataset.data_path,
            dataset_dir:   a.dataset.dataset_dir,
            dataset_url:   a.dataset.dataset_url,
            build_dir:     a.build_dir,
            seed:          a.seed,
            test_fraction: a.test_fraction,
            n_trees:       a.n_trees,
        }
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "DIABETES_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "DIABETES_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Directory holding diabetes_model.bin and scaler.bin
    #[arg(long, env = "DIABETES_BUILD_DIR", default_value = "build")]
    pub build_dir: String,

    /// Allowed CORS origins, comma separated
    #[arg(
        long,
        env = "DIABETES_CORS_ORIGINS",
        value_delimiter = ',',
        default_values_t = ["http://localhost".to_string(), "http://localhost:8080".to_string()]
    )]
    pub cors_origins: Vec<String>,
}

impl From<ServeArgs> for ServeConfig {
    fn from(a: ServeArgs) -> Self {
        ServeConfig {
            host:         a.host,
            port:         a.port,
            build_dir:    a.build_dir,
            cors_origins: a.cors_origins,
        }
    }
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// CSV of new patients with a header row
    #[arg(long, default_value = "tests/data.csv")]
    pub input: String,

    /// Directory holding the trained artifacts
    #[arg(long, default_value = "build")]
    pub build_dir: String,

    /// Write the scored CSV here instead of stdout
    #[arg(long)]
    pub output: Option<String>,
}

impl From<ValidateArgs> for ValidateConfig {
    fn from(a: ValidateArgs) -> Self {
        ValidateConfig {
            input_path:  a.input,
            build_dir:   a.build_dir,
            output_path: a.output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults() {
        let cli = Cli::try_parse_from(["diabetes-risk", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg = TrainConfig::from(args);

        assert_eq!(cfg.data_path, "data/dataset/diabetes.csv");
        assert_eq!(cfg.build_dir, "build");
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.n_trees, 100);
        assert_eq!(cfg.test_fraction, 0.2);
    }

    #[test]
    fn test_serve_origins_split_on_comma() {
        let cli = Cli::try_parse_from([
            "diabetes-risk", "serve", "--port", "9000",
            "--cors-origins", "http://a.test,http://b.test",
        ])
        .unwrap();
        let Commands::Serve(args) = cli.command else { panic!("expected serve") };
        let cfg = ServeConfig::from(args);

        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_validate_output_is_optional() {
        let cli = Cli::try_parse_from(["diabetes-risk", "validate", "--input", "new.csv"]).unwrap();
        let Commands::Validate(args) = cli.command else { panic!("expected validate") };
        let cfg = ValidateConfig::from(args);

        assert_eq!(cfg.input_path, "new.csv");
        assert_eq!(cfg.output_path, None);
    }

    #[test]
    fn test_unknown_subcommand_fails() {
        assert!(Cli::try_parse_from(["diabetes-risk", "ask"]).is_err());
    }
}
