// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. clap parses the command
// line; all business logic is delegated to Layer 2.
//
//   fetch     — download the dataset if it is missing
//   train     — fit scaler + forest, write build/ artifacts
//   serve     — HTTP prediction service
//   validate  — score a CSV of new patients
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, FetchArgs, ServeArgs, TrainArgs, ValidateArgs};

#[derive(Parser, Debug)]
#[command(
    name = "diabetes-risk",
    version,
    about = "Train a random-forest diabetes risk model, then serve or batch-score predictions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Fetch(args)    => run_fetch(args),
            Commands::Train(args)    => run_train(args),
            Commands::Serve(args)    => run_serve(args),
            Commands::Validate(args) => run_validate(args),
        }
    }
}

fn run_fetch(args: FetchArgs) -> Result<()> {
    use crate::application::train_use_case::fetch_dataset;

    let path = fetch_dataset(&args.into())?;
    println!("Dataset ready at '{}'", path.display());
    Ok(())
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    let use_case = TrainUseCase::new(args.into());
    let fitted   = use_case.execute()?;

    println!(
        "Training complete: {} train / {} test rows, held-out accuracy {:.3}.",
        fitted.n_train, fitted.n_test, fitted.report.accuracy
    );
    Ok(())
}

/// The tokio runtime is only built here; every other command is synchronous.
fn run_serve(args: ServeArgs) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Cannot start tokio runtime")?;
    runtime.block_on(crate::server::serve(args.into()))
}

fn run_validate(args: ValidateArgs) -> Result<()> {
    use crate::application::validate_use_case::ValidateUseCase;

    let scored = ValidateUseCase::new(args.into()).execute()?;
    tracing::info!("Scored {} rows", scored);
    Ok(())
}
