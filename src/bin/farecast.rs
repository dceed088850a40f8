//! farecast CLI: train, evaluate and query airfare models.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use farecast::app;
use farecast::dataset::parse_line;
use farecast::PipelineConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "farecast")]
#[command(about = "Airfare regression over CSV travel records")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on the training CSV, evaluate on the test CSV and save the model
    Train {
        /// Training CSV
        #[arg(long)]
        train: Option<PathBuf>,

        /// Held-out CSV
        #[arg(long)]
        test: Option<PathBuf>,

        /// Output model archive
        #[arg(long)]
        model: Option<PathBuf>,
    },

    /// Score a saved model on the test CSV
    Evaluate {
        /// Held-out CSV
        #[arg(long)]
        test: Option<PathBuf>,

        /// Model archive
        #[arg(long)]
        model: Option<PathBuf>,
    },

    /// Predict the fare of one trip
    Predict {
        /// Model archive
        #[arg(long)]
        model: Option<PathBuf>,

        /// CSV data line, with or without the trailing fare
        #[arg(long)]
        row: Option<String>,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "farecast=info",
        1 => "farecast=debug",
        _ => "farecast=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn cmd_train(
    mut config: PipelineConfig,
    train: Option<PathBuf>,
    test: Option<PathBuf>,
    model: Option<PathBuf>,
) -> Result<()> {
    if let Some(path) = train {
        config = config.train_path(path);
    }
    if let Some(path) = test {
        config = config.test_path(path);
    }
    if let Some(path) = model {
        config = config.model_path(path);
    }

    let outcome = app::train_and_evaluate(&config).context("training failed")?;
    println!(
        "Trained on {} rows ({} outliers dropped)",
        outcome.training_rows, outcome.dropped_rows
    );
    println!("{}", outcome.report);
    println!("The model is saved to {}", config.model_path.display());

    let sample = app::predict_sample(&config, &app::sample_record())
        .context("sample prediction failed")?;
    println!("{sample}");
    Ok(())
}

fn cmd_evaluate(mut config: PipelineConfig, test: Option<PathBuf>, model: Option<PathBuf>) -> Result<()> {
    if let Some(path) = test {
        config = config.test_path(path);
    }
    if let Some(path) = model {
        config = config.model_path(path);
    }
    let report = app::evaluate_saved(&config).context("evaluation failed")?;
    println!("{report}");
    Ok(())
}

fn cmd_predict(mut config: PipelineConfig, model: Option<PathBuf>, row: Option<String>) -> Result<()> {
    if let Some(path) = model {
        config = config.model_path(path);
    }
    let (record, has_fare) = match row {
        Some(line) => parse_line(&line, config.delimiter_byte()?)
            .with_context(|| format!("cannot parse row {line:?}"))?,
        None => (app::sample_record(), true),
    };

    let outcome = app::predict_sample(&config, &record)
        .with_context(|| format!("prediction with {} failed", config.model_path.display()))?;
    if has_fare {
        println!("{outcome}");
    } else {
        println!("Predicted fare: {:.2}", outcome.predicted);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_ref())?;
    match cli.command {
        Commands::Train { train, test, model } => cmd_train(config, train, test, model),
        Commands::Evaluate { test, model } => cmd_evaluate(config, test, model),
        Commands::Predict { model, row } => cmd_predict(config, model, row),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
