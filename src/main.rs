use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::error;

use review_sentiment::api;
use review_sentiment::common::log;
use review_sentiment::data::{run_preprocessing, FsDataRepo};
use review_sentiment::evaluation::FsEvalRepo;
use review_sentiment::inference::{Classifier, InferenceService, LexiconLoader, ModelId};
use review_sentiment::training::{run_training_pipeline, validate_sample, TrainConfig};
use review_sentiment::AppCfg;

#[derive(Debug, Parser)]
#[command(name = "review-sentiment", version, about = "Review sentiment labeling, evaluation and serving")]
struct Cli {
    /// Model identifier passed to the loader (overrides SENTIMENT_MODEL).
    #[arg(long, global = true)]
    model: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load the model once and serve the HTTP API.
    Serve {
        /// Listen address (overrides SENTIMENT_BIND).
        #[arg(long)]
        bind: Option<String>,
    },
    /// Build the labeled dataset from raw ratings.
    Preprocess,
    /// Regenerate the dataset, predict on a sample and write agreement metrics.
    Train {
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        sample_size: Option<u64>,
    },
    /// Predict on a sample of the current dataset and print it next to the rating labels.
    Validate {
        #[arg(long, default_value_t = 28, value_parser = clap::value_parser!(u64).range(1..))]
        sample_size: u64,
    },
    /// Classify the given texts and print label and confidence.
    Classify {
        #[arg(required = true)]
        texts: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    let mut cfg = AppCfg::load();
    if let Some(model) = cli.model {
        cfg.model = model;
    }
    log::init(&cfg.log_level, cfg.log_format);

    if let Err(err) = run(cli.command, cfg) {
        error!(error = %format!("{err:#}"), "command failed");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(command: Command, mut cfg: AppCfg) -> anyhow::Result<()> {
    let model = ModelId::new(cfg.model.clone());
    let data = FsDataRepo::new(&cfg);

    match command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                cfg.bind = bind;
            }
            let service = InferenceService::boot(&LexiconLoader, &model)
                .context("service refused to start")?;
            let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
            runtime
                .block_on(api::serve(Arc::new(service), &cfg.bind))
                .with_context(|| format!("server on {} failed", cfg.bind))?;
        }
        Command::Preprocess => {
            let report = run_preprocessing(&data, &cfg.raw_path, &cfg.dataset_path)
                .context("preprocessing failed")?;
            println!(
                "Processed dataset saved to {} ({} of {} rows kept)",
                cfg.dataset_path.display(),
                report.rows_out,
                report.rows_in
            );
        }
        Command::Train { sample_size } => {
            let mut train = TrainConfig::from_cfg(&cfg);
            if let Some(size) = sample_size {
                train = train.with_sample_size(size as usize);
            }
            let snapshot = run_training_pipeline(&train, &data, &FsEvalRepo, &LexiconLoader, &model)
                .context("training pipeline failed")?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            println!("Saved metrics to: {}", train.metrics_path.display());
        }
        Command::Validate { sample_size } => {
            let train = TrainConfig::from_cfg(&cfg).with_sample_size(sample_size as usize);
            let rows = validate_sample(&train, &data, &LexiconLoader, &model)
                .context("model validation failed")?;
            println!("Model validation sample:");
            for row in rows {
                println!(
                    "{:>6}  {:<8}  {:<8}  {}",
                    row.id.raw(),
                    row.sentiment,
                    row.predicted_sentiment,
                    row.text
                );
            }
        }
        Command::Classify { texts } => {
            let classifier = Classifier::load(&LexiconLoader, &model).context("model load failed")?;
            for (text, prediction) in texts.iter().zip(classifier.predict(&texts)?) {
                println!("Text: {text}");
                println!("Predicted sentiment: {}", prediction.label);
                println!("Confidence score: {:.3}", prediction.confidence);
                println!("{}", "-".repeat(50));
            }
        }
    }
    Ok(())
}
