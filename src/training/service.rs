//! Evaluation pipeline: regenerate the labeled dataset, predict on a reproducible
//! sample, merge predictions back by row identity and score agreement.
//!
//! Runs are single-shot batch jobs. Two runs writing the same dataset path at once
//! are not coordinated.

use std::time::Instant;

use tracing::info;

use crate::common::error::{SentimentError, SentimentResult};
use crate::data::domain::{DataRepo, LabeledDataset, RowId, Sentiment};
use crate::data::service::run_preprocessing;
use crate::evaluation::domain::{EvalRepo, MetricsSnapshot};
use crate::evaluation::service::{sample_ids, score};
use crate::inference::domain::{Classifier, ModelId, ModelLoader};

use super::domain::{TrainConfig, ValidationRow};

/// Full evaluation run; see the module docs for the steps.
///
/// The dataset is always regenerated first, so only this run's sample carries
/// `predicted_sentiment` afterwards.
pub fn run_training_pipeline(
    cfg: &TrainConfig,
    data: &impl DataRepo,
    evals: &impl EvalRepo,
    loader: &dyn ModelLoader,
    model: &ModelId,
) -> SentimentResult<MetricsSnapshot> {
    cfg.validate()?;
    let start = Instant::now();

    run_preprocessing(data, &cfg.raw_path, &cfg.dataset_path)?;
    let mut dataset = load_non_empty(data, cfg)?;

    let classifier = Classifier::load(loader, model)?;
    let predictions = predict_sample(&classifier, &dataset, cfg)?;

    dataset.annotate(predictions.iter().copied());
    data.save_labeled(&cfg.dataset_path, &dataset)?;

    let snapshot = score(&dataset, &predictions);
    evals.put_snapshot(&cfg.metrics_path, &snapshot)?;

    info!(
        model = %model,
        rows = dataset.len(),
        sample_size = snapshot.sample_size,
        label_agreement = snapshot.label_agreement,
        metrics = %cfg.metrics_path.display(),
        dur_ms = start.elapsed().as_millis() as u64,
        "training pipeline finished"
    );
    Ok(snapshot)
}

/// Lighter pass over the current dataset: no regeneration and no metrics artifact.
///
/// Predictions are merged into the sampled rows and the dataset is saved; the
/// sampled rows are returned in sample order.
pub fn validate_sample(
    cfg: &TrainConfig,
    data: &impl DataRepo,
    loader: &dyn ModelLoader,
    model: &ModelId,
) -> SentimentResult<Vec<ValidationRow>> {
    cfg.validate()?;
    let mut dataset = load_non_empty(data, cfg)?;

    let classifier = Classifier::load(loader, model)?;
    let predictions = predict_sample(&classifier, &dataset, cfg)?;

    dataset.annotate(predictions.iter().copied());
    data.save_labeled(&cfg.dataset_path, &dataset)?;

    let rows = predictions
        .iter()
        .filter_map(|(id, predicted)| {
            dataset.get(*id).map(|row| ValidationRow {
                id: *id,
                text: row.text.clone(),
                sentiment: row.sentiment,
                predicted_sentiment: *predicted,
            })
        })
        .collect::<Vec<_>>();
    info!(model = %model, sample_size = rows.len(), "model validation sample saved");
    Ok(rows)
}

fn load_non_empty(data: &impl DataRepo, cfg: &TrainConfig) -> SentimentResult<LabeledDataset> {
    let dataset = data.load_labeled(&cfg.dataset_path)?;
    if dataset.is_empty() {
        return Err(SentimentError::empty_dataset(&cfg.dataset_path));
    }
    Ok(dataset)
}

fn predict_sample(
    classifier: &Classifier,
    dataset: &LabeledDataset,
    cfg: &TrainConfig,
) -> SentimentResult<Vec<(RowId, Sentiment)>> {
    let ids = sample_ids(dataset, cfg.sample_size, cfg.seed);
    let texts = ids
        .iter()
        .map(|id| {
            dataset
                .get(*id)
                .map(|row| row.text.clone())
                .ok_or_else(|| SentimentError::inference(format!("sampled row {} vanished", id.raw())))
        })
        .collect::<SentimentResult<Vec<String>>>()?;

    let predictions = classifier.predict(&texts)?;
    Ok(ids
        .into_iter()
        .zip(predictions)
        .map(|(id, prediction)| (id, prediction.label))
        .collect())
}
