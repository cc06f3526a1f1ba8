//! Types for the evaluation ("training") runs over a frozen classifier.

use std::path::PathBuf;

use crate::common::config::AppCfg;
use crate::common::error::{SentimentError, SentimentResult};
use crate::data::domain::{RowId, Sentiment};

/// Everything a pipeline run needs besides the classifier loader.
#[derive(Clone, Debug)]
pub struct TrainConfig {
    pub raw_path: PathBuf,
    pub dataset_path: PathBuf,
    pub metrics_path: PathBuf,
    pub sample_size: usize,
    pub seed: u64,
}

impl TrainConfig {
    pub fn from_cfg(cfg: &AppCfg) -> Self {
        Self {
            raw_path: cfg.raw_path.clone(),
            dataset_path: cfg.dataset_path.clone(),
            metrics_path: cfg.metrics_path(),
            sample_size: cfg.sample_size,
            seed: cfg.seed,
        }
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn validate(&self) -> SentimentResult<()> {
        if self.sample_size == 0 {
            return Err(SentimentError::invalid("sample size must be at least 1"));
        }
        Ok(())
    }
}

/// One sampled row after a validation pass, for display.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationRow {
    pub id: RowId,
    pub text: String,
    pub sentiment: Sentiment,
    pub predicted_sentiment: Sentiment,
}
