//! Domain primitives for agreement scoring.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::error::SentimentResult;

/// Outcome of one evaluation run, persisted as a JSON artifact.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub sample_size: usize,
    /// Share of sampled rows where the model agrees with the rating label, 4 decimals.
    pub label_agreement: f64,
}

/// Repository contract for metrics artifacts.
pub trait EvalRepo {
    /// Overwrite the snapshot at `path`.
    fn put_snapshot(&self, path: &Path, snapshot: &MetricsSnapshot) -> SentimentResult<()>;
    fn get_snapshot(&self, path: &Path) -> SentimentResult<MetricsSnapshot>;
}
