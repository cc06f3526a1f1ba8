//! Filesystem repository for metrics artifacts (pretty-printed JSON).

use std::fs;
use std::path::Path;

use crate::common::error::{SentimentError, SentimentResult};
use crate::common::fs::replace_file;

use super::domain::{EvalRepo, MetricsSnapshot};

#[derive(Copy, Clone, Debug, Default)]
pub struct FsEvalRepo;

impl EvalRepo for FsEvalRepo {
    fn put_snapshot(&self, path: &Path, snapshot: &MetricsSnapshot) -> SentimentResult<()> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|err| SentimentError::data_access(path, err))?;
        replace_file(path, json.as_bytes())
    }

    fn get_snapshot(&self, path: &Path) -> SentimentResult<MetricsSnapshot> {
        let raw = fs::read_to_string(path).map_err(|err| SentimentError::data_access(path, err))?;
        serde_json::from_str(&raw).map_err(|err| SentimentError::data_access(path, err))
    }
}
