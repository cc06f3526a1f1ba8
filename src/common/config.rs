//! Runtime configuration loaded from the process environment.
//!
//! CLI flags override individual values after loading.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::common::log::LogFormat;

/// File name of the metrics artifact inside `artifacts_dir`.
pub const METRICS_FILE: &str = "training_metrics.json";

/// Snapshot of configuration values consumed by the core.
#[derive(Clone, Debug)]
pub struct AppCfg {
    pub raw_path: PathBuf,
    pub dataset_path: PathBuf,
    pub artifacts_dir: PathBuf,
    pub text_column: String,
    pub rating_column: String,
    pub model: String,
    pub bind: String,
    pub sample_size: usize,
    pub seed: u64,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for AppCfg {
    fn default() -> Self {
        Self {
            raw_path: PathBuf::from("data/raw/hotel_reviews.csv"),
            dataset_path: PathBuf::from("data/processed/sentiment_dataset.csv"),
            artifacts_dir: PathBuf::from("artifacts"),
            text_column: "reviews.text".to_string(),
            rating_column: "reviews.rating".to_string(),
            model: crate::inference::lexicon::BUILTIN_MODEL.to_string(),
            bind: "0.0.0.0:8000".to_string(),
            sample_size: 50,
            seed: 42,
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
        }
    }
}

impl AppCfg {
    /// Create a configuration snapshot from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a snapshot from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, default: String| lookup(key).unwrap_or(default);
        let path = |key: &str, default: PathBuf| lookup(key).map(PathBuf::from).unwrap_or(default);

        Self {
            raw_path: path("SENTIMENT_RAW_PATH", defaults.raw_path),
            dataset_path: path("SENTIMENT_DATASET_PATH", defaults.dataset_path),
            artifacts_dir: path("SENTIMENT_ARTIFACTS_DIR", defaults.artifacts_dir),
            text_column: text("SENTIMENT_TEXT_COLUMN", defaults.text_column),
            rating_column: text("SENTIMENT_RATING_COLUMN", defaults.rating_column),
            model: text("SENTIMENT_MODEL", defaults.model),
            bind: text("SENTIMENT_BIND", defaults.bind),
            sample_size: parsed(&lookup, "SENTIMENT_SAMPLE_SIZE", defaults.sample_size),
            seed: parsed(&lookup, "SENTIMENT_SEED", defaults.seed),
            log_level: text("SENTIMENT_LOG_LEVEL", defaults.log_level),
            log_format: parsed(&lookup, "SENTIMENT_LOG_FORMAT", defaults.log_format),
        }
    }

    /// Location of the metrics artifact written by each evaluation run.
    pub fn metrics_path(&self) -> PathBuf {
        self.artifacts_dir.join(METRICS_FILE)
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "ignoring unparseable configuration value");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = AppCfg::from_lookup(|_| None);
        assert_eq!(cfg.sample_size, 50);
        assert_eq!(cfg.seed, 42);
        assert_eq!(
            cfg.metrics_path(),
            PathBuf::from("artifacts/training_metrics.json")
        );
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn environment_overrides_defaults() {
        let cfg = AppCfg::from_lookup(lookup_from(&[
            ("SENTIMENT_DATASET_PATH", "/tmp/labeled.csv"),
            ("SENTIMENT_SAMPLE_SIZE", "7"),
            ("SENTIMENT_LOG_FORMAT", "text"),
        ]));
        assert_eq!(cfg.dataset_path, PathBuf::from("/tmp/labeled.csv"));
        assert_eq!(cfg.sample_size, 7);
        assert_eq!(cfg.log_format, LogFormat::Text);
    }

    #[test]
    fn bad_numbers_fall_back() {
        let cfg = AppCfg::from_lookup(lookup_from(&[("SENTIMENT_SEED", "forty-two")]));
        assert_eq!(cfg.seed, 42);
    }
}
