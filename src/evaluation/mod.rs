//! Evaluation: reproducible sampling, agreement scoring and the metrics artifact.

pub mod domain;
pub mod repo_fs;
pub mod service;

pub use domain::{EvalRepo, MetricsSnapshot};
pub use repo_fs::FsEvalRepo;
