//! Training domain: evaluation runs of a frozen classifier against rating-derived labels.
//!
//! Nothing here updates model weights.

pub mod domain;
pub mod service;

pub use domain::{TrainConfig, ValidationRow};
pub use service::{run_training_pipeline, validate_sample};
