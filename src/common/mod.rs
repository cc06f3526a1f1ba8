//! Shared utilities that glue the different domains together.
pub mod config;
pub mod error;
pub mod fs;
pub mod log;

pub use config::AppCfg;
pub use error::{ErrorCode, SentimentError, SentimentResult};
