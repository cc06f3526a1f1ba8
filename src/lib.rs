// lib.rs - review sentiment core: dataset labeling, agreement scoring and serving
pub mod api;
pub mod common;
pub mod data;
pub mod evaluation;
pub mod inference;
pub mod training;

pub use common::{AppCfg, ErrorCode, SentimentError, SentimentResult};
pub use data::Sentiment;
