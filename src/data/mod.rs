//! Data domain: raw review ingest, rating labels and the labeled dataset file.

pub mod domain;
pub mod repo_fs;
pub mod service;

pub use domain::{
    rating_to_sentiment, DataRepo, LabeledDataset, LabeledExample, ReviewRecord, RowId, Sentiment,
};
pub use repo_fs::FsDataRepo;
pub use service::{run_preprocessing, PreprocessReport};
