//! Error handling primitives shared across the core.
//!
//! Batch runs surface these to the operator; the HTTP layer maps them to
//! status codes per request.

use std::path::{Path, PathBuf};

/// Stable error codes reported in logs and HTTP error bodies.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorCode {
    /// Raw or labeled dataset could not be read or written.
    DataAccess = 1,
    /// No usable rows were left after filtering.
    EmptyDataset = 2,
    /// The classifier could not be loaded.
    ModelUnavailable = 3,
    /// Prediction request failed validation.
    InvalidRequest = 4,
    /// A loaded classifier failed while answering a request.
    Inference = 5,
}

impl ErrorCode {
    /// Machine readable name used in error bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DataAccess => "data_access",
            ErrorCode::EmptyDataset => "empty_dataset",
            ErrorCode::ModelUnavailable => "model_unavailable",
            ErrorCode::InvalidRequest => "invalid_request",
            ErrorCode::Inference => "inference",
        }
    }
}

/// Canonical error type for the core.
#[derive(Debug, thiserror::Error)]
pub enum SentimentError {
    #[error("dataset access failed for {}: {reason}", path.display())]
    DataAccess { path: PathBuf, reason: String },
    #[error("dataset at {} has no usable rows", path.display())]
    EmptyDataset { path: PathBuf },
    #[error("model '{model}' is unavailable: {reason}")]
    ModelUnavailable { model: String, reason: String },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("inference failed: {0}")]
    Inference(String),
}

/// Result alias used throughout the crate.
pub type SentimentResult<T> = Result<T, SentimentError>;

impl SentimentError {
    /// Data access helper, accepts any displayable cause (io, csv, json).
    pub fn data_access(path: &Path, reason: impl ToString) -> Self {
        Self::DataAccess {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Empty dataset helper.
    pub fn empty_dataset(path: &Path) -> Self {
        Self::EmptyDataset {
            path: path.to_path_buf(),
        }
    }

    /// Model loading helper.
    pub fn model_unavailable(model: &str, reason: impl ToString) -> Self {
        Self::ModelUnavailable {
            model: model.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Validation helper.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Backend failure helper.
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SentimentError::DataAccess { .. } => ErrorCode::DataAccess,
            SentimentError::EmptyDataset { .. } => ErrorCode::EmptyDataset,
            SentimentError::ModelUnavailable { .. } => ErrorCode::ModelUnavailable,
            SentimentError::InvalidRequest(_) => ErrorCode::InvalidRequest,
            SentimentError::Inference(_) => ErrorCode::Inference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ErrorCode::DataAccess as u32, 1);
        assert_eq!(ErrorCode::EmptyDataset as u32, 2);
        assert_eq!(ErrorCode::ModelUnavailable as u32, 3);
        assert_eq!(ErrorCode::InvalidRequest as u32, 4);
        assert_eq!(ErrorCode::Inference as u32, 5);
    }

    #[test]
    fn helpers_map_to_codes() {
        let path = Path::new("data/raw.csv");
        assert_eq!(
            SentimentError::data_access(path, "denied").code(),
            ErrorCode::DataAccess
        );
        assert_eq!(
            SentimentError::empty_dataset(path).code().as_str(),
            "empty_dataset"
        );
        let err = SentimentError::model_unavailable("lexicon.json", "missing");
        assert_eq!(err.code(), ErrorCode::ModelUnavailable);
        assert_eq!(
            err.to_string(),
            "model 'lexicon.json' is unavailable: missing"
        );
    }
}
