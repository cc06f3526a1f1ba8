//! Mapping of core errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::common::error::{ErrorCode, SentimentError};

/// JSON body of every error response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::ModelUnavailable | ErrorCode::Inference => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::DataAccess | ErrorCode::EmptyDataset => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for SentimentError {
    fn into_response(self) -> Response {
        let code = self.code();
        let status = status_for(code);
        if status.is_server_error() {
            warn!(code = code.as_str(), error = %self, "request failed");
        }
        let body = ErrorBody {
            error: code.as_str().to_string(),
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
