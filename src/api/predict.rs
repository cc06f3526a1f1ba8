//! JSON batch prediction endpoint and the blocking bridge shared with the form flow.

use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::common::error::{SentimentError, SentimentResult};
use crate::data::domain::Sentiment;
use crate::inference::service::InferenceService;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PredictRequest {
    pub texts: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<Sentiment>,
}

pub(super) fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/predict", post(handler))
}

async fn handler(
    Extension(state): Extension<AppState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> SentimentResult<Json<PredictResponse>> {
    let Json(request) = body.map_err(|rejection| SentimentError::invalid(rejection.body_text()))?;
    let predictions = run_blocking(state, move |service| service.predict(&request.texts)).await?;
    Ok(Json(PredictResponse { predictions }))
}

/// Run a classifier call off the async workers; the model is CPU bound.
pub(super) async fn run_blocking<T, F>(state: AppState, call: F) -> SentimentResult<T>
where
    T: Send + 'static,
    F: FnOnce(&InferenceService) -> SentimentResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || call(state.as_ref()))
        .await
        .map_err(|err| SentimentError::inference(format!("prediction task failed: {err}")))?
}
