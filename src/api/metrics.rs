//! Prometheus scrape endpoint.

use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Router};

use super::AppState;

const EXPOSITION: &str = "text/plain; version=0.0.4; charset=utf-8";

pub(super) fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/metrics", get(handler))
}

async fn handler(Extension(state): Extension<AppState>) -> impl IntoResponse {
    ([(CONTENT_TYPE, EXPOSITION)], state.metrics())
}
