//! Liveness endpoint.

use axum::routing::get;
use axum::{Extension, Json, Router};

use super::AppState;
use crate::inference::service::Health;

pub(super) fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(handler))
}

// Liveness only; never touches the model.
async fn handler(Extension(state): Extension<AppState>) -> Json<Health> {
    Json(state.health())
}
