//! HTTP surface of the inference service.
//!
//! Each endpoint lives in its own module exposing a `router()`; `app` merges them
//! and injects the shared service through an `Extension`.

mod error;
mod health;
mod metrics;
mod predict;
mod ui;

use std::sync::Arc;

use axum::{Extension, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::inference::service::InferenceService;

pub use error::ErrorBody;
pub use predict::{PredictRequest, PredictResponse};

/// Shared state handed to every handler. The service is only built once boot succeeded.
pub type AppState = Arc<InferenceService>;

/// Assemble the full router around a ready service.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(predict::router())
        .merge(metrics::router())
        .merge(ui::router())
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}

/// Serve until Ctrl-C; in-flight requests are drained, new connections refused.
pub async fn serve(state: AppState, bind: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(addr = %listener.local_addr()?, "starting web server");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::domain::Sentiment;
    use crate::inference::fake::{FixedBackend, FixedLoader};
    use crate::inference::domain::ModelId;

    fn state() -> AppState {
        let loader = FixedLoader::new(FixedBackend::new(Sentiment::Neutral));
        Arc::new(InferenceService::boot(&loader, &ModelId::new("fixed")).unwrap())
    }

    #[tokio::test]
    async fn serves_on_a_hostname_address() {
        let server = tokio::spawn(serve(state(), "localhost:0"));
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        assert!(!server.is_finished());
        server.abort();
    }
}
