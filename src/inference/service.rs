//! Long-running inference service: one classifier loaded at boot, shared by every
//! request, with request/label/latency instrumentation.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::common::error::{SentimentError, SentimentResult};
use crate::data::domain::Sentiment;

use super::domain::{Classifier, ModelId, ModelLoader};
use super::metrics::ServiceMetrics;

/// Liveness payload.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Health {
    pub status: &'static str,
}

/// A service only exists in the Ready state; a failed boot never produces one.
#[derive(Debug)]
pub struct InferenceService {
    classifier: Classifier,
    metrics: ServiceMetrics,
}

impl InferenceService {
    /// Load the classifier exactly once. Fails fast with `ModelUnavailable`.
    pub fn boot(loader: &dyn ModelLoader, model: &ModelId) -> SentimentResult<Self> {
        let start = Instant::now();
        let classifier = Classifier::load(loader, model)?;
        info!(
            model = %model,
            dur_ms = start.elapsed().as_millis() as u64,
            "classifier loaded, service ready"
        );
        Ok(Self::with_classifier(classifier))
    }

    pub fn with_classifier(classifier: Classifier) -> Self {
        Self {
            classifier,
            metrics: ServiceMetrics::new(),
        }
    }

    pub fn health(&self) -> Health {
        Health { status: "ok" }
    }

    /// Classify a non-empty batch; only labels are returned to callers.
    ///
    /// Every forwarded call counts as a request and is timed, even when the backend
    /// fails; per-label counters only move for returned labels.
    pub fn predict(&self, texts: &[String]) -> SentimentResult<Vec<Sentiment>> {
        if texts.is_empty() {
            return Err(SentimentError::invalid("texts must not be empty"));
        }

        let start = Instant::now();
        let outcome = self.classifier.predict(texts);
        let elapsed = start.elapsed();
        self.metrics.record_request();
        self.metrics.observe_latency(elapsed);

        match outcome {
            Ok(predictions) => {
                let labels: Vec<Sentiment> = predictions.iter().map(|p| p.label).collect();
                for label in &labels {
                    self.metrics.record_label(*label);
                }
                debug!(
                    texts = texts.len(),
                    dur_us = elapsed.as_micros() as u64,
                    "prediction served"
                );
                Ok(labels)
            }
            Err(err) => {
                warn!(code = err.code().as_str(), error = %err, "prediction failed");
                Err(err)
            }
        }
    }

    /// Single-text convenience used by the form flow.
    pub fn predict_single(&self, text: &str) -> SentimentResult<Sentiment> {
        self.predict(&[text.to_string()])?
            .pop()
            .ok_or_else(|| SentimentError::inference("no prediction returned"))
    }

    /// Prometheus text exposition of the service counters.
    pub fn metrics(&self) -> String {
        self.metrics.render()
    }

    pub fn counters(&self) -> &ServiceMetrics {
        &self.metrics
    }
}
