//! Deterministic stand-in for the real model: fixed labels for fixed inputs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::common::error::{SentimentError, SentimentResult};
use crate::data::domain::Sentiment;

use super::domain::{ClassifierBackend, ModelId, ModelLoader, RawScore};

#[derive(Clone, Debug)]
pub struct FixedBackend {
    answers: HashMap<String, Sentiment>,
    fallback: Sentiment,
    reentrant: bool,
    calls: Arc<AtomicUsize>,
}

impl FixedBackend {
    /// Every text not registered with [`FixedBackend::with`] gets `fallback`.
    pub fn new(fallback: Sentiment) -> Self {
        Self {
            answers: HashMap::new(),
            fallback,
            reentrant: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with(mut self, text: impl Into<String>, label: Sentiment) -> Self {
        self.answers.insert(text.into(), label);
        self
    }

    /// Report as non-reentrant so the handle serializes access.
    pub fn exclusive(mut self) -> Self {
        self.reentrant = false;
        self
    }

    /// Number of backend invocations, shared between clones.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    pub fn label_for(&self, text: &str) -> Sentiment {
        self.answers.get(text).copied().unwrap_or(self.fallback)
    }
}

impl ClassifierBackend for FixedBackend {
    fn infer(&self, texts: &[String]) -> SentimentResult<Vec<RawScore>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|text| RawScore::new(self.label_for(text).as_str(), 0.99))
            .collect())
    }

    fn is_reentrant(&self) -> bool {
        self.reentrant
    }
}

/// Loader handing out clones of one [`FixedBackend`], or failing on demand.
#[derive(Clone, Debug)]
pub struct FixedLoader {
    backend: Option<FixedBackend>,
    loads: Arc<AtomicUsize>,
}

impl FixedLoader {
    pub fn new(backend: FixedBackend) -> Self {
        Self {
            backend: Some(backend),
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A loader whose every `load` fails with `ModelUnavailable`.
    pub fn failing() -> Self {
        Self {
            backend: None,
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ModelLoader for FixedLoader {
    fn load(&self, model: &ModelId) -> SentimentResult<Box<dyn ClassifierBackend>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        match &self.backend {
            Some(backend) => Ok(Box::new(backend.clone())),
            None => Err(SentimentError::model_unavailable(
                model.as_str(),
                "no backend configured",
            )),
        }
    }
}
