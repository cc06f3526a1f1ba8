//! Classifier adapter: a uniform `predict(texts) -> predictions` contract over an
//! opaque text-classification backend.
//!
//! Loading is a separate, explicit step (`Classifier::load`) so callers decide when
//! the expensive part happens. The resulting handle is cheap to clone and safe to
//! share across threads.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::common::error::{SentimentError, SentimentResult};
use crate::data::domain::Sentiment;

/// Identifier handed to a [`ModelLoader`] (model name or artefact path).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ModelId(String);

impl ModelId {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Backend output for one text, before label normalisation.
#[derive(Clone, Debug, PartialEq)]
pub struct RawScore {
    pub label: String,
    pub score: f32,
}

impl RawScore {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Result of classifying one text.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Prediction {
    pub label: Sentiment,
    /// Clamped to `[0, 1]`.
    pub confidence: f32,
}

/// The black-box capability: classify a batch of texts in one call.
pub trait ClassifierBackend: Send + Sync {
    fn infer(&self, texts: &[String]) -> SentimentResult<Vec<RawScore>>;

    /// Backends that cannot take overlapping calls return `false`; the handle then
    /// serializes access.
    fn is_reentrant(&self) -> bool {
        true
    }
}

/// Produces backends for a model identifier.
pub trait ModelLoader {
    fn load(&self, model: &ModelId) -> SentimentResult<Box<dyn ClassifierBackend>>;
}

/// Loaded classifier handle.
#[derive(Clone)]
pub struct Classifier {
    model: ModelId,
    backend: Arc<dyn ClassifierBackend>,
    gate: Option<Arc<Mutex<()>>>,
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("model", &self.model)
            .field("serialized", &self.gate.is_some())
            .finish()
    }
}

impl Classifier {
    /// Load the model once. Any loader failure surfaces as `ModelUnavailable`.
    pub fn load(loader: &dyn ModelLoader, model: &ModelId) -> SentimentResult<Self> {
        let backend = loader.load(model).map_err(|err| match err {
            SentimentError::ModelUnavailable { .. } => err,
            other => SentimentError::model_unavailable(model.as_str(), other),
        })?;
        Ok(Self::from_backend(model.clone(), backend))
    }

    pub fn from_backend(model: ModelId, backend: Box<dyn ClassifierBackend>) -> Self {
        let gate = (!backend.is_reentrant()).then(|| Arc::new(Mutex::new(())));
        Self {
            model,
            backend: Arc::from(backend),
            gate,
        }
    }

    /// Classify `texts` in one backend call. Output order and length match the input.
    pub fn predict(&self, texts: &[String]) -> SentimentResult<Vec<Prediction>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let raw = match &self.gate {
            Some(gate) => {
                // A poisoned gate only means an earlier call panicked; the backend holds no
                // state we protect, so keep going.
                let _guard = gate.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                self.backend.infer(texts)?
            }
            None => self.backend.infer(texts)?,
        };

        if raw.len() != texts.len() {
            return Err(SentimentError::inference(format!(
                "model '{}' returned {} results for {} texts",
                self.model,
                raw.len(),
                texts.len()
            )));
        }
        raw.into_iter().map(normalise).collect()
    }
}

fn normalise(raw: RawScore) -> SentimentResult<Prediction> {
    let label = raw
        .label
        .parse::<Sentiment>()
        .map_err(SentimentError::inference)?;
    let confidence = if raw.score.is_nan() {
        0.0
    } else {
        raw.score.clamp(0.0, 1.0)
    };
    Ok(Prediction { label, confidence })
}
