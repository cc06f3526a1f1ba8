//! Inference domain: the classifier adapter, its backends and the serving state.

pub mod domain;
pub mod fake;
pub mod lexicon;
pub mod metrics;
pub mod service;

pub use domain::{Classifier, ClassifierBackend, ModelId, ModelLoader, Prediction, RawScore};
pub use lexicon::LexiconLoader;
pub use service::InferenceService;
