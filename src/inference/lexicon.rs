//! Word-list sentiment backend used when no external model is wired in.
//!
//! Counts whole-word, case-insensitive hits from a positive and a negative list.
//! More positive hits means positive, more negative hits means negative, anything
//! else (including no hits at all) is neutral.

use std::fs;
use std::path::Path;

use aho_corasick::{AhoCorasick, MatchKind};
use serde::Deserialize;

use crate::common::error::{SentimentError, SentimentResult};
use crate::data::domain::Sentiment;

use super::domain::{ClassifierBackend, ModelId, ModelLoader, RawScore};

/// Model id selecting the built-in word lists.
pub const BUILTIN_MODEL: &str = "sentiment-lexicon";

const POSITIVE: &[&str] = &[
    "amazing", "awesome", "beautiful", "best", "clean", "comfortable", "excellent", "fantastic",
    "friendly", "good", "great", "happy", "helpful", "love", "loved", "lovely", "nice",
    "perfect", "pleasant", "recommend", "spacious", "wonderful",
];

const NEGATIVE: &[&str] = &[
    "angry", "awful", "bad", "broken", "dirty", "disappointed", "disappointing", "hate",
    "horrible", "noisy", "poor", "rude", "smelly", "terrible", "uncomfortable", "unfriendly",
    "worst",
];

/// Word lists as stored in a JSON lexicon file.
#[derive(Debug, Deserialize)]
pub struct Lexicon {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl Lexicon {
    pub fn builtin() -> Self {
        Self {
            positive: POSITIVE.iter().map(|w| w.to_string()).collect(),
            negative: NEGATIVE.iter().map(|w| w.to_string()).collect(),
        }
    }
}

pub struct LexiconBackend {
    positive: AhoCorasick,
    negative: AhoCorasick,
}

impl LexiconBackend {
    pub fn new(lexicon: &Lexicon) -> SentimentResult<Self> {
        Ok(Self {
            positive: matcher(&lexicon.positive)?,
            negative: matcher(&lexicon.negative)?,
        })
    }

    fn hits(matcher: &AhoCorasick, text: &str) -> usize {
        let bytes = text.as_bytes();
        let is_word = |idx: usize| bytes.get(idx).is_some_and(|b| b.is_ascii_alphanumeric());
        matcher
            .find_iter(text)
            .filter(|m| !(m.start() > 0 && is_word(m.start() - 1)) && !is_word(m.end()))
            .count()
    }

    pub fn score(&self, text: &str) -> RawScore {
        let positive = Self::hits(&self.positive, text);
        let negative = Self::hits(&self.negative, text);
        let total = (positive + negative) as f32;

        if positive > negative {
            RawScore::new(Sentiment::Positive.as_str(), positive as f32 / total)
        } else if negative > positive {
            RawScore::new(Sentiment::Negative.as_str(), negative as f32 / total)
        } else {
            RawScore::new(Sentiment::Neutral.as_str(), 0.5)
        }
    }
}

fn matcher(words: &[String]) -> SentimentResult<AhoCorasick> {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::LeftmostLongest)
        .build(words)
        .map_err(|err| SentimentError::model_unavailable("lexicon", err))
}

impl ClassifierBackend for LexiconBackend {
    fn infer(&self, texts: &[String]) -> SentimentResult<Vec<RawScore>> {
        Ok(texts.iter().map(|text| self.score(text)).collect())
    }
}

/// Loads the built-in lexicon, or a JSON lexicon file when the model id is a path.
#[derive(Copy, Clone, Debug, Default)]
pub struct LexiconLoader;

impl ModelLoader for LexiconLoader {
    fn load(&self, model: &ModelId) -> SentimentResult<Box<dyn ClassifierBackend>> {
        let lexicon = if model.as_str() == BUILTIN_MODEL {
            Lexicon::builtin()
        } else {
            let path = Path::new(model.as_str());
            let raw = fs::read_to_string(path)
                .map_err(|err| SentimentError::model_unavailable(model.as_str(), err))?;
            serde_json::from_str::<Lexicon>(&raw)
                .map_err(|err| SentimentError::model_unavailable(model.as_str(), err))?
        };
        if lexicon.positive.is_empty() || lexicon.negative.is_empty() {
            return Err(SentimentError::model_unavailable(
                model.as_str(),
                "lexicon needs both positive and negative words",
            ));
        }
        Ok(Box::new(LexiconBackend::new(&lexicon)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> LexiconBackend {
        LexiconBackend::new(&Lexicon::builtin()).unwrap()
    }

    #[test]
    fn classifies_obvious_reviews() {
        let backend = builtin();
        assert_eq!(backend.score("I love this hotel").label, "positive");
        assert_eq!(backend.score("This is terrible").label, "negative");
        assert_eq!(backend.score("We arrived on Tuesday").label, "neutral");
    }

    #[test]
    fn ties_are_neutral_and_confidence_is_hit_share() {
        let backend = builtin();
        let tie = backend.score("Good location, bad breakfast");
        assert_eq!(tie, RawScore::new("neutral", 0.5));

        let mostly = backend.score("Great staff, clean rooms, noisy street");
        assert_eq!(mostly.label, "positive");
        assert!((mostly.score - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn matches_whole_words_only() {
        let backend = builtin();
        assert_eq!(backend.score("Our badge was goodish").label, "neutral");
        assert_eq!(backend.score("BAD.").label, "negative");
    }

    #[test]
    fn loads_lexicon_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.json");
        fs::write(&path, r#"{"positive": ["sunny"], "negative": ["rainy"]}"#).unwrap();

        let backend = LexiconLoader
            .load(&ModelId::new(path.to_string_lossy()))
            .unwrap();
        let out = backend
            .infer(&["rainy week".to_string(), "sunny week".to_string()])
            .unwrap();
        assert_eq!(out[0].label, "negative");
        assert_eq!(out[1].label, "positive");
    }

    #[test]
    fn missing_lexicon_is_model_unavailable() {
        let err = LexiconLoader
            .load(&ModelId::new("/nonexistent/lexicon.json"))
            .err()
            .unwrap();
        assert!(matches!(err, SentimentError::ModelUnavailable { .. }));
    }
}
