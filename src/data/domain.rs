//! Core dataset definitions and contracts.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::error::SentimentResult;

/// Three-way sentiment label shared by the dataset, the classifier and the service.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Negative, Sentiment::Neutral, Sentiment::Positive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Positive => "positive",
        }
    }

    /// Dense index, used to key per-label counters.
    pub fn index(&self) -> usize {
        match self {
            Sentiment::Negative => 0,
            Sentiment::Neutral => 1,
            Sentiment::Positive => 2,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    /// Accepts the canonical names plus the label spellings common classifiers emit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "negative" | "neg" | "label_0" => Ok(Sentiment::Negative),
            "neutral" | "neu" | "label_1" => Ok(Sentiment::Neutral),
            "positive" | "pos" | "label_2" => Ok(Sentiment::Positive),
            other => Err(format!("unknown sentiment label '{other}'")),
        }
    }
}

/// Map a star rating to a sentiment class: `<= 2` negative, `3` neutral, `>= 4` positive.
///
/// Any integer is accepted; values outside 1..=5 follow the same thresholds.
pub fn rating_to_sentiment(rating: i64) -> Sentiment {
    if rating <= 2 {
        Sentiment::Negative
    } else if rating == 3 {
        Sentiment::Neutral
    } else {
        Sentiment::Positive
    }
}

/// Raw input row after projection. Either field may be missing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReviewRecord {
    pub text: Option<String>,
    pub rating: Option<i64>,
}

impl ReviewRecord {
    /// Label the record, or `None` when text or rating is missing.
    pub fn label(self) -> Option<(String, Sentiment)> {
        match (self.text, self.rating) {
            (Some(text), Some(rating)) => Some((text, rating_to_sentiment(rating))),
            _ => None,
        }
    }
}

/// Stable row identity: position of the row in the dataset file when it was loaded.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct RowId(pub usize);

impl RowId {
    pub fn raw(&self) -> usize {
        self.0
    }
}

/// One row of the labeled dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledExample {
    pub id: RowId,
    pub text: String,
    pub sentiment: Sentiment,
    pub predicted_sentiment: Option<Sentiment>,
}

/// Labeled rows kept in ascending `RowId` order; the on-disk dataset is the source of truth.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabeledDataset {
    rows: Vec<LabeledExample>,
}

impl LabeledDataset {
    /// Build a fresh dataset from `(text, sentiment)` pairs, assigning ids in order.
    pub fn from_labeled<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, Sentiment)>,
    {
        let rows = pairs
            .into_iter()
            .enumerate()
            .map(|(idx, (text, sentiment))| LabeledExample {
                id: RowId(idx),
                text,
                sentiment,
                predicted_sentiment: None,
            })
            .collect();
        Self { rows }
    }

    pub fn from_rows(mut rows: Vec<LabeledExample>) -> Self {
        rows.sort_by_key(|row| row.id);
        Self { rows }
    }

    pub fn rows(&self) -> &[LabeledExample] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: RowId) -> Option<&LabeledExample> {
        self.rows
            .binary_search_by_key(&id, |row| row.id)
            .ok()
            .map(|pos| &self.rows[pos])
    }

    /// Whether any row carries a prediction (decides if the column is persisted).
    pub fn has_predictions(&self) -> bool {
        self.rows.iter().any(|row| row.predicted_sentiment.is_some())
    }

    /// Write predictions back by row identity. Rows not named keep their previous value.
    ///
    /// Returns how many rows were updated; unknown ids are ignored.
    pub fn annotate<I>(&mut self, predictions: I) -> usize
    where
        I: IntoIterator<Item = (RowId, Sentiment)>,
    {
        let updates: std::collections::HashMap<RowId, Sentiment> =
            predictions.into_iter().collect();
        let mut updated = 0;
        for row in &mut self.rows {
            if let Some(label) = updates.get(&row.id) {
                row.predicted_sentiment = Some(*label);
                updated += 1;
            }
        }
        updated
    }
}

/// Repository contract for dataset persistence.
pub trait DataRepo {
    /// Read raw review records, projected to text and rating.
    fn load_raw(&self, path: &Path) -> SentimentResult<Vec<ReviewRecord>>;
    /// Read the labeled dataset, dropping rows with missing required fields.
    fn load_labeled(&self, path: &Path) -> SentimentResult<LabeledDataset>;
    /// Replace the labeled dataset at `path`, creating parent directories.
    fn save_labeled(&self, path: &Path, dataset: &LabeledDataset) -> SentimentResult<()>;
}
