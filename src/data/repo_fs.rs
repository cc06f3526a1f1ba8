//! Filesystem-backed repository for raw reviews and the labeled dataset (CSV).
//!
//! Concurrent runs against the same dataset path race on the final rename; the
//! last writer wins and nothing coordinates them.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::Deserialize;
use tracing::warn;

use crate::common::config::AppCfg;
use crate::common::error::{SentimentError, SentimentResult};
use crate::common::fs::replace_file;

use super::domain::{DataRepo, LabeledDataset, LabeledExample, ReviewRecord, RowId, Sentiment};

const TEXT: &str = "text";
const SENTIMENT: &str = "sentiment";
const PREDICTED: &str = "predicted_sentiment";

/// CSV repository; raw column names come from configuration.
pub struct FsDataRepo {
    text_column: String,
    rating_column: String,
}

impl FsDataRepo {
    pub fn new(cfg: &AppCfg) -> Self {
        Self::with_columns(&cfg.text_column, &cfg.rating_column)
    }

    pub fn with_columns(text_column: &str, rating_column: &str) -> Self {
        Self {
            text_column: text_column.to_string(),
            rating_column: rating_column.to_string(),
        }
    }

    fn column_index(&self, headers: &StringRecord, name: &str, path: &Path) -> SentimentResult<usize> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| SentimentError::data_access(path, format!("missing column '{name}'")))
    }
}

#[derive(Debug, Deserialize)]
struct LabeledRow {
    text: Option<String>,
    sentiment: Option<String>,
    #[serde(default)]
    predicted_sentiment: Option<String>,
}

/// Whole-valued ratings only; "4" and "4.0" are accepted, "4.5" or "n/a" are treated as missing.
fn parse_rating(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64)
            .map(|v| v as i64)
    })
}

fn present(field: Option<&str>) -> Option<String> {
    field
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

impl DataRepo for FsDataRepo {
    fn load_raw(&self, path: &Path) -> SentimentResult<Vec<ReviewRecord>> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|err| SentimentError::data_access(path, err))?;
        let headers = reader
            .headers()
            .map_err(|err| SentimentError::data_access(path, err))?
            .clone();
        let text_idx = self.column_index(&headers, &self.text_column, path)?;
        let rating_idx = self.column_index(&headers, &self.rating_column, path)?;

        let mut records = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|err| SentimentError::data_access(path, err))?;
            records.push(ReviewRecord {
                text: present(record.get(text_idx)),
                rating: record.get(rating_idx).and_then(parse_rating),
            });
        }
        Ok(records)
    }

    fn load_labeled(&self, path: &Path) -> SentimentResult<LabeledDataset> {
        let mut reader = ReaderBuilder::new()
            .from_path(path)
            .map_err(|err| SentimentError::data_access(path, err))?;

        let mut rows = Vec::new();
        let mut dropped = 0usize;
        for (idx, row) in reader.deserialize::<LabeledRow>().enumerate() {
            let row = row.map_err(|err| SentimentError::data_access(path, err))?;
            let text = row.text.filter(|t| !t.trim().is_empty());
            let sentiment = row.sentiment.and_then(|s| s.parse::<Sentiment>().ok());
            let (Some(text), Some(sentiment)) = (text, sentiment) else {
                dropped += 1;
                continue;
            };
            rows.push(LabeledExample {
                id: RowId(idx),
                text,
                sentiment,
                predicted_sentiment: row.predicted_sentiment.and_then(|p| p.parse().ok()),
            });
        }
        if dropped > 0 {
            warn!(path = %path.display(), dropped, "skipped labeled rows with missing fields");
        }
        Ok(LabeledDataset::from_rows(rows))
    }

    fn save_labeled(&self, path: &Path, dataset: &LabeledDataset) -> SentimentResult<()> {
        let with_predictions = dataset.has_predictions();
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        let encode = |err: csv::Error| SentimentError::data_access(path, err);

        if with_predictions {
            writer.write_record([TEXT, SENTIMENT, PREDICTED]).map_err(encode)?;
        } else {
            writer.write_record([TEXT, SENTIMENT]).map_err(encode)?;
        }
        for row in dataset.rows() {
            let sentiment = row.sentiment.as_str();
            if with_predictions {
                let predicted = row.predicted_sentiment.map(|p| p.as_str()).unwrap_or("");
                writer
                    .write_record([row.text.as_str(), sentiment, predicted])
                    .map_err(encode)?;
            } else {
                writer
                    .write_record([row.text.as_str(), sentiment])
                    .map_err(encode)?;
            }
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| SentimentError::data_access(path, err.error()))?;
        replace_file(path, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn repo() -> FsDataRepo {
        FsDataRepo::with_columns("reviews.text", "reviews.rating")
    }

    #[test]
    fn parses_whole_ratings_only() {
        assert_eq!(parse_rating("4"), Some(4));
        assert_eq!(parse_rating(" 2.0 "), Some(2));
        assert_eq!(parse_rating("4.5"), None);
        assert_eq!(parse_rating(""), None);
        assert_eq!(parse_rating("five"), None);
    }

    #[test]
    fn raw_projection_keeps_missing_fields_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        fs::write(
            &path,
            "id,reviews.rating,reviews.text,city\n\
             1,5,\"Great, quiet room\",Rome\n\
             2,,No rating here,Oslo\n\
             3,1,,Lima\n\
             4,3\n",
        )
        .unwrap();

        let records = repo().load_raw(&path).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].text.as_deref(), Some("Great, quiet room"));
        assert_eq!(records[0].rating, Some(5));
        assert_eq!(records[1].rating, None);
        assert_eq!(records[2].text, None);
        assert_eq!(records[3].text, None);
        assert_eq!(records[3].rating, Some(3));
    }

    #[test]
    fn missing_raw_file_is_data_access() {
        let err = repo().load_raw(Path::new("/nonexistent/raw.csv")).unwrap_err();
        assert!(matches!(err, SentimentError::DataAccess { .. }));
    }

    #[test]
    fn missing_raw_column_is_data_access() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        fs::write(&path, "reviews.text\nhello\n").unwrap();
        let err = repo().load_raw(&path).unwrap_err();
        assert!(err.to_string().contains("reviews.rating"));
    }

    #[test]
    fn labeled_dataset_round_trips_byte_for_byte() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labeled.csv");
        let original = "text,sentiment,predicted_sentiment\n\
                        \"Loved it, would return\",positive,positive\n\
                        \"Said \"\"meh\"\"\",neutral,\n\
                        \"multi\nline\",negative,neutral\n";
        fs::write(&path, original).unwrap();

        let ds = repo().load_labeled(&path).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.rows()[1].text, "Said \"meh\"");
        assert_eq!(ds.rows()[1].predicted_sentiment, None);
        repo().save_labeled(&path, &ds).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn prediction_column_only_written_when_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/labeled.csv");
        let ds = LabeledDataset::from_labeled(vec![("ok".to_string(), Sentiment::Neutral)]);

        repo().save_labeled(&path, &ds).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "text,sentiment\nok,neutral\n");
    }

    #[test]
    fn labeled_rows_keep_file_position_as_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labeled.csv");
        fs::write(&path, "text,sentiment\na,positive\n,negative\nc,bogus\nd,neutral\n").unwrap();

        let ds = repo().load_labeled(&path).unwrap();
        let ids: Vec<usize> = ds.rows().iter().map(|r| r.id.raw()).collect();
        assert_eq!(ids, vec![0, 3]);
    }
}
