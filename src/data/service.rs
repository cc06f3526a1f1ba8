//! Dataset preprocessing: raw star ratings in, labeled dataset out.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::common::error::SentimentResult;

use super::domain::{DataRepo, LabeledDataset};

/// Row accounting for one preprocessing run.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PreprocessReport {
    pub rows_in: usize,
    pub rows_out: usize,
}

impl PreprocessReport {
    pub fn dropped(&self) -> usize {
        self.rows_in - self.rows_out
    }

    /// Zero surviving rows is not an error here; callers decide what it means.
    pub fn is_empty(&self) -> bool {
        self.rows_out == 0
    }
}

/// Read raw reviews, drop incomplete rows, label the rest and overwrite the labeled dataset.
///
/// Any `predicted_sentiment` annotations in an existing dataset at `labeled_path` are lost.
pub fn run_preprocessing(
    repo: &impl DataRepo,
    raw_path: &Path,
    labeled_path: &Path,
) -> SentimentResult<PreprocessReport> {
    let start = Instant::now();
    let records = repo.load_raw(raw_path)?;
    let rows_in = records.len();

    let dataset = LabeledDataset::from_labeled(records.into_iter().filter_map(|r| r.label()));
    repo.save_labeled(labeled_path, &dataset)?;

    let report = PreprocessReport {
        rows_in,
        rows_out: dataset.len(),
    };
    for row in dataset.rows().iter().take(5) {
        debug!(text = %row.text, sentiment = %row.sentiment, "labeled row preview");
    }
    if report.is_empty() {
        warn!(raw = %raw_path.display(), rows_in, "preprocessing produced an empty dataset");
    }
    info!(
        raw = %raw_path.display(),
        out = %labeled_path.display(),
        rows_in = report.rows_in,
        rows_out = report.rows_out,
        dropped = report.dropped(),
        dur_ms = start.elapsed().as_millis() as u64,
        "preprocessing completed"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::common::error::SentimentError;
    use crate::data::domain::Sentiment;
    use crate::data::repo_fs::FsDataRepo;

    const RAW: &str = "reviews.text,reviews.rating\n\
                       Wonderful stay,5\n\
                       Dirty room,1\n\
                       It was ok,3\n\
                       ,4\n\
                       Missing rating,\n\
                       Decent,4.0\n";

    fn repo() -> FsDataRepo {
        FsDataRepo::with_columns("reviews.text", "reviews.rating")
    }

    #[test]
    fn labels_and_drops_incomplete_rows() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw/hotel_reviews.csv");
        let out = dir.path().join("processed/sentiment_dataset.csv");
        fs::create_dir_all(raw.parent().unwrap()).unwrap();
        fs::write(&raw, RAW).unwrap();

        let report = run_preprocessing(&repo(), &raw, &out).unwrap();

        assert_eq!(report, PreprocessReport { rows_in: 6, rows_out: 4 });
        assert_eq!(report.dropped(), 2);
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "text,sentiment\n\
             Wonderful stay,positive\n\
             Dirty room,negative\n\
             It was ok,neutral\n\
             Decent,positive\n"
        );
        let labels: Vec<Sentiment> = repo()
            .load_labeled(&out)
            .unwrap()
            .rows()
            .iter()
            .map(|r| r.sentiment)
            .collect();
        assert_eq!(
            labels,
            vec![Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral, Sentiment::Positive]
        );
    }

    #[test]
    fn rerun_is_byte_identical_and_clears_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw.csv");
        let out = dir.path().join("labeled.csv");
        fs::write(&raw, RAW).unwrap();

        run_preprocessing(&repo(), &raw, &out).unwrap();
        let first = fs::read(&out).unwrap();

        let mut ds = repo().load_labeled(&out).unwrap();
        let first_id = ds.rows()[0].id;
        ds.annotate(vec![(first_id, Sentiment::Negative)]);
        repo().save_labeled(&out, &ds).unwrap();
        assert_ne!(fs::read(&out).unwrap(), first);

        run_preprocessing(&repo(), &raw, &out).unwrap();
        assert_eq!(fs::read(&out).unwrap(), first);
    }

    #[test]
    fn all_rows_filtered_is_empty_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw.csv");
        let out = dir.path().join("labeled.csv");
        fs::write(&raw, "reviews.text,reviews.rating\n,5\nno rating,\n").unwrap();

        let report = run_preprocessing(&repo(), &raw, &out).unwrap();

        assert!(report.is_empty());
        assert_eq!(report.rows_in, 2);
        assert_eq!(fs::read_to_string(&out).unwrap(), "text,sentiment\n");
    }

    #[test]
    fn missing_raw_source_fails_without_touching_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("labeled.csv");
        fs::write(&out, "text,sentiment\nkeep,neutral\n").unwrap();

        let err = run_preprocessing(&repo(), &dir.path().join("absent.csv"), &out).unwrap_err();

        assert!(matches!(err, SentimentError::DataAccess { .. }));
        assert_eq!(fs::read_to_string(&out).unwrap(), "text,sentiment\nkeep,neutral\n");
    }
}
