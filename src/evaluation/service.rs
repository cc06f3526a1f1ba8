//! Reproducible sampling and the agreement metric between model and rating labels.
//!
//! Agreement is a consistency signal, not accuracy: the reference label comes from a
//! star-rating threshold, not from human annotation.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::data::domain::{LabeledDataset, RowId, Sentiment};

use super::domain::MetricsSnapshot;

/// Draw `min(sample_size, len)` distinct rows with a fixed seed.
///
/// The same dataset, size and seed always yield the same ids in the same order.
pub fn sample_ids(dataset: &LabeledDataset, sample_size: usize, seed: u64) -> Vec<RowId> {
    let amount = sample_size.min(dataset.len());
    let mut rng = StdRng::seed_from_u64(seed);
    rand::seq::index::sample(&mut rng, dataset.len(), amount)
        .into_iter()
        .map(|pos| dataset.rows()[pos].id)
        .collect()
}

/// Fraction of `(predicted, reference)` pairs that match; `0.0` for no pairs.
pub fn label_agreement<I>(pairs: I) -> f64
where
    I: IntoIterator<Item = (Sentiment, Sentiment)>,
{
    let (matches, total) = pairs
        .into_iter()
        .fold((0usize, 0usize), |(m, t), (predicted, reference)| {
            (m + usize::from(predicted == reference), t + 1)
        });
    if total == 0 {
        0.0
    } else {
        matches as f64 / total as f64
    }
}

pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Score predictions for sampled rows against their rating labels.
pub fn score(dataset: &LabeledDataset, predictions: &[(RowId, Sentiment)]) -> MetricsSnapshot {
    let pairs = predictions.iter().filter_map(|(id, predicted)| {
        dataset.get(*id).map(|row| (*predicted, row.sentiment))
    });
    MetricsSnapshot {
        sample_size: predictions.len(),
        label_agreement: round4(label_agreement(pairs)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn dataset(n: usize) -> LabeledDataset {
        LabeledDataset::from_labeled(
            (0..n).map(|i| (format!("review {i}"), Sentiment::ALL[i % 3])),
        )
    }

    #[test]
    fn sampling_is_reproducible_and_distinct() {
        let ds = dataset(200);
        let first = sample_ids(&ds, 20, 42);
        let second = sample_ids(&ds, 20, 42);

        assert_eq!(first, second);
        assert_eq!(first.iter().collect::<HashSet<_>>().len(), 20);
        assert_ne!(first, sample_ids(&ds, 20, 7));
    }

    #[test]
    fn sample_is_clamped_to_dataset() {
        let ds = dataset(50);
        let ids = sample_ids(&ds, 10_000, 42);
        assert_eq!(ids.len(), 50);
        assert_eq!(ids.into_iter().collect::<HashSet<_>>().len(), 50);
        assert!(sample_ids(&dataset(0), 5, 42).is_empty());
    }

    #[test]
    fn agreement_bounds() {
        use Sentiment::*;
        assert_eq!(label_agreement(vec![(Positive, Positive), (Neutral, Neutral)]), 1.0);
        assert_eq!(label_agreement(vec![(Positive, Negative)]), 0.0);
        assert_eq!(label_agreement(Vec::new()), 0.0);
        assert_eq!(round4(label_agreement(vec![(Positive, Positive), (Neutral, Negative), (Neutral, Positive)])), 0.3333);
    }

    #[test]
    fn score_uses_row_identity() {
        let ds = dataset(6);
        // rows 0..6 are labeled negative, neutral, positive, negative, ...
        let preds = vec![
            (RowId(5), Sentiment::Positive),
            (RowId(0), Sentiment::Negative),
            (RowId(4), Sentiment::Negative),
        ];
        let snapshot = score(&ds, &preds);
        assert_eq!(snapshot.sample_size, 3);
        assert_eq!(snapshot.label_agreement, 0.6667);
    }
}
