//! Request instrumentation for the inference service, rendered in the Prometheus
//! text exposition format.
//!
//! All updates are lock-free atomics, so concurrent requests never lose increments.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::data::domain::Sentiment;

pub const REQUESTS_TOTAL: &str = "sentiment_requests_total";
pub const PREDICTIONS_TOTAL: &str = "sentiment_predictions_total";
pub const LATENCY: &str = "sentiment_request_latency_seconds";

/// Upper bounds (seconds) of the latency buckets; `+Inf` is implicit.
pub const LATENCY_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug, Default)]
struct LatencyHistogram {
    // Non-cumulative; the last slot is the +Inf overflow.
    buckets: [AtomicU64; LATENCY_BUCKETS.len() + 1],
    sum_micros: AtomicU64,
    count: AtomicU64,
}

impl LatencyHistogram {
    fn observe(&self, elapsed: Duration) {
        let secs = elapsed.as_secs_f64();
        let slot = LATENCY_BUCKETS
            .iter()
            .position(|bound| secs <= *bound)
            .unwrap_or(LATENCY_BUCKETS.len());
        self.buckets[slot].fetch_add(1, Ordering::Relaxed);
        self.sum_micros
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Debug, Default)]
pub struct ServiceMetrics {
    requests: AtomicU64,
    predictions: [AtomicU64; 3],
    latency: LatencyHistogram,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_label(&self, label: Sentiment) {
        self.predictions[label.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_latency(&self, elapsed: Duration) {
        self.latency.observe(elapsed);
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn predictions(&self, label: Sentiment) -> u64 {
        self.predictions[label.index()].load(Ordering::Relaxed)
    }

    pub fn latency_count(&self) -> u64 {
        self.latency.count.load(Ordering::Relaxed)
    }

    /// Text exposition of every counter and the latency histogram.
    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "# HELP {REQUESTS_TOTAL} Total prediction requests.");
        let _ = writeln!(out, "# TYPE {REQUESTS_TOTAL} counter");
        let _ = writeln!(out, "{REQUESTS_TOTAL} {}", self.requests());

        let _ = writeln!(out, "# HELP {PREDICTIONS_TOTAL} Predicted labels by sentiment.");
        let _ = writeln!(out, "# TYPE {PREDICTIONS_TOTAL} counter");
        for label in Sentiment::ALL {
            let _ = writeln!(
                out,
                "{PREDICTIONS_TOTAL}{{label=\"{label}\"}} {}",
                self.predictions(label)
            );
        }

        let _ = writeln!(out, "# HELP {LATENCY} Prediction request latency.");
        let _ = writeln!(out, "# TYPE {LATENCY} histogram");
        let mut cumulative = 0u64;
        for (bound, bucket) in LATENCY_BUCKETS.iter().zip(&self.latency.buckets) {
            cumulative += bucket.load(Ordering::Relaxed);
            let _ = writeln!(out, "{LATENCY}_bucket{{le=\"{bound}\"}} {cumulative}");
        }
        cumulative += self.latency.buckets[LATENCY_BUCKETS.len()].load(Ordering::Relaxed);
        let _ = writeln!(out, "{LATENCY}_bucket{{le=\"+Inf\"}} {cumulative}");
        let sum = self.latency.sum_micros.load(Ordering::Relaxed) as f64 / 1_000_000.0;
        let _ = writeln!(out, "{LATENCY}_sum {sum}");
        let _ = writeln!(out, "{LATENCY}_count {}", self.latency_count());

        out
    }
}
