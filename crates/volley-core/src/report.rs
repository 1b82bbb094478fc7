//! Aggregate outcomes into a run summary (counts, status codes, latency).

use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::outcome::Outcome;

/// Latency distribution in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LatencyStats {
    pub min_ms: f64,
    pub mean_ms: f64,
    pub p50_ms: f64,
    pub p90_ms: f64,
    pub p99_ms: f64,
    pub max_ms: f64,
}

/// Result of a whole run, ready for printing or JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total: u64,
    pub successes: u64,
    pub failures: u64,
    /// Count per HTTP status, including non-2xx failures.
    pub status_counts: BTreeMap<u32, u64>,
    /// Count per failure category ("timeout", "connection", "http 503", ...).
    pub failure_counts: BTreeMap<String, u64>,
    pub bytes_received: u64,
    pub elapsed_secs: f64,
    pub requests_per_sec: f64,
    /// `None` when no request was executed.
    pub latency: Option<LatencyStats>,
}

/// Accumulates outcomes as they are drained from the dispatcher.
#[derive(Debug, Default)]
pub struct SummaryBuilder {
    successes: u64,
    failures: u64,
    status_counts: BTreeMap<u32, u64>,
    failure_counts: BTreeMap<String, u64>,
    bytes_received: u64,
    latencies: Vec<Duration>,
}

impl SummaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &Outcome) {
        if let Some(status) = outcome.status() {
            *self.status_counts.entry(status).or_default() += 1;
        }
        match &outcome.result {
            Ok(resp) => {
                self.successes += 1;
                self.bytes_received += resp.body_len;
            }
            Err(_) => {
                self.failures += 1;
                if let Some(kind) = outcome.failure_kind() {
                    *self.failure_counts.entry(kind.to_string()).or_default() += 1;
                }
            }
        }
        self.latencies.push(outcome.elapsed);
    }

    pub fn finish(mut self, elapsed: Duration) -> Summary {
        let total = self.successes + self.failures;
        let elapsed_secs = elapsed.as_secs_f64();
        let requests_per_sec = if elapsed_secs > 0.0 {
            total as f64 / elapsed_secs
        } else {
            0.0
        };
        self.latencies.sort_unstable();
        Summary {
            total,
            successes: self.successes,
            failures: self.failures,
            status_counts: self.status_counts,
            failure_counts: self.failure_counts,
            bytes_received: self.bytes_received,
            elapsed_secs,
            requests_per_sec,
            latency: latency_stats(&self.latencies),
        }
    }
}

/// Stats over an ascending-sorted slice.
fn latency_stats(sorted: &[Duration]) -> Option<LatencyStats> {
    let (first, last) = (sorted.first()?, sorted.last()?);
    let ms = |d: &Duration| d.as_secs_f64() * 1000.0;
    let sum: f64 = sorted.iter().map(ms).sum();
    Some(LatencyStats {
        min_ms: ms(first),
        mean_ms: sum / sorted.len() as f64,
        p50_ms: ms(percentile(sorted, 50)),
        p90_ms: ms(percentile(sorted, 90)),
        p99_ms: ms(percentile(sorted, 99)),
        max_ms: ms(last),
    })
}

/// Nearest-rank percentile; `sorted` must be non-empty.
fn percentile(sorted: &[Duration], pct: usize) -> &Duration {
    let rank = (pct * sorted.len()).div_ceil(100).max(1);
    &sorted[rank - 1]
}
