//! Conversion counters and duration percentiles.
//!
//! Counters are atomics; recent durations sit in a bounded ring behind a
//! mutex. Everything here is in-process only and resets on restart.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConversionErrorKind;

/// Maximum number of duration samples kept in memory.
const MAX_DURATION_SAMPLES: usize = 1000;

/// Conversion metrics collector, shared across request tasks.
#[derive(Debug, Default)]
pub struct ConversionMetrics {
    started: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    timed_out: AtomicU64,
    unknown_converter: AtomicU64,
    input_bytes: AtomicU64,
    output_bytes: AtomicU64,
    durations: Mutex<VecDeque<Duration>>,
}

impl ConversionMetrics {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a conversion start with its upload size.
    pub fn record_started(&self, input_bytes: u64) {
        self.started.fetch_add(1, Ordering::Relaxed);
        self.input_bytes.fetch_add(input_bytes, Ordering::Relaxed);
    }

    /// Record a successful conversion.
    pub fn record_success(&self, duration: Duration, output_bytes: u64) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
        self.output_bytes.fetch_add(output_bytes, Ordering::Relaxed);
        self.add_duration_sample(duration);
    }

    /// Record a failed conversion of the given kind.
    pub fn record_failure(&self, kind: ConversionErrorKind) {
        match kind {
            ConversionErrorKind::UnknownConverter => {
                self.unknown_converter.fetch_add(1, Ordering::Relaxed);
                return;
            }
            ConversionErrorKind::Timeout => {
                self.timed_out.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    fn add_duration_sample(&self, duration: Duration) {
        if let Ok(mut samples) = self.durations.lock() {
            if samples.len() >= MAX_DURATION_SAMPLES {
                samples.pop_front();
            }
            samples.push_back(duration);
        }
    }

    /// Point-in-time copy of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let mut sorted: Vec<Duration> = self
            .durations
            .lock()
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default();
        sorted.sort();

        MetricsSnapshot {
            conversions_started: self.started.load(Ordering::Relaxed),
            conversions_succeeded: self.succeeded.load(Ordering::Relaxed),
            conversions_failed: self.failed.load(Ordering::Relaxed),
            conversions_timed_out: self.timed_out.load(Ordering::Relaxed),
            unknown_converter_requests: self.unknown_converter.load(Ordering::Relaxed),
            total_input_bytes: self.input_bytes.load(Ordering::Relaxed),
            total_output_bytes: self.output_bytes.load(Ordering::Relaxed),
            duration_p50_ms: percentile_ms(&sorted, 50),
            duration_p95_ms: percentile_ms(&sorted, 95),
            duration_p99_ms: percentile_ms(&sorted, 99),
            sample_count: sorted.len() as u64,
        }
    }
}

fn percentile_ms(sorted: &[Duration], pct: usize) -> Option<u64> {
    if sorted.is_empty() {
        return None;
    }
    let idx = (sorted.len() * pct / 100).min(sorted.len() - 1);
    Some(sorted[idx].as_millis() as u64)
}

/// A point-in-time snapshot of conversion metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Conversions that passed converter lookup.
    pub conversions_started: u64,
    /// Conversions that returned a file.
    pub conversions_succeeded: u64,
    /// Conversions that failed after starting, timeouts included.
    pub conversions_failed: u64,
    /// Conversions killed at the timeout.
    pub conversions_timed_out: u64,
    /// Requests naming a converter that does not exist.
    pub unknown_converter_requests: u64,
    /// Uploaded bytes for started conversions.
    pub total_input_bytes: u64,
    /// Bytes returned to clients.
    pub total_output_bytes: u64,
    /// Median successful conversion time.
    pub duration_p50_ms: Option<u64>,
    /// 95th percentile conversion time.
    pub duration_p95_ms: Option<u64>,
    /// 99th percentile conversion time.
    pub duration_p99_ms: Option<u64>,
    /// Number of duration samples behind the percentiles.
    pub sample_count: u64,
}
