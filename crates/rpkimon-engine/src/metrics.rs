//! Metrics sink seam and an in-memory gauge implementation.
//!
//! Gauges are overwritten by every successful run and left untouched by a
//! failed one; the run counters only ever increase.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rpkimon_core::errors::ExError;
use rpkimon_core::OverlapReport;

pub const METRIC_CERTIFICATE_COUNT: &str = "rpkimonitoring.certificate.analysis.certificate.count";
pub const METRIC_OVERLAPPING_CERTIFICATE_COUNT: &str =
    "rpkimonitoring.certificate.analysis.overlapping.certificate.count";
pub const METRIC_OVERLAPPING_RESOURCE_COUNT: &str =
    "rpkimonitoring.certificate.analysis.overlapping.resource.count";
pub const METRIC_COMPARISON_DURATION: &str =
    "rpkimonitoring.certificate.analysis.comparison.duration";
pub const METRIC_RUNS: &str = "rpkimonitoring.certificate.analysis.runs";

/// Receives the outcome of every analysis run
pub trait MetricsSink: Send + Sync {
    /// Overwrite the gauges with the counts of a successful run
    fn publish(&self, report: &OverlapReport, comparison_duration: Duration);

    /// Count a failed run; previously published gauges stay as they are
    fn record_failure(&self, error: &ExError);
}

/// Point-in-time copy of a [`GaugeSink`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GaugeSnapshot {
    pub certificate_count: u64,
    pub overlapping_certificate_count: u64,
    pub overlapping_resource_count: u64,
    pub comparison_duration_ms: u64,
    pub runs_passed: u64,
    pub runs_failed: u64,
}

impl GaugeSnapshot {
    /// `(metric name, value)` pairs for exporters
    pub fn gauges(&self) -> [(&'static str, u64); 4] {
        [
            (METRIC_CERTIFICATE_COUNT, self.certificate_count),
            (
                METRIC_OVERLAPPING_CERTIFICATE_COUNT,
                self.overlapping_certificate_count,
            ),
            (
                METRIC_OVERLAPPING_RESOURCE_COUNT,
                self.overlapping_resource_count,
            ),
            (METRIC_COMPARISON_DURATION, self.comparison_duration_ms),
        ]
    }
}

#[derive(Debug, Default)]
pub struct GaugeSink {
    certificate_count: AtomicU64,
    overlapping_certificate_count: AtomicU64,
    overlapping_resource_count: AtomicU64,
    comparison_duration_ms: AtomicU64,
    runs_passed: AtomicU64,
    runs_failed: AtomicU64,
}

impl GaugeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> GaugeSnapshot {
        GaugeSnapshot {
            certificate_count: self.certificate_count.load(Ordering::SeqCst),
            overlapping_certificate_count: self.overlapping_certificate_count.load(Ordering::SeqCst),
            overlapping_resource_count: self.overlapping_resource_count.load(Ordering::SeqCst),
            comparison_duration_ms: self.comparison_duration_ms.load(Ordering::SeqCst),
            runs_passed: self.runs_passed.load(Ordering::SeqCst),
            runs_failed: self.runs_failed.load(Ordering::SeqCst),
        }
    }
}

impl MetricsSink for GaugeSink {
    fn publish(&self, report: &OverlapReport, comparison_duration: Duration) {
        self.certificate_count
            .store(report.total_certificates as u64, Ordering::SeqCst);
        self.overlapping_certificate_count
            .store(report.overlapping_certificates as u64, Ordering::SeqCst);
        self.overlapping_resource_count
            .store(report.overlapping_resources as u64, Ordering::SeqCst);
        self.comparison_duration_ms
            .store(comparison_duration.as_millis() as u64, Ordering::SeqCst);
        self.runs_passed.fetch_add(1, Ordering::SeqCst);
    }

    fn record_failure(&self, _error: &ExError) {
        self.runs_failed.fetch_add(1, Ordering::SeqCst);
    }
}
