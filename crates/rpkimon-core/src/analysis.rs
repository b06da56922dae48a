//! One full analysis over a snapshot: extract, compare, filter, count.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::AnalysisConfig;
use crate::decode::ObjectDecoder;
use crate::errors::Result;
use crate::extract::extract_certificate_span;
use crate::model::{CertificateEntry, ObjectMap};
use crate::overlap::OverlapDetector;
use crate::policy::OverlapPolicy;
use crate::report::OverlapReport;

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub report: OverlapReport,

    /// Wall-clock time spent in the pairwise comparison
    pub comparison_duration: Duration,

    /// Certificates left out by the per-certificate budget
    pub discarded_certificates: Vec<Arc<CertificateEntry>>,

    /// Overlaps found before policy filtering
    pub unfiltered_clusters: usize,
}

/// Run the analysis for the trust anchor in `config`
///
/// Extraction failures are local and never surface here. The only error is
/// a comparison that exceeds the global overlap ceiling, in which case no
/// partial report exists.
///
/// # Errors
///
/// `OverlapBudgetExceeded` from the overlap detector.
pub fn analyze(
    objects: &ObjectMap,
    decoder: &dyn ObjectDecoder,
    config: &AnalysisConfig,
    now: DateTime<Utc>,
) -> Result<AnalysisOutcome> {
    info!(object_count = objects.len(), "processing snapshot");

    let entries: Vec<Arc<CertificateEntry>> =
        extract_certificate_span(objects, decoder, &config.trust_anchor_uri)
            .map(Arc::new)
            .collect();
    info!(certificate_count = entries.len(), "expanded certificates");

    let start = Instant::now();
    let scan = OverlapDetector::new(config.limits).detect(&entries)?;
    let comparison_duration = start.elapsed();

    let unfiltered_clusters = scan.clusters.len();
    let clusters = OverlapPolicy::from_config(config).filter(scan.clusters, now);
    let report = OverlapReport::compute(entries.len(), clusters);
    report.log_summary();

    Ok(AnalysisOutcome {
        report,
        comparison_duration,
        discarded_certificates: scan.discarded_certificates,
        unfiltered_clusters,
    })
}
