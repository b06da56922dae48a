//! Certificate analysis run with boundary logging and metrics.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rpkimon_core::errors::ExError;
use rpkimon_core::{analyze, AnalysisConfig, ObjectDecoder, ObjectMap, OverlapReport};
use rpkimon_core_types::RunContext;

use crate::metrics::MetricsSink;

const OP: &str = "certificate_analysis";

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub context: RunContext,
    pub report: OverlapReport,
    pub comparison_duration: Duration,
    pub discarded_certificates: usize,
}

/// Analyse one snapshot as of now
///
/// # Errors
///
/// `ERR_OVERLAP_BUDGET_EXCEEDED` when the comparison aborts. The sink then
/// records a failure instead of publishing.
pub fn run_certificate_analysis(
    ctx: &RunContext,
    objects: &ObjectMap,
    decoder: &dyn ObjectDecoder,
    config: &AnalysisConfig,
    sink: &dyn MetricsSink,
) -> Result<AnalysisRun, ExError> {
    run_certificate_analysis_at(ctx, objects, decoder, config, sink, Utc::now())
}

/// Analyse one snapshot, evaluating the grace period against `now`
///
/// # Errors
///
/// As [`run_certificate_analysis`].
pub fn run_certificate_analysis_at(
    ctx: &RunContext,
    objects: &ObjectMap,
    decoder: &dyn ObjectDecoder,
    config: &AnalysisConfig,
    sink: &dyn MetricsSink,
    now: DateTime<Utc>,
) -> Result<AnalysisRun, ExError> {
    let span = tracing::info_span!("certificate_analysis", run_id = %ctx.run_id);
    let _guard = span.enter();

    let start = Instant::now();
    rpkimon_core::log_op_start!(
        OP,
        trust_anchor = config.trust_anchor_uri.as_str(),
        object_count = objects.len()
    );

    let outcome = analyze(objects, decoder, config, now).map_err(|e| {
        let mut err = ExError::from(e).with_run_id(ctx.run_id.clone());
        if let Some(trace_id) = &ctx.trace_id {
            err = err.with_trace_id(trace_id.clone());
        }
        let duration_ms = start.elapsed().as_millis() as u64;
        rpkimon_core::log_op_error!(OP, err.clone(), duration_ms = duration_ms);
        sink.record_failure(&err);
        err
    })?;

    sink.publish(&outcome.report, outcome.comparison_duration);

    let duration_ms = start.elapsed().as_millis() as u64;
    rpkimon_core::log_op_end!(
        OP,
        duration_ms = duration_ms,
        certificate_count = outcome.report.total_certificates,
        cluster_count = outcome.report.clusters.len()
    );

    Ok(AnalysisRun {
        context: ctx.clone(),
        report: outcome.report,
        comparison_duration: outcome.comparison_duration,
        discarded_certificates: outcome.discarded_certificates.len(),
    })
}
