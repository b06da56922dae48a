//! rpkimon Engine - Orchestration layer
//!
//! Runs one certificate analysis per snapshot refresh, owns the
//! start/end lifecycle events and hands the counts to a metrics sink.

pub mod commands;
pub mod metrics;

pub use commands::analysis::{run_certificate_analysis, run_certificate_analysis_at, AnalysisRun};
pub use metrics::{GaugeSink, GaugeSnapshot, MetricsSink};
