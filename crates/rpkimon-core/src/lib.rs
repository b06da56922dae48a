//! rpkimon Core - certificate resource-overlap analysis
//!
//! Walks the certificate tree published under an RPKI trust anchor and
//! reports pairs of certificates, not on one line of descent, whose
//! Internet number resources intersect.
//!
//! - Resource-set algebra over AS numbers, IPv4 and IPv6
//! - Parallel extraction of the certificate span via manifests
//! - Pairwise overlap detection with per-certificate and global budgets
//! - Policy filtering (ignore rules, tracked SIAs, key-roll grace period)
//! - Report counts and diagnostics

pub mod analysis;
pub mod config;
pub mod decode;
pub mod errors;
pub mod extract;
pub mod logging_facility;
pub mod model;
pub mod overlap;
pub mod policy;
pub mod report;
pub mod resources;

#[doc(hidden)]
pub use rpkimon_core_types;
#[doc(hidden)]
pub use tracing;

pub use analysis::{analyze, AnalysisOutcome};
pub use config::AnalysisConfig;
pub use decode::{JsonObjectDecoder, ObjectDecoder};
pub use errors::{AnalysisError, ExError, ExErrorKind, Result};
pub use extract::{extract_certificate_span, CertificateSpan};
pub use model::{CertificateEntry, ObjectMap, ReachabilityPath};
pub use overlap::{OverlapCluster, OverlapDetector, OverlapLimits, OverlapScan};
pub use policy::{ClusterPolicy, OverlapPolicy};
pub use report::OverlapReport;
pub use resources::{Resource, ResourceSet};
