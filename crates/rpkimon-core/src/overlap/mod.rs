//! Pairwise overlap detection with circuit breakers.
//!
//! ## Responsibilities
//!
//! - Compare every unordered pair of entries that are not ancestor-related
//! - Drop every pair of a certificate that takes part in too many overlaps
//! - Fail the whole comparison when the candidate count passes a ceiling

pub mod cluster;
pub mod detector;

pub use cluster::OverlapCluster;
pub use detector::{OverlapDetector, OverlapLimits, OverlapScan};
