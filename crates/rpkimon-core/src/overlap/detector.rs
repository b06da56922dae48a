use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::cluster::OverlapCluster;
use crate::errors::{AnalysisError, Result};
use crate::model::CertificateEntry;

/// Certificates taking part in more overlaps than this are left out entirely
pub const DEFAULT_MAX_PAIRS_PER_CERTIFICATE: usize = 32;

/// Candidate overlaps beyond this abort the comparison
pub const DEFAULT_MAX_TOTAL_PAIRS: usize = 65_536;

/// Maximum number of URIs printed when a certificate trips its budget
const MAX_PRINTED_URIS: usize = 50;

/// Circuit-breaker thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlapLimits {
    pub max_pairs_per_certificate: usize,
    pub max_total_pairs: usize,
}

impl Default for OverlapLimits {
    fn default() -> Self {
        Self {
            max_pairs_per_certificate: DEFAULT_MAX_PAIRS_PER_CERTIFICATE,
            max_total_pairs: DEFAULT_MAX_TOTAL_PAIRS,
        }
    }
}

/// Result of one comparison, before policy filtering
#[derive(Debug, Clone, Default)]
pub struct OverlapScan {
    /// Accepted pairs, ordered by member paths
    pub clusters: Vec<OverlapCluster>,

    /// Certificates whose overlaps were dropped by the per-certificate budget
    pub discarded_certificates: Vec<Arc<CertificateEntry>>,

    /// Candidate overlaps found before the per-certificate filter
    pub candidate_pairs: usize,
}

#[derive(Debug, Clone, Default)]
pub struct OverlapDetector {
    limits: OverlapLimits,
}

impl OverlapDetector {
    pub fn new(limits: OverlapLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> OverlapLimits {
        self.limits
    }

    /// Compare every unordered pair of entries
    ///
    /// The outer loop runs on the rayon pool; per-certificate and total
    /// counters are atomics. Whether a certificate is discarded is decided
    /// only after the scan completes, so the accepted set depends on the
    /// input alone. Rows are skipped once the total already exceeds the
    /// ceiling: the outcome is then a failure whatever the interleaving.
    ///
    /// # Errors
    ///
    /// `OverlapBudgetExceeded` when the candidate count (counted before the
    /// per-certificate filter) exceeds `max_total_pairs`.
    pub fn detect(&self, entries: &[Arc<CertificateEntry>]) -> Result<OverlapScan> {
        let n = entries.len();
        let per_certificate: Vec<AtomicUsize> = (0..n).map(|_| AtomicUsize::new(0)).collect();
        let total = AtomicUsize::new(0);
        let ceiling = self.limits.max_total_pairs;

        let candidates: Vec<(usize, usize)> = (0..n)
            .into_par_iter()
            .flat_map_iter(|i| {
                if total.load(Ordering::Relaxed) > ceiling {
                    return Vec::new();
                }
                let lhs = &entries[i];
                let row: Vec<(usize, usize)> = (i + 1..n)
                    .filter(|&j| {
                        let rhs = &entries[j];
                        !lhs.path.is_ancestor_related(&rhs.path)
                            && lhs.resources.intersects(&rhs.resources)
                    })
                    .map(|j| (i, j))
                    .collect();
                for &(_, j) in &row {
                    per_certificate[j].fetch_add(1, Ordering::Relaxed);
                }
                per_certificate[i].fetch_add(row.len(), Ordering::Relaxed);
                total.fetch_add(row.len(), Ordering::Relaxed);
                row
            })
            .collect();

        let candidate_pairs = total.load(Ordering::SeqCst);

        let discarded: Vec<bool> = per_certificate
            .iter()
            .map(|count| count.load(Ordering::SeqCst) > self.limits.max_pairs_per_certificate)
            .collect();
        let discarded_certificates: Vec<Arc<CertificateEntry>> = discarded
            .iter()
            .enumerate()
            .filter(|&(_, &dropped)| dropped)
            .map(|(idx, _)| entries[idx].clone())
            .collect();

        if candidate_pairs > ceiling {
            error!(
                candidate_pairs,
                limit = ceiling,
                certificate_count = n,
                "too many overlaps to process"
            );
            return Err(AnalysisError::OverlapBudgetExceeded {
                total: candidate_pairs,
                limit: ceiling,
            });
        }

        for (idx, _) in discarded.iter().enumerate().filter(|&(_, &d)| d) {
            log_budget_tripped(entries, &candidates, idx, &per_certificate[idx]);
        }

        let mut clusters: Vec<OverlapCluster> = candidates
            .par_iter()
            .filter(|&&(i, j)| !discarded[i] && !discarded[j])
            .filter_map(|&(i, j)| OverlapCluster::new(entries[i].clone(), entries[j].clone()))
            .collect();
        clusters.sort_by(|a, b| {
            (&a.first().path, &a.second().path).cmp(&(&b.first().path, &b.second().path))
        });

        info!(
            certificate_count = n,
            candidate_pairs,
            cluster_count = clusters.len(),
            discarded_count = discarded_certificates.len(),
            "finished overlap check"
        );

        Ok(OverlapScan {
            clusters,
            discarded_certificates,
            candidate_pairs,
        })
    }
}

fn log_budget_tripped(
    entries: &[Arc<CertificateEntry>],
    candidates: &[(usize, usize)],
    idx: usize,
    count: &AtomicUsize,
) {
    let involved: Vec<&str> = candidates
        .iter()
        .filter_map(|&(i, j)| match (i == idx, j == idx) {
            (true, _) => Some(entries[j].uri.as_str()),
            (_, true) => Some(entries[i].uri.as_str()),
            _ => None,
        })
        .take(MAX_PRINTED_URIS)
        .collect();
    error!(
        uri = entries[idx].uri.as_str(),
        path = %entries[idx].path,
        overlap_count = count.load(Ordering::SeqCst),
        involved = involved.join(", ").as_str(),
        "too many overlaps for certificate, discarding them"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReachabilityPath;

    fn entry(idx: usize, resources: &str) -> Arc<CertificateEntry> {
        Arc::new(CertificateEntry::new(
            format!("rsync://example.net/repo/{}.cer", idx),
            resources.parse().unwrap(),
            ReachabilityPath::root().child(idx),
        ))
    }

    #[test]
    fn test_disjoint_entries_do_not_overlap() {
        let entries = vec![entry(0, "192.0.2.0/24"), entry(1, "198.51.100.0/24")];
        let scan = OverlapDetector::default().detect(&entries).unwrap();
        assert!(scan.clusters.is_empty());
        assert_eq!(scan.candidate_pairs, 0);
    }

    #[test]
    fn test_budget_counts_each_certificate() {
        let limits = OverlapLimits {
            max_pairs_per_certificate: 1,
            max_total_pairs: 100,
        };
        // 0 overlaps 1 and 2; 3 and 4 only overlap each other
        let entries = vec![
            entry(0, "10.0.0.0/16"),
            entry(1, "10.0.0.0/24"),
            entry(2, "10.0.1.0/24"),
            entry(3, "AS64496"),
            entry(4, "AS64496"),
        ];
        let scan = OverlapDetector::new(limits).detect(&entries).unwrap();
        assert_eq!(scan.candidate_pairs, 3);
        assert_eq!(scan.discarded_certificates.len(), 1);
        assert_eq!(scan.discarded_certificates[0].uri, entries[0].uri);
        assert_eq!(scan.clusters.len(), 1);
        assert_eq!(scan.clusters[0].first().uri, entries[3].uri);
    }

    #[test]
    fn test_ceiling_is_exclusive() {
        let limits = OverlapLimits {
            max_pairs_per_certificate: 32,
            max_total_pairs: 3,
        };
        let three: Vec<_> = (0..3).map(|i| entry(i, "192.0.2.0/24")).collect();
        assert_eq!(OverlapDetector::new(limits).detect(&three).unwrap().clusters.len(), 3);

        let four: Vec<_> = (0..4).map(|i| entry(i, "192.0.2.0/24")).collect();
        assert!(matches!(
            OverlapDetector::new(limits).detect(&four),
            Err(AnalysisError::OverlapBudgetExceeded { .. })
        ));
    }
}
