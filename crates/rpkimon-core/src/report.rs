//! Counts published after filtering, plus the overlap diagnostics.

use std::collections::HashSet;

use tracing::{error, info};

use crate::overlap::OverlapCluster;
use crate::resources::ResourceSet;

/// Below this many clusters the count is informational
const MAX_QUIET_CLUSTERS: usize = 20;
const SAMPLE_CLUSTERS: usize = 3;
const MAX_PRINTED_RESOURCES: usize = 10;
const MAX_PRINTED_CERT_URIS: usize = 50;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlapReport {
    /// Certificates reached from the trust anchor
    pub total_certificates: usize,

    /// Distinct certificates in at least one reported cluster
    pub overlapping_certificates: usize,

    /// Maximal contiguous resources in the union of all intersections
    pub overlapping_resources: usize,

    pub overlapping_resource_set: ResourceSet,
    pub clusters: Vec<OverlapCluster>,
}

impl OverlapReport {
    pub fn compute(total_certificates: usize, clusters: Vec<OverlapCluster>) -> Self {
        let overlapping_certificates = clusters
            .iter()
            .flat_map(|c| c.members().iter().map(|m| &m.path))
            .collect::<HashSet<_>>()
            .len();
        let overlapping_resource_set = clusters
            .iter()
            .fold(ResourceSet::empty(), |acc, c| acc.union(c.intersection()));

        Self {
            total_certificates,
            overlapping_certificates,
            overlapping_resources: overlapping_resource_set.len(),
            overlapping_resource_set,
            clusters,
        }
    }

    pub fn has_overlaps(&self) -> bool {
        !self.clusters.is_empty()
    }

    /// Distinct member URIs, in cluster order
    pub fn overlapping_uris(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.clusters
            .iter()
            .flat_map(|c| c.members().iter())
            .filter(|m| seen.insert(m.path.clone()))
            .map(|m| m.uri.as_str())
            .collect()
    }

    pub fn log_summary(&self) {
        let count = self.clusters.len();
        if count <= MAX_QUIET_CLUSTERS {
            info!(cluster_count = count, "overlaps after filtering");
        } else {
            error!(
                cluster_count = count,
                "too many overlaps after filtering, printing {} samples", SAMPLE_CLUSTERS
            );
            for cluster in self.clusters.iter().take(SAMPLE_CLUSTERS) {
                info!("{}", describe_cluster(cluster));
            }
        }

        if self.overlapping_resources > 0 {
            let resources: Vec<String> = self
                .overlapping_resource_set
                .iter()
                .take(MAX_PRINTED_RESOURCES)
                .map(|r| r.to_string())
                .collect();
            info!(
                resource_count = self.overlapping_resources,
                "overlapping resources (max {}): {}",
                MAX_PRINTED_RESOURCES,
                resources.join(", ")
            );
        }

        if self.overlapping_certificates > 0 {
            let uris: Vec<&str> = self
                .overlapping_uris()
                .into_iter()
                .take(MAX_PRINTED_CERT_URIS)
                .collect();
            info!(
                certificate_count = self.overlapping_certificates,
                "certificates with overlap (max {}): {}",
                MAX_PRINTED_CERT_URIS,
                uris.join(", ")
            );
        }
    }
}

/// Multi-line description of both members, their overlap and symmetric difference
pub fn describe_cluster(cluster: &OverlapCluster) -> String {
    let member = |entry: &crate::model::CertificateEntry| {
        let certificate = entry.certificate.as_deref();
        format!(
            "{} {} notBefore={} notAfter={} uri={} SIA={}",
            entry.subject().unwrap_or("-"),
            entry.path,
            certificate.map_or_else(|| "-".to_string(), |c| c.not_before.to_rfc3339()),
            certificate.map_or_else(|| "-".to_string(), |c| c.not_after.to_rfc3339()),
            entry.uri,
            entry.sia().unwrap_or("-"),
        )
    };
    let difference = cluster.symmetric_difference();
    format!(
        "Found intersection between\n{} and\n{}.\nOverlap: {}.\nSymmetric difference: {}",
        member(cluster.first()),
        member(cluster.second()),
        cluster.intersection(),
        if difference.is_empty() {
            "∅".to_string()
        } else {
            difference.to_string()
        }
    )
}
