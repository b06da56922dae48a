use std::sync::Arc;

use crate::model::CertificateEntry;
use crate::resources::ResourceSet;

/// Two certificates, not ancestor-related, whose resources intersect
///
/// Always a pair: entries linked transitively through a shared resource are
/// reported as separate pairs, never merged. Members are ordered by path so
/// that `{a, b}` and `{b, a}` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverlapCluster {
    members: [Arc<CertificateEntry>; 2],
    intersection: ResourceSet,
}

impl OverlapCluster {
    /// `None` when the resources do not intersect or the entries are
    /// ancestor-related
    pub fn new(a: Arc<CertificateEntry>, b: Arc<CertificateEntry>) -> Option<Self> {
        if a.path.is_ancestor_related(&b.path) || a == b {
            return None;
        }
        let intersection = a.resources.intersection(&b.resources);
        if intersection.is_empty() {
            return None;
        }
        let members = if a.path <= b.path { [a, b] } else { [b, a] };
        Some(Self {
            members,
            intersection,
        })
    }

    pub fn members(&self) -> &[Arc<CertificateEntry>; 2] {
        &self.members
    }

    pub fn first(&self) -> &CertificateEntry {
        &self.members[0]
    }

    pub fn second(&self) -> &CertificateEntry {
        &self.members[1]
    }

    pub fn intersection(&self) -> &ResourceSet {
        &self.intersection
    }

    /// Resources held by exactly one member; diagnostics only
    pub fn symmetric_difference(&self) -> ResourceSet {
        self.members[0]
            .resources
            .symmetric_difference(&self.members[1].resources)
    }

    pub fn involves(&self, entry: &CertificateEntry) -> bool {
        self.members.iter().any(|m| m.as_ref() == entry)
    }
}
