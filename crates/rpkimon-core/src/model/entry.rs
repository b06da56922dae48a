use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::certificate::ResourceCertificate;
use super::path::ReachabilityPath;
use crate::resources::ResourceSet;

/// One certificate reached while walking the manifest tree
///
/// The URI alone is not unique (aliased manifest chains can reach the same
/// object twice); the reachability path is. Equality and hashing use both.
#[derive(Debug, Clone)]
pub struct CertificateEntry {
    pub uri: String,
    pub resources: ResourceSet,
    pub path: ReachabilityPath,

    /// Decoded certificate, kept for diagnostics only
    pub certificate: Option<Arc<ResourceCertificate>>,
}

impl CertificateEntry {
    pub fn new(uri: impl Into<String>, resources: ResourceSet, path: ReachabilityPath) -> Self {
        Self {
            uri: uri.into(),
            resources,
            path,
            certificate: None,
        }
    }

    pub fn from_certificate(
        uri: impl Into<String>,
        certificate: ResourceCertificate,
        path: ReachabilityPath,
    ) -> Self {
        Self {
            uri: uri.into(),
            resources: certificate.resources.clone(),
            path,
            certificate: Some(Arc::new(certificate)),
        }
    }

    /// Manifest SIA of the underlying certificate
    pub fn sia(&self) -> Option<&str> {
        self.certificate
            .as_deref()
            .and_then(|c| c.manifest_uri.as_deref())
    }

    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.certificate.as_deref().map(|c| c.not_before)
    }

    pub fn subject(&self) -> Option<&str> {
        self.certificate.as_deref().map(|c| c.subject.as_str())
    }
}

impl PartialEq for CertificateEntry {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri && self.path == other.path
    }
}

impl Eq for CertificateEntry {}

impl Hash for CertificateEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
        self.path.hash(state);
    }
}

/// One entry lies on the other's path from the root
pub fn are_ancestors(a: &CertificateEntry, b: &CertificateEntry) -> bool {
    a.path.is_ancestor_related(&b.path)
}
