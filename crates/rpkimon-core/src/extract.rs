//! Top-down extraction of the certificate span reachable from a trust anchor.
//!
//! Every certificate found is expanded into its manifest's child
//! certificates on the rayon pool. A failure at one node (missing object,
//! undecodable certificate or manifest, router certificate) prunes that
//! subtree only and is logged; siblings carry on.

use rayon::prelude::*;
use tracing::{debug, error, warn};

use crate::decode::ObjectDecoder;
use crate::errors::{AnalysisError, Result};
use crate::model::{
    CertificateEntry, DecodedCertificate, ObjectMap, ReachabilityPath, ResourceCertificate,
};

/// File suffix of certificates listed on a manifest
pub const CERTIFICATE_SUFFIX: &str = ".cer";

/// Certificates reached from one trust anchor, in no particular order
///
/// Consumed once; key by `path` (or `uri`) rather than by position.
#[derive(Debug)]
pub struct CertificateSpan {
    entries: std::vec::IntoIter<CertificateEntry>,
}

impl Iterator for CertificateSpan {
    type Item = CertificateEntry;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl ExactSizeIterator for CertificateSpan {}

/// Walk manifests from `trust_anchor_uri` and collect every resource
/// certificate reached. A missing trust anchor yields an empty span.
pub fn extract_certificate_span(
    objects: &ObjectMap,
    decoder: &dyn ObjectDecoder,
    trust_anchor_uri: &str,
) -> CertificateSpan {
    let extractor = Extractor { objects, decoder };
    let entries = extractor.expand(trust_anchor_uri, ReachabilityPath::root(), None);
    debug!(
        trust_anchor = trust_anchor_uri,
        certificate_count = entries.len(),
        "extracted certificate span"
    );
    CertificateSpan {
        entries: entries.into_iter(),
    }
}

/// URIs of the certificates between the root and the current node
struct Lineage<'a> {
    uri: &'a str,
    parent: Option<&'a Lineage<'a>>,
}

impl Lineage<'_> {
    fn contains(&self, uri: &str) -> bool {
        let mut node = Some(self);
        while let Some(current) = node {
            if current.uri == uri {
                return true;
            }
            node = current.parent;
        }
        false
    }
}

struct Extractor<'a> {
    objects: &'a ObjectMap,
    decoder: &'a dyn ObjectDecoder,
}

impl Extractor<'_> {
    fn expand(
        &self,
        uri: &str,
        path: ReachabilityPath,
        lineage: Option<&Lineage<'_>>,
    ) -> Vec<CertificateEntry> {
        if lineage.is_some_and(|l| l.contains(uri)) {
            let err = AnalysisError::CycleDetected {
                uri: uri.to_string(),
            };
            log_pruned(&err, &path);
            return Vec::new();
        }

        let certificate = match self.certificate(uri) {
            Ok(certificate) => certificate,
            Err(err) => {
                log_pruned(&err, &path);
                return Vec::new();
            }
        };

        let manifest_uri = certificate.manifest_uri.clone();
        let entry = CertificateEntry::from_certificate(uri, certificate, path.clone());

        let children = match manifest_uri.as_deref().map(|m| self.children(uri, m)) {
            Some(Ok(children)) => children,
            Some(Err(err)) => {
                log_pruned(&err, &path);
                Vec::new()
            }
            None => {
                debug!(uri, path = %path, "certificate has no manifest SIA");
                Vec::new()
            }
        };

        let here = Lineage {
            uri,
            parent: lineage,
        };
        let mut entries = children
            .par_iter()
            .enumerate()
            .map(|(idx, child_uri)| self.expand(child_uri, path.child(idx), Some(&here)))
            .reduce(Vec::new, |mut acc, mut more| {
                acc.append(&mut more);
                acc
            });
        entries.push(entry);
        entries
    }

    fn certificate(&self, uri: &str) -> Result<ResourceCertificate> {
        let bytes = self
            .objects
            .get(uri)
            .ok_or_else(|| AnalysisError::CertificateNotFound {
                uri: uri.to_string(),
            })?;
        match self.decoder.decode_certificate(uri, bytes)? {
            DecodedCertificate::Resource(certificate) => Ok(certificate),
            DecodedCertificate::Router { .. } => Err(AnalysisError::RouterCertificate {
                uri: uri.to_string(),
            }),
        }
    }

    /// Child certificate URIs listed on the manifest, in listing order
    fn children(&self, parent_uri: &str, manifest_uri: &str) -> Result<Vec<String>> {
        let bytes = self
            .objects
            .get(manifest_uri)
            .ok_or_else(|| AnalysisError::ManifestNotFound {
                uri: manifest_uri.to_string(),
            })?;
        let manifest = self.decoder.decode_manifest(manifest_uri, bytes)?;
        debug!(
            uri = parent_uri,
            manifest = manifest_uri,
            file_count = manifest.file_names.len(),
            "expanding manifest"
        );
        Ok(manifest
            .files_with_suffix(CERTIFICATE_SUFFIX)
            .map(|name| sibling_uri(manifest_uri, name))
            .collect())
    }
}

/// Replace the last path segment of `base` with `file_name`
pub fn sibling_uri(base: &str, file_name: &str) -> String {
    match base.rfind('/') {
        Some(idx) => format!("{}{}", &base[..=idx], file_name),
        None => file_name.to_string(),
    }
}

fn log_pruned(err: &AnalysisError, path: &ReachabilityPath) {
    match err {
        AnalysisError::CertificateNotFound { .. } | AnalysisError::ManifestNotFound { .. } => {
            warn!(path = %path, error = %err, "pruning subtree");
        }
        AnalysisError::RouterCertificate { .. } => {
            debug!(path = %path, error = %err, "skipping router certificate");
        }
        _ => {
            error!(path = %path, error = %err, "pruning subtree");
        }
    }
}
