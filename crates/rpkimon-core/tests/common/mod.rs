use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rpkimon_core::model::{Manifest, ResourceCertificate};
use rpkimon_core::{CertificateEntry, JsonObjectDecoder, ObjectMap, ReachabilityPath};

pub const REPO: &str = "rsync://rpki.example.net/repo";

/// Fixed evaluation time shared by the fixtures
#[allow(dead_code)]
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// URI of the trust anchor produced by [`snapshot`]
#[allow(dead_code)]
pub fn ta_uri(root: &CertNode) -> String {
    format!("{}/{}.cer", REPO, root.name)
}

/// A certificate node in a synthetic publication tree
#[derive(Debug, Clone)]
pub struct CertNode {
    pub name: String,
    pub resources: String,
    pub not_before: DateTime<Utc>,
    pub children: Vec<CertNode>,
    pub router: bool,
    pub publish_manifest: bool,
}

#[allow(dead_code)]
pub fn cert(name: &str, resources: &str) -> CertNode {
    CertNode {
        name: name.to_string(),
        resources: resources.to_string(),
        not_before: now() - Duration::days(30),
        children: Vec::new(),
        router: false,
        publish_manifest: true,
    }
}

#[allow(dead_code)]
pub fn router(name: &str) -> CertNode {
    CertNode {
        router: true,
        ..cert(name, "")
    }
}

#[allow(dead_code)]
impl CertNode {
    pub fn child(mut self, child: CertNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn issued_at(mut self, not_before: DateTime<Utc>) -> Self {
        self.not_before = not_before;
        self
    }

    pub fn without_manifest(mut self) -> Self {
        self.publish_manifest = false;
        self
    }
}

/// Encode the tree rooted at `root` into a JSON snapshot
///
/// A node `x` published in directory `d` lives at `d/x.cer`; its manifest is
/// `d/x/manifest.mft` and lists its children, which live in `d/x/`.
#[allow(dead_code)]
pub fn snapshot(root: &CertNode) -> ObjectMap {
    ObjectMap::new(snapshot_objects(root))
}

/// Raw objects of [`snapshot`], for tests that tamper with them
#[allow(dead_code)]
pub fn snapshot_objects(root: &CertNode) -> HashMap<String, Vec<u8>> {
    let mut objects = HashMap::new();
    publish(root, REPO, &mut objects);
    objects
}

/// URI of the manifest published for `name` in `dir`
#[allow(dead_code)]
pub fn manifest_uri(dir: &str, name: &str) -> String {
    format!("{}/{}/manifest.mft", dir, name)
}

fn publish(spec: &CertNode, dir: &str, objects: &mut HashMap<String, Vec<u8>>) {
    let uri = format!("{}/{}.cer", dir, spec.name);
    if spec.router {
        objects.insert(
            uri,
            JsonObjectDecoder::encode_router_certificate(&spec.name).unwrap(),
        );
        return;
    }

    let manifest_uri = manifest_uri(dir, &spec.name);
    let certificate = ResourceCertificate {
        subject: format!("CN={}", spec.name),
        resources: spec.resources.parse().unwrap(),
        manifest_uri: Some(manifest_uri.clone()),
        not_before: spec.not_before,
        not_after: spec.not_before + Duration::days(365),
    };
    objects.insert(uri, JsonObjectDecoder::encode_certificate(&certificate).unwrap());

    if spec.publish_manifest {
        let mut file_names: Vec<String> = spec
            .children
            .iter()
            .map(|c| format!("{}.cer", c.name))
            .collect();
        file_names.push("revoked.crl".to_string());
        objects.insert(
            manifest_uri,
            JsonObjectDecoder::encode_manifest(&Manifest::new(file_names)).unwrap(),
        );
    }

    let child_dir = format!("{}/{}", dir, spec.name);
    for child in &spec.children {
        publish(child, &child_dir, objects);
    }
}

/// Flat entry for detector and policy tests, at path `/idx/`
#[allow(dead_code)]
pub fn entry(idx: usize, resources: &str) -> Arc<CertificateEntry> {
    Arc::new(CertificateEntry::new(
        format!("{}/{}.cer", REPO, idx),
        resources.parse().unwrap(),
        ReachabilityPath::root().child(idx),
    ))
}

/// Entry backed by a certificate with the given SIA and issuance time
#[allow(dead_code)]
pub fn certified_entry(
    idx: usize,
    resources: &str,
    sia: Option<&str>,
    not_before: DateTime<Utc>,
) -> Arc<CertificateEntry> {
    let certificate = ResourceCertificate {
        subject: format!("CN=entry-{}", idx),
        resources: resources.parse().unwrap(),
        manifest_uri: sia.map(str::to_string),
        not_before,
        not_after: not_before + Duration::days(365),
    };
    Arc::new(CertificateEntry::from_certificate(
        format!("{}/{}.cer", REPO, idx),
        certificate,
        ReachabilityPath::root().child(idx),
    ))
}
