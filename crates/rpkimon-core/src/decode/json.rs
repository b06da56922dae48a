use serde::{Deserialize, Serialize};

use super::ObjectDecoder;
use crate::errors::{AnalysisError, Result};
use crate::model::{DecodedCertificate, Manifest, ResourceCertificate};

/// Decoder for snapshots whose objects were already decoded into JSON
///
/// Each object is one document tagged by `type`:
///
/// ```json
/// {"type": "certificate", "subject": "CN=child", "resources": "192.0.2.0/24",
///  "manifest_uri": "rsync://example.net/child/child.mft",
///  "not_before": "2024-01-01T00:00:00Z", "not_after": "2025-01-01T00:00:00Z"}
/// {"type": "router_certificate", "subject": "ROUTER-64496"}
/// {"type": "manifest", "file_names": ["a.cer", "b.roa"]}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonObjectDecoder;

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum JsonObject {
    Certificate(ResourceCertificate),
    RouterCertificate { subject: String },
    Manifest(Manifest),
}

impl JsonObjectDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Serialise a certificate into the form this decoder reads
    ///
    /// # Errors
    ///
    /// `Serialization` if the certificate cannot be encoded.
    pub fn encode_certificate(certificate: &ResourceCertificate) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&JsonObject::Certificate(certificate.clone()))?)
    }

    /// # Errors
    ///
    /// `Serialization` if the subject cannot be encoded.
    pub fn encode_router_certificate(subject: &str) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&JsonObject::RouterCertificate {
            subject: subject.to_string(),
        })?)
    }

    /// # Errors
    ///
    /// `Serialization` if the manifest cannot be encoded.
    pub fn encode_manifest(manifest: &Manifest) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&JsonObject::Manifest(manifest.clone()))?)
    }

    fn parse(bytes: &[u8]) -> std::result::Result<JsonObject, String> {
        serde_json::from_slice(bytes).map_err(|e| e.to_string())
    }
}

impl ObjectDecoder for JsonObjectDecoder {
    fn decode_certificate(&self, uri: &str, bytes: &[u8]) -> Result<DecodedCertificate> {
        let invalid = |reason: String| AnalysisError::InvalidCertificate {
            uri: uri.to_string(),
            reason,
        };
        match Self::parse(bytes).map_err(invalid)? {
            JsonObject::Certificate(certificate) => Ok(DecodedCertificate::Resource(certificate)),
            JsonObject::RouterCertificate { subject } => Ok(DecodedCertificate::Router { subject }),
            JsonObject::Manifest(_) => Err(invalid("object is a manifest".to_string())),
        }
    }

    fn decode_manifest(&self, uri: &str, bytes: &[u8]) -> Result<Manifest> {
        let invalid = |reason: String| AnalysisError::InvalidManifest {
            uri: uri.to_string(),
            reason,
        };
        match Self::parse(bytes).map_err(invalid)? {
            JsonObject::Manifest(manifest) => Ok(manifest),
            _ => Err(invalid("object is a certificate".to_string())),
        }
    }
}
