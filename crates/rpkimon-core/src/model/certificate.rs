use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resources::ResourceSet;

/// Fields of a resource certificate that the analysis needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceCertificate {
    pub subject: String,
    pub resources: ResourceSet,

    /// SIA `rpkiManifest` access location
    #[serde(default)]
    pub manifest_uri: Option<String>,

    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
}

/// Outcome of decoding a certificate object
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedCertificate {
    Resource(ResourceCertificate),

    /// BGPsec router certificate: no resource extension, never descended into
    Router { subject: String },
}

/// File names listed on a manifest, in listing order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub file_names: Vec<String>,
}

impl Manifest {
    pub fn new(file_names: Vec<String>) -> Self {
        Self { file_names }
    }

    /// Listed files whose name ends in `suffix`, in listing order
    pub fn files_with_suffix<'a>(&'a self, suffix: &'a str) -> impl Iterator<Item = &'a str> {
        self.file_names
            .iter()
            .map(String::as_str)
            .filter(move |name| name.ends_with(suffix))
    }
}
