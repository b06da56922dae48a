//! Seam between the analysis and the binary object formats.
//!
//! X.509 / CMS decoding lives with the fetch layer; the analysis only needs
//! the handful of fields exposed by [`ResourceCertificate`] and [`Manifest`].

pub mod json;

pub use json::JsonObjectDecoder;

use crate::errors::Result;
use crate::model::{DecodedCertificate, Manifest};

/// Decodes published objects for the tree extractor
///
/// Implementations are called concurrently from many extraction tasks and
/// must not hold locks across a decode.
pub trait ObjectDecoder: Send + Sync {
    /// Decode a `.cer` object
    ///
    /// # Errors
    ///
    /// `InvalidCertificate` when the bytes are not a certificate.
    fn decode_certificate(&self, uri: &str, bytes: &[u8]) -> Result<DecodedCertificate>;

    /// Decode a `.mft` object
    ///
    /// # Errors
    ///
    /// `InvalidManifest` when the bytes are not a manifest.
    fn decode_manifest(&self, uri: &str, bytes: &[u8]) -> Result<Manifest>;
}
