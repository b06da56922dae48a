pub mod certificate;
pub mod entry;
pub mod objects;
pub mod path;

pub use certificate::{DecodedCertificate, Manifest, ResourceCertificate};
pub use entry::{are_ancestors, CertificateEntry};
pub use objects::ObjectMap;
pub use path::ReachabilityPath;
