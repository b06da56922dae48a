use rpkimon_core_types::{RunId, TraceId};
use thiserror::Error;

/// Result type alias using AnalysisError
pub type Result<T> = std::result::Result<T, AnalysisError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that the invoking collaborator
/// can alert on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    InvalidResource,
    InvalidConfig,
    InvalidPattern,

    // Snapshot objects
    NotFound,
    InvalidObject,
    RouterCertificate,
    CycleDetected,

    // Analysis
    /// The global candidate-overlap ceiling was exceeded; no result exists
    OverlapBudgetExceeded,

    // Integration
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidResource => "ERR_INVALID_RESOURCE",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::InvalidPattern => "ERR_INVALID_PATTERN",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidObject => "ERR_INVALID_OBJECT",
            ExErrorKind::RouterCertificate => "ERR_ROUTER_CERTIFICATE",
            ExErrorKind::CycleDetected => "ERR_CYCLE_DETECTED",
            ExErrorKind::OverlapBudgetExceeded => "ERR_OVERLAP_BUDGET_EXCEEDED",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the object
/// context (URI, reachability path) needed to find the offending node.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    uri: Option<String>,
    path: Option<String>,
    run_id: Option<RunId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            uri: None,
            path: None,
            run_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add object URI context
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Add reachability path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(uri) = &self.uri {
            write!(f, " (uri: {})", uri)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(run_id) = &self.run_id {
            write!(f, " (run_id: {})", run_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for certificate analysis
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    // ===== Snapshot Errors =====
    /// No object published at the certificate URI
    #[error("No certificate at {uri}")]
    CertificateNotFound { uri: String },

    /// No object published at the manifest URI (or no manifest SIA at all)
    #[error("No manifest at {uri}")]
    ManifestNotFound { uri: String },

    /// Object could not be decoded as a certificate
    #[error("Error when parsing certificate {uri}: {reason}")]
    InvalidCertificate { uri: String, reason: String },

    /// Router (BGPsec) certificate: carries no resource extension
    #[error("Router certificate at {uri} has no resources")]
    RouterCertificate { uri: String },

    /// Object could not be decoded as a manifest
    #[error("Error when parsing manifest {uri}: {reason}")]
    InvalidManifest { uri: String, reason: String },

    /// Manifest chain leads back to a certificate already on the current branch
    #[error("Manifest chain revisits {uri}")]
    CycleDetected { uri: String },

    // ===== Resource Errors =====
    /// Resource notation could not be parsed
    #[error("Invalid resource '{input}': {reason}")]
    InvalidResource { input: String, reason: String },

    // ===== Configuration Errors =====
    /// Configuration is structurally invalid
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A configured regular expression does not compile
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // ===== Analysis Errors =====
    /// Global candidate-overlap ceiling exceeded
    #[error("Too many overlaps to process: {total} candidate pairs exceed the limit of {limit}")]
    OverlapBudgetExceeded { total: usize, limit: usize },

    // ===== Generic Errors =====
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<AnalysisError> for ExError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::CertificateNotFound { uri } => ExError::new(ExErrorKind::NotFound)
                .with_uri(uri)
                .with_message("No certificate at URI"),

            AnalysisError::ManifestNotFound { uri } => ExError::new(ExErrorKind::NotFound)
                .with_uri(uri)
                .with_message("No manifest at URI"),

            AnalysisError::InvalidCertificate { uri, reason } => {
                ExError::new(ExErrorKind::InvalidObject)
                    .with_uri(uri)
                    .with_op("decode_certificate")
                    .with_message(reason)
            }

            AnalysisError::RouterCertificate { uri } => {
                ExError::new(ExErrorKind::RouterCertificate)
                    .with_uri(uri)
                    .with_message("Router certificate has no resources")
            }

            AnalysisError::InvalidManifest { uri, reason } => {
                ExError::new(ExErrorKind::InvalidObject)
                    .with_uri(uri)
                    .with_op("decode_manifest")
                    .with_message(reason)
            }

            AnalysisError::CycleDetected { uri } => ExError::new(ExErrorKind::CycleDetected)
                .with_uri(uri)
                .with_message("Manifest chain revisits an ancestor"),

            AnalysisError::InvalidResource { input, reason } => {
                ExError::new(ExErrorKind::InvalidResource)
                    .with_message(format!("'{}': {}", input, reason))
            }

            AnalysisError::InvalidConfig { reason } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(reason)
            }

            AnalysisError::InvalidPattern { pattern, reason } => {
                ExError::new(ExErrorKind::InvalidPattern)
                    .with_message(format!("'{}': {}", pattern, reason))
            }

            AnalysisError::OverlapBudgetExceeded { total, limit } => {
                ExError::new(ExErrorKind::OverlapBudgetExceeded)
                    .with_op("compare_certificates")
                    .with_message(format!(
                        "{} candidate pairs exceed the limit of {}",
                        total, limit
                    ))
            }

            AnalysisError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            AnalysisError::Io { message } => ExError::new(ExErrorKind::Io).with_message(message),

            AnalysisError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to AnalysisError
impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        AnalysisError::Io {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
            (ExErrorKind::RouterCertificate, "ERR_ROUTER_CERTIFICATE"),
            (
                ExErrorKind::OverlapBudgetExceeded,
                "ERR_OVERLAP_BUDGET_EXCEEDED",
            ),
            (ExErrorKind::InvalidPattern, "ERR_INVALID_PATTERN"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_budget_error_keeps_numbers() {
        let err: ExError = AnalysisError::OverlapBudgetExceeded {
            total: 70_000,
            limit: 65_536,
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::OverlapBudgetExceeded);
        assert_eq!(err.op(), Some("compare_certificates"));
        assert!(err.message().contains("70000"));
        assert!(err.message().contains("65536"));
    }

    #[test]
    fn test_display_includes_uri_and_path() {
        let err = ExError::new(ExErrorKind::NotFound)
            .with_uri("rsync://example.net/ta.cer")
            .with_path("/0/");
        let display = err.to_string();
        assert!(display.starts_with("[ERR_NOT_FOUND]"));
        assert!(display.contains("rsync://example.net/ta.cer"));
        assert!(display.contains("(path: /0/)"));
    }
}
