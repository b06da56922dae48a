//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names identical between the engine's
//! lifecycle events and the core's detail events.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Object identifiers
pub const FIELD_URI: &str = "uri";
pub const FIELD_PATH: &str = "path";
pub const FIELD_TRUST_ANCHOR: &str = "trust_anchor";

// Counts
pub const FIELD_OBJECT_COUNT: &str = "object_count";
pub const FIELD_CERTIFICATE_COUNT: &str = "certificate_count";
pub const FIELD_CLUSTER_COUNT: &str = "cluster_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
