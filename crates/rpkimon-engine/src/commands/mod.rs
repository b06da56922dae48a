//! Command orchestration layer.
//!
//! Provides the entry points invoked by the snapshot-refresh collaborator.

pub mod analysis;
