//! Resource-set algebra over AS numbers, IPv4 and IPv6 addresses.
//!
//! ## Responsibilities
//!
//! - Exact set operations (union, intersection, difference, symmetric
//!   difference, containment) on ranges that need not be CIDR aligned
//! - Splitting ranges into minimal bit-aligned blocks
//! - Parsing and rendering the conventional resource notation

pub mod range;
pub mod resource;
pub mod set;

pub use range::{Bound, Range, RangeSet};
pub use resource::{Resource, ResourceType};
pub use set::ResourceSet;
