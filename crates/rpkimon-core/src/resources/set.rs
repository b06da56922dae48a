//! Immutable resource sets spanning the ASN, IPv4 and IPv6 number spaces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::range::{Range, RangeSet};
use super::resource::Resource;
use crate::errors::AnalysisError;

/// Exact closed set of AS numbers and IPv4/IPv6 addresses
///
/// Operations return new sets; a `ResourceSet` is never mutated after
/// construction, so it can be shared freely between worker threads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResourceSet {
    asn: RangeSet<u32>,
    ipv4: RangeSet<u32>,
    ipv6: RangeSet<u128>,
}

impl ResourceSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn all_asn() -> Self {
        Self::from_resources([Resource::Asn(Range::full())])
    }

    pub fn all_ipv4() -> Self {
        Self::from_resources([Resource::Ipv4(Range::full())])
    }

    pub fn all_ipv6() -> Self {
        Self::from_resources([Resource::Ipv6(Range::full())])
    }

    pub fn from_resources(resources: impl IntoIterator<Item = Resource>) -> Self {
        let mut asn = Vec::new();
        let mut ipv4 = Vec::new();
        let mut ipv6 = Vec::new();
        for resource in resources {
            match resource {
                Resource::Asn(range) => asn.push(range),
                Resource::Ipv4(range) => ipv4.push(range),
                Resource::Ipv6(range) => ipv6.push(range),
            }
        }
        Self {
            asn: RangeSet::from_ranges(asn),
            ipv4: RangeSet::from_ranges(ipv4),
            ipv6: RangeSet::from_ranges(ipv6),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.asn.is_empty() && self.ipv4.is_empty() && self.ipv6.is_empty()
    }

    /// Number of maximal contiguous resources (not the number of addresses)
    pub fn len(&self) -> usize {
        self.asn.len() + self.ipv4.len() + self.ipv6.len()
    }

    /// Maximal contiguous resources: ASNs first, then IPv4, then IPv6
    pub fn iter(&self) -> impl Iterator<Item = Resource> + '_ {
        self.asn
            .ranges()
            .iter()
            .copied()
            .map(Resource::Asn)
            .chain(self.ipv4.ranges().iter().copied().map(Resource::Ipv4))
            .chain(self.ipv6.ranges().iter().copied().map(Resource::Ipv6))
    }

    pub fn union(&self, other: &ResourceSet) -> ResourceSet {
        ResourceSet {
            asn: self.asn.union(&other.asn),
            ipv4: self.ipv4.union(&other.ipv4),
            ipv6: self.ipv6.union(&other.ipv6),
        }
    }

    pub fn intersection(&self, other: &ResourceSet) -> ResourceSet {
        ResourceSet {
            asn: self.asn.intersection(&other.asn),
            ipv4: self.ipv4.intersection(&other.ipv4),
            ipv6: self.ipv6.intersection(&other.ipv6),
        }
    }

    pub fn difference(&self, other: &ResourceSet) -> ResourceSet {
        ResourceSet {
            asn: self.asn.difference(&other.asn),
            ipv4: self.ipv4.difference(&other.ipv4),
            ipv6: self.ipv6.difference(&other.ipv6),
        }
    }

    pub fn symmetric_difference(&self, other: &ResourceSet) -> ResourceSet {
        ResourceSet {
            asn: self.asn.symmetric_difference(&other.asn),
            ipv4: self.ipv4.symmetric_difference(&other.ipv4),
            ipv6: self.ipv6.symmetric_difference(&other.ipv6),
        }
    }

    /// `self ⊇ other`
    pub fn contains(&self, other: &ResourceSet) -> bool {
        self.asn.contains(&other.asn)
            && self.ipv4.contains(&other.ipv4)
            && self.ipv6.contains(&other.ipv6)
    }

    /// Cheaper than `!intersection().is_empty()`: no allocation
    pub fn intersects(&self, other: &ResourceSet) -> bool {
        self.asn.intersects(&other.asn)
            || self.ipv4.intersects(&other.ipv4)
            || self.ipv6.intersects(&other.ipv6)
    }

    /// Minimal bit-aligned blocks covering the set: IP prefixes and
    /// aligned ASN blocks
    pub fn split_to_components(&self) -> Vec<Resource> {
        self.iter().flat_map(|r| r.split_aligned()).collect()
    }
}

impl FromIterator<Resource> for ResourceSet {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        Self::from_resources(iter)
    }
}

impl fmt::Display for ResourceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, resource) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", resource)?;
        }
        Ok(())
    }
}

impl FromStr for ResourceSet {
    type Err = AnalysisError;

    /// Comma separated resources; the empty string is the empty set
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Resource::from_str)
            .collect()
    }
}

impl Serialize for ResourceSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourceSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(text: &str) -> ResourceSet {
        text.parse().unwrap()
    }

    #[test]
    fn test_parse_mixed_families() {
        let resources = set("2001:db8::/32, 192.0.2.0/24, AS64496");
        assert_eq!(resources.len(), 3);
        assert_eq!(resources.to_string(), "AS64496, 192.0.2.0/24, 2001:db8::/32");
    }

    #[test]
    fn test_adjacent_prefixes_merge() {
        let resources = set("192.0.2.0/25, 192.0.2.128/25");
        assert_eq!(resources, set("192.0.2.0/24"));
        assert_eq!(resources.len(), 1);
    }

    #[test]
    fn test_families_do_not_interact() {
        // AS0-AS4294967295 and 0.0.0.0/0 share numeric values but not a space
        assert!(!ResourceSet::all_asn().intersects(&ResourceSet::all_ipv4()));
        assert_eq!(
            ResourceSet::all_asn().symmetric_difference(&ResourceSet::all_ipv4()),
            ResourceSet::all_asn().union(&ResourceSet::all_ipv4())
        );
    }

    #[test]
    fn test_contains() {
        let parent = set("10.0.0.0/8, AS64496-AS64511");
        assert!(parent.contains(&set("10.1.0.0/16, AS64500")));
        assert!(!parent.contains(&set("11.0.0.0/16")));
        assert!(parent.contains(&ResourceSet::empty()));
    }

    #[test]
    fn test_split_to_components() {
        let components: Vec<String> = set("10.0.0.0-10.0.2.255, AS64496-AS64498")
            .split_to_components()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            components,
            vec!["AS64496-AS64497", "AS64498", "10.0.0.0/23", "10.0.2.0/24"]
        );
    }

    #[test]
    fn test_serde_as_string() {
        let resources = set("192.0.2.0/24, AS64496");
        let json = serde_json::to_string(&resources).unwrap();
        assert_eq!(json, "\"AS64496, 192.0.2.0/24\"");
        let back: ResourceSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, resources);
    }
}
