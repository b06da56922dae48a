//! A single contiguous Internet number resource and its textual notation.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use super::range::{Bound, Range};
use crate::errors::AnalysisError;

/// Address family / number space of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceType {
    Asn,
    Ipv4,
    Ipv6,
}

/// One contiguous range of AS numbers or IP addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Asn(Range<u32>),
    Ipv4(Range<u32>),
    Ipv6(Range<u128>),
}

impl Resource {
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Resource::Asn(_) => ResourceType::Asn,
            Resource::Ipv4(_) => ResourceType::Ipv4,
            Resource::Ipv6(_) => ResourceType::Ipv6,
        }
    }

    /// Bit-aligned components of this resource
    pub fn split_aligned(&self) -> Vec<Resource> {
        match self {
            Resource::Asn(range) => range.split_aligned().into_iter().map(Resource::Asn).collect(),
            Resource::Ipv4(range) => range
                .split_aligned()
                .into_iter()
                .map(Resource::Ipv4)
                .collect(),
            Resource::Ipv6(range) => range
                .split_aligned()
                .into_iter()
                .map(Resource::Ipv6)
                .collect(),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Asn(range) if range.start() == range.end() => {
                write!(f, "AS{}", range.start())
            }
            Resource::Asn(range) => write!(f, "AS{}-AS{}", range.start(), range.end()),
            Resource::Ipv4(range) => fmt_ip(f, range, |v| Ipv4Addr::from(v).to_string()),
            Resource::Ipv6(range) => fmt_ip(f, range, |v| Ipv6Addr::from(v).to_string()),
        }
    }
}

fn fmt_ip<T: Bound>(
    f: &mut fmt::Formatter<'_>,
    range: &Range<T>,
    render: impl Fn(T) -> String,
) -> fmt::Result {
    match range.prefix_length() {
        Some(length) => write!(f, "{}/{}", render(range.start()), length),
        None => write!(f, "{}-{}", render(range.start()), render(range.end())),
    }
}

fn invalid(input: &str, reason: impl Into<String>) -> AnalysisError {
    AnalysisError::InvalidResource {
        input: input.to_string(),
        reason: reason.into(),
    }
}

impl FromStr for Resource {
    type Err = AnalysisError;

    /// Accepts `AS64496`, `AS64496-AS64511`, `AS64496-64511`,
    /// `192.0.2.0/24`, `10.0.0.0-10.0.2.255`, `192.0.2.1`,
    /// `2001:db8::/32` and `2001:db8::1-2001:db8::ff`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(invalid(s, "empty resource"));
        }

        if has_as_prefix(input) {
            return parse_asn(input).map(Resource::Asn);
        }
        if input.contains(':') {
            return parse_ip(input, |a| a.parse::<Ipv6Addr>().map(u128::from).ok())
                .map(Resource::Ipv6);
        }
        parse_ip(input, |a| a.parse::<Ipv4Addr>().map(u32::from).ok()).map(Resource::Ipv4)
    }
}

fn has_as_prefix(text: &str) -> bool {
    text.len() > 2 && text.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("AS"))
}

fn parse_asn(input: &str) -> Result<Range<u32>, AnalysisError> {
    let number = |part: &str| -> Result<u32, AnalysisError> {
        let part = part.trim();
        let digits = if has_as_prefix(part) { &part[2..] } else { part };
        digits
            .parse::<u32>()
            .map_err(|e| invalid(input, format!("bad AS number '{}': {}", part, e)))
    };

    match input.split_once('-') {
        Some((start, end)) => Range::new(number(start)?, number(end)?)
            .ok_or_else(|| invalid(input, "range start is after range end")),
        None => Ok(Range::single(number(input)?)),
    }
}

fn parse_ip<T: Bound>(
    input: &str,
    address: impl Fn(&str) -> Option<T>,
) -> Result<Range<T>, AnalysisError> {
    let parse_address = |part: &str| {
        address(part.trim()).ok_or_else(|| invalid(input, format!("bad address '{}'", part)))
    };

    if let Some((start, length)) = input.split_once('/') {
        let length: u32 = length
            .trim()
            .parse()
            .map_err(|_| invalid(input, "bad prefix length"))?;
        if length > T::BITS {
            return Err(invalid(input, "prefix length exceeds address width"));
        }
        return Range::prefix(parse_address(start)?, length)
            .ok_or_else(|| invalid(input, "host bits set in prefix"));
    }

    match input.split_once('-') {
        Some((start, end)) => Range::new(parse_address(start)?, parse_address(end)?)
            .ok_or_else(|| invalid(input, "range start is after range end")),
        None => Ok(Range::single(parse_address(input)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_prefixes() {
        for text in ["192.0.2.0/24", "0.0.0.0/0", "2001:db8::/32", "::/0", "192.0.2.1/32"] {
            let resource: Resource = text.parse().unwrap();
            assert_eq!(resource.to_string(), text);
        }
    }

    #[test]
    fn test_aligned_range_renders_as_prefix() {
        let resource: Resource = "10.0.0.0-10.0.1.255".parse().unwrap();
        assert_eq!(resource.to_string(), "10.0.0.0/23");

        let unaligned: Resource = "10.0.0.0-10.0.2.255".parse().unwrap();
        assert_eq!(unaligned.to_string(), "10.0.0.0-10.0.2.255");
    }

    #[test]
    fn test_parse_asn_forms() {
        assert_eq!("AS64496".parse::<Resource>().unwrap().to_string(), "AS64496");
        assert_eq!(
            "AS64496-64511".parse::<Resource>().unwrap(),
            "as64496-AS64511".parse::<Resource>().unwrap()
        );
        assert!("AS64511-AS64496".parse::<Resource>().is_err());
        assert!("ASfoo".parse::<Resource>().is_err());
    }

    #[test]
    fn test_rejects_bad_prefixes() {
        assert!("192.0.2.1/24".parse::<Resource>().is_err());
        assert!("192.0.2.0/33".parse::<Resource>().is_err());
        assert!("2001:db8::/129".parse::<Resource>().is_err());
        assert!("".parse::<Resource>().is_err());
    }

    #[test]
    fn test_split_aligned_asn() {
        let resource: Resource = "AS64496-AS64498".parse().unwrap();
        let parts: Vec<String> = resource
            .split_aligned()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(parts, vec!["AS64496-AS64497", "AS64498"]);
    }
}
