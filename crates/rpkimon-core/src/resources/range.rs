//! Closed ranges and normalised range sets over a fixed-width number space.
//!
//! `RangeSet` keeps its ranges sorted, non-overlapping and non-adjacent, so
//! two sets are equal exactly when they cover the same numbers.

use std::fmt::Debug;
use std::hash::Hash;

/// A number space that resources live in (32-bit ASN/IPv4, 128-bit IPv6)
pub trait Bound: Copy + Ord + Eq + Hash + Debug + Send + Sync + 'static {
    /// Width of the space in bits
    const BITS: u32;
    const MIN: Self;
    const MAX: Self;

    fn to_u128(self) -> u128;

    /// Truncating conversion; callers stay inside the space
    fn from_u128(value: u128) -> Self;
}

impl Bound for u32 {
    const BITS: u32 = 32;
    const MIN: Self = u32::MIN;
    const MAX: Self = u32::MAX;

    fn to_u128(self) -> u128 {
        u128::from(self)
    }

    fn from_u128(value: u128) -> Self {
        value as u32
    }
}

impl Bound for u128 {
    const BITS: u32 = 128;
    const MIN: Self = u128::MIN;
    const MAX: Self = u128::MAX;

    fn to_u128(self) -> u128 {
        self
    }

    fn from_u128(value: u128) -> Self {
        value
    }
}

/// Closed range `[start, end]` with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Range<T: Bound> {
    start: T,
    end: T,
}

impl<T: Bound> Range<T> {
    /// Returns `None` when `start > end`
    pub fn new(start: T, end: T) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn single(value: T) -> Self {
        Self {
            start: value,
            end: value,
        }
    }

    /// The whole number space
    pub fn full() -> Self {
        Self {
            start: T::MIN,
            end: T::MAX,
        }
    }

    /// Prefix of `length` bits starting at `start`; `None` if host bits are set
    pub fn prefix(start: T, length: u32) -> Option<Self> {
        if length > T::BITS {
            return None;
        }
        let host_bits = T::BITS - length;
        let host_mask = low_mask(host_bits);
        let start_value = start.to_u128();
        if start_value & host_mask != 0 {
            return None;
        }
        Some(Self {
            start,
            end: T::from_u128(start_value | host_mask),
        })
    }

    pub fn start(&self) -> T {
        self.start
    }

    pub fn end(&self) -> T {
        self.end
    }

    pub fn contains(&self, other: &Range<T>) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn intersects(&self, other: &Range<T>) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Prefix length if this range is exactly one bit-aligned block
    pub fn prefix_length(&self) -> Option<u32> {
        match self.split_aligned().as_slice() {
            [block] => Some(T::BITS - block_bits(block)),
            _ => None,
        }
    }

    /// Split into the minimal sequence of bit-aligned blocks covering this
    /// range exactly (IP prefixes, aligned ASN blocks), in ascending order.
    pub fn split_aligned(&self) -> Vec<Range<T>> {
        let mut blocks = Vec::new();
        let end = self.end.to_u128();
        let mut current = self.start.to_u128();

        loop {
            let alignment = if current == 0 {
                T::BITS
            } else {
                current.trailing_zeros().min(T::BITS)
            };
            let remaining = end - current;
            let fits = if remaining == u128::MAX {
                128
            } else {
                127 - (remaining + 1).leading_zeros()
            };
            let bits = alignment.min(fits);
            let block_end = current | low_mask(bits);

            blocks.push(Range {
                start: T::from_u128(current),
                end: T::from_u128(block_end),
            });

            if block_end >= end {
                break;
            }
            current = block_end + 1;
        }

        blocks
    }
}

fn low_mask(bits: u32) -> u128 {
    if bits >= 128 {
        u128::MAX
    } else {
        (1u128 << bits) - 1
    }
}

/// log2 of the size of an aligned block
fn block_bits<T: Bound>(block: &Range<T>) -> u32 {
    let span = block.end.to_u128() - block.start.to_u128();
    128 - span.leading_zeros()
}

/// Sorted, non-overlapping, non-adjacent set of closed ranges
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangeSet<T: Bound> {
    ranges: Vec<Range<T>>,
}

impl<T: Bound> Default for RangeSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Bound> RangeSet<T> {
    pub fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Normalise arbitrary ranges: sort, merge overlapping and adjacent ones
    pub fn from_ranges(ranges: impl IntoIterator<Item = Range<T>>) -> Self {
        let mut sorted: Vec<Range<T>> = ranges.into_iter().collect();
        sorted.sort_unstable();

        let mut merged: Vec<Range<T>> = Vec::with_capacity(sorted.len());
        for range in sorted {
            match merged.last_mut() {
                Some(last) if touches(last, &range) => {
                    if range.end > last.end {
                        last.end = range.end;
                    }
                }
                _ => merged.push(range),
            }
        }

        Self { ranges: merged }
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of maximal ranges in the set
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn ranges(&self) -> &[Range<T>] {
        &self.ranges
    }

    pub fn union(&self, other: &RangeSet<T>) -> RangeSet<T> {
        RangeSet::from_ranges(self.ranges.iter().chain(other.ranges.iter()).copied())
    }

    pub fn intersection(&self, other: &RangeSet<T>) -> RangeSet<T> {
        let mut result = Vec::new();
        let (mut i, mut j) = (0, 0);

        while i < self.ranges.len() && j < other.ranges.len() {
            let lhs = self.ranges[i];
            let rhs = other.ranges[j];
            let start = lhs.start.max(rhs.start);
            let end = lhs.end.min(rhs.end);
            if start <= end {
                result.push(Range { start, end });
            }
            if lhs.end < rhs.end {
                i += 1;
            } else {
                j += 1;
            }
        }

        // Pieces of two normalised sets are already sorted and separated.
        RangeSet { ranges: result }
    }

    pub fn difference(&self, other: &RangeSet<T>) -> RangeSet<T> {
        let mut result = Vec::new();
        let mut j = 0;

        for range in &self.ranges {
            let mut start = range.start;
            let mut exhausted = false;

            while j < other.ranges.len() && other.ranges[j].end < start {
                j += 1;
            }

            let mut k = j;
            while k < other.ranges.len() && other.ranges[k].start <= range.end {
                let cut = other.ranges[k];
                if cut.start > start {
                    result.push(Range {
                        start,
                        end: T::from_u128(cut.start.to_u128() - 1),
                    });
                }
                if cut.end >= range.end {
                    exhausted = true;
                    break;
                }
                start = T::from_u128(cut.end.to_u128() + 1);
                k += 1;
            }

            if !exhausted {
                result.push(Range {
                    start,
                    end: range.end,
                });
            }
        }

        RangeSet { ranges: result }
    }

    pub fn symmetric_difference(&self, other: &RangeSet<T>) -> RangeSet<T> {
        self.difference(other).union(&other.difference(self))
    }

    /// `self ⊇ other`
    pub fn contains(&self, other: &RangeSet<T>) -> bool {
        other.difference(self).is_empty()
    }

    /// Non-empty intersection, without allocating
    pub fn intersects(&self, other: &RangeSet<T>) -> bool {
        let (Some(lhs_first), Some(lhs_last), Some(rhs_first), Some(rhs_last)) = (
            self.ranges.first(),
            self.ranges.last(),
            other.ranges.first(),
            other.ranges.last(),
        ) else {
            return false;
        };
        if lhs_last.end < rhs_first.start || rhs_last.end < lhs_first.start {
            return false;
        }

        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let lhs = &self.ranges[i];
            let rhs = &other.ranges[j];
            if lhs.intersects(rhs) {
                return true;
            }
            if lhs.end < rhs.end {
                i += 1;
            } else {
                j += 1;
            }
        }
        false
    }

    /// Every range split into bit-aligned blocks
    pub fn split_aligned(&self) -> Vec<Range<T>> {
        self.ranges.iter().flat_map(Range::split_aligned).collect()
    }
}

/// Overlapping or adjacent (`sorted` guarantees `last.start <= next.start`)
fn touches<T: Bound>(last: &Range<T>, next: &Range<T>) -> bool {
    next.start <= last.end || last.end.to_u128() + 1 == next.start.to_u128()
}
