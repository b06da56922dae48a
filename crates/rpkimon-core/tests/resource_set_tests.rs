#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use rpkimon_core::resources::{Range, Resource, ResourceSet};

fn arb_resource() -> impl Strategy<Value = Resource> {
    prop_oneof![
        (any::<u32>(), 0u32..4096).prop_map(|(start, len)| {
            Resource::Asn(Range::new(start, start.saturating_add(len)).unwrap())
        }),
        (any::<u32>(), 0u32..65_536).prop_map(|(start, len)| {
            Resource::Ipv4(Range::new(start, start.saturating_add(len)).unwrap())
        }),
        (any::<u128>(), 0u128..(1 << 40)).prop_map(|(start, len)| {
            Resource::Ipv6(Range::new(start, start.saturating_add(len)).unwrap())
        }),
    ]
}

fn arb_set() -> impl Strategy<Value = ResourceSet> {
    prop::collection::vec(arb_resource(), 0..8).prop_map(ResourceSet::from_resources)
}

proptest! {
    #[test]
    fn prop_intersection_with_self_is_identity(a in arb_set()) {
        prop_assert_eq!(a.intersection(&a), a);
    }

    #[test]
    fn prop_symmetric_difference_with_self_is_empty(a in arb_set()) {
        prop_assert!(a.symmetric_difference(&a).is_empty());
    }

    #[test]
    fn prop_symmetric_difference_commutes(a in arb_set(), b in arb_set()) {
        prop_assert_eq!(a.symmetric_difference(&b), b.symmetric_difference(&a));
    }

    #[test]
    fn prop_intersects_agrees_with_intersection(a in arb_set(), b in arb_set()) {
        prop_assert_eq!(a.intersects(&b), !a.intersection(&b).is_empty());
    }

    #[test]
    fn prop_union_contains_both(a in arb_set(), b in arb_set()) {
        let union = a.union(&b);
        prop_assert!(union.contains(&a));
        prop_assert!(union.contains(&b));
    }

    #[test]
    fn prop_difference_is_disjoint_from_subtrahend(a in arb_set(), b in arb_set()) {
        prop_assert!(!a.difference(&b).intersects(&b));
    }

    #[test]
    fn prop_symmetric_difference_partitions_union(a in arb_set(), b in arb_set()) {
        let rebuilt = a.symmetric_difference(&b).union(&a.intersection(&b));
        prop_assert_eq!(rebuilt, a.union(&b));
    }

    #[test]
    fn prop_components_rebuild_the_set(a in arb_set()) {
        let rebuilt = ResourceSet::from_resources(a.split_to_components());
        prop_assert_eq!(rebuilt, a);
    }

    #[test]
    fn prop_display_parses_back(a in arb_set()) {
        let parsed: ResourceSet = a.to_string().parse().unwrap();
        prop_assert_eq!(parsed, a);
    }
}

#[test]
fn test_unaligned_range_algebra() {
    let a: ResourceSet = "10.0.0.0-10.0.2.255".parse().unwrap();
    let b: ResourceSet = "10.0.1.0/24".parse().unwrap();
    assert_eq!(a.difference(&b).to_string(), "10.0.0.0/24, 10.0.2.0/24");
    assert_eq!(a.intersection(&b), b);
    assert!(a.contains(&b));
}

#[test]
fn test_ipv6_edges() {
    let all = ResourceSet::all_ipv6();
    let low: ResourceSet = "::/1".parse().unwrap();
    assert_eq!(all.difference(&low).to_string(), "8000::/1");
}
