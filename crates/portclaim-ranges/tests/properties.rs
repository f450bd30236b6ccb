use portclaim_ranges::{VlanRange, VlanRangeSet, MAX_VLAN};
use proptest::prelude::*;

fn vlan_set() -> impl Strategy<Value = VlanRangeSet> {
    (
        any::<bool>(),
        proptest::collection::vec((2u16..=MAX_VLAN, 0u16..64), 0..8),
    )
        .prop_map(|(untagged, spans)| {
            let mut ranges: Vec<VlanRange> = spans
                .into_iter()
                .map(|(start, width)| {
                    let end = start.saturating_add(width).min(MAX_VLAN);
                    VlanRange::new(start, end).unwrap()
                })
                .collect();
            if untagged {
                ranges.push(VlanRange::new(0, 0).unwrap());
            }
            VlanRangeSet::from_ranges(ranges)
        })
}

proptest! {
    #[test]
    fn prop_union_is_idempotent(a in vlan_set()) {
        prop_assert_eq!(&a | &a, a);
    }

    #[test]
    fn prop_self_difference_is_empty(a in vlan_set()) {
        prop_assert!((&a - &a).is_empty());
    }

    #[test]
    fn prop_union_intersect_nonempty_iff_nonempty(a in vlan_set(), b in vlan_set()) {
        let joined = &(&a | &b) & &a;
        prop_assert_eq!(!joined.is_empty(), !a.is_empty());
    }

    #[test]
    fn prop_render_parse_round_trip(a in vlan_set()) {
        let rendered = a.to_string();
        prop_assert!(!rendered.contains(' '));
        let parsed: VlanRangeSet = rendered.parse().unwrap();
        prop_assert_eq!(parsed, a);
    }

    #[test]
    fn prop_overlap_matches_intersection(a in vlan_set(), b in vlan_set()) {
        prop_assert_eq!(a.overlaps(&b), !(&a & &b).is_empty());
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn prop_difference_is_disjoint_and_subset(a in vlan_set(), b in vlan_set()) {
        let diff = &a - &b;
        prop_assert!(!diff.overlaps(&b));
        prop_assert!(diff.is_subset(&a));
        prop_assert_eq!(&diff | &(&a & &b), a);
    }

    #[test]
    fn prop_scalar_list_and_string_agree(vlans in proptest::collection::vec(2u16..=MAX_VLAN, 1..20)) {
        let from_list = VlanRangeSet::from_vlans(vlans.iter().copied()).unwrap();
        let joined = vlans.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
        let from_string: VlanRangeSet = joined.parse().unwrap();
        let from_scalars: VlanRangeSet = vlans
            .iter()
            .map(|v| VlanRangeSet::single(*v).unwrap())
            .collect();
        prop_assert_eq!(&from_list, &from_string);
        prop_assert_eq!(&from_list, &from_scalars);
    }

    #[test]
    fn prop_membership_matches_iteration(a in vlan_set(), probe in 0u16..=MAX_VLAN) {
        prop_assert_eq!(a.contains(probe), a.iter().any(|v| v == probe));
        prop_assert_eq!(a.len(), a.iter().count());
    }
}
