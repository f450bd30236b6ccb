use portclaim_alloc::prelude::*;
use portclaim_alloc::validator::{check_cardinality, check_reservation, check_usage};
use portclaim_lifecycle::PortMode;
use portclaim_ranges::MAX_VLAN;
use portclaim_test_utils::Fixture;
use proptest::prelude::*;

fn tagged_set() -> impl Strategy<Value = Vec<u16>> {
    proptest::collection::vec(2u16..=MAX_VLAN, 1..12)
}

fn render(vlans: &[u16]) -> String {
    vlans.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}

fn mode() -> impl Strategy<Value = PortMode> {
    prop_oneof![
        Just(PortMode::Tagged),
        Just(PortMode::Untagged),
        Just(PortMode::LinkMember),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_rejects_iff_overlap(used in tagged_set(), candidate in tagged_set()) {
        let used_set = VlanRangeSet::from_vlans(used.iter().copied()).unwrap();
        let overlaps = candidate.iter().any(|vlan| used_set.contains(*vlan));

        let built = [
            VlanRangeSet::from_vlans(candidate.iter().copied()).unwrap(),
            render(&candidate).parse().unwrap(),
            candidate
                .iter()
                .map(|vlan| VlanRangeSet::single(*vlan).unwrap())
                .collect(),
        ];
        for set in &built {
            let result = check_usage(set, &used_set, PortMode::Tagged);
            prop_assert_eq!(result.is_err(), overlaps);
        }
    }

    #[test]
    fn prop_cardinality_by_mode(mode in mode(), candidate in tagged_set(), untagged in any::<bool>()) {
        let set = if untagged {
            VlanRangeSet::untagged()
        } else {
            VlanRangeSet::from_vlans(candidate).unwrap()
        };
        let accepted = check_cardinality(&set, mode).is_ok();
        match mode {
            PortMode::Tagged => prop_assert_eq!(accepted, !untagged),
            PortMode::Untagged | PortMode::LinkMember => prop_assert_eq!(accepted, untagged),
        }
    }

    #[test]
    fn prop_consumer_accepted_only_inside_reservation(
        reserved in tagged_set(),
        candidate in tagged_set(),
    ) {
        let reserved_set = VlanRangeSet::from_vlans(reserved).unwrap();
        let candidate_set = VlanRangeSet::from_vlans(candidate).unwrap();
        prop_assert_eq!(
            check_reservation(&candidate_set, &reserved_set).is_ok(),
            candidate_set.is_subset(&reserved_set)
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_validator_matches_store_usage(held in tagged_set(), candidate in tagged_set()) {
        let fx = Fixture::new();
        let port = fx.tagged_port("xe-9/9/9");
        let held_set = VlanRangeSet::from_vlans(held).unwrap();
        fx.holder(port, &held_set.to_string());

        let config = AllocatorConfig::default();
        let validator = AllocationValidator::new(&fx.store, &config);
        let candidate_set = VlanRangeSet::from_vlans(candidate).unwrap();
        let result = validator.validate(&AllocationRequest::new(port, Some(candidate_set.clone())));
        prop_assert_eq!(result.is_err(), candidate_set.overlaps(&held_set));
        if let Err(err) = result {
            prop_assert_eq!(err.kind(), ErrorKind::VlanInUse);
        }
    }
}
