use portclaim_graph::{MemoryStore, SubscriptionRecord, SubscriptionStore, UsageLookup};
use portclaim_lifecycle::prelude::*;
use portclaim_ranges::VlanRangeSet;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

struct Network {
    store: MemoryStore,
    ports: Vec<(SubscriptionId, InstanceId)>,
}

fn network(port_count: usize) -> Network {
    let store = MemoryStore::new();
    let node_sub = SubscriptionId::new();
    let node = ActiveNode {
        instance_id: InstanceId::new(),
        role_id: 1,
        type_id: 1,
        site_id: 1,
        node_status: NodeStatus::Active,
        node_name: "rt1".into(),
        node_description: None,
        ims_id: 1,
        nrm_id: 1,
        ipv4_ipam_id: 1,
        ipv6_ipam_id: 1,
    };
    let mut tx = store.begin();
    tx.insert_subscription(SubscriptionRecord::new(
        node_sub,
        ProductType::Node,
        SubscriptionStatus::Active,
    ))
    .insert_blocks(node_sub, &node);

    let mut ports = Vec::new();
    for index in 0..port_count {
        let sub = SubscriptionId::new();
        let port = ActivePort {
            instance_id: InstanceId::new(),
            port_name: format!("xe-0/0/{index}"),
            port_type: "10G".into(),
            port_description: None,
            port_mode: PortMode::Tagged,
            auto_negotiation: false,
            lldp: true,
            enabled: true,
            node: node.instance_id,
            ims_id: 10,
            nrm_id: 20,
        };
        tx.insert_subscription(
            SubscriptionRecord::new(sub, ProductType::Port, SubscriptionStatus::Active)
                .with_speed(10_000),
        )
        .insert_blocks(sub, &port);
        ports.push((sub, port.instance_id));
    }
    tx.commit().unwrap();
    Network { store, ports }
}

fn sap(port: InstanceId, vlan: &str) -> ProvisioningSap {
    ProvisioningSap {
        instance_id: InstanceId::new(),
        port,
        vlan: vlan.parse().unwrap(),
        ims_id: None,
    }
}

#[test]
fn circuit_claims_show_up_on_both_ports() {
    let net = network(2);
    let circuit_sub = SubscriptionId::new();
    let circuit = ProvisioningVirtualCircuit {
        instance_id: InstanceId::new(),
        saps: vec![sap(net.ports[0].1, "100"), sap(net.ports[1].1, "200-201")],
        speed: 1000,
        speed_policer: false,
        ims_id: None,
        nrm_id: None,
    };
    let mut tx = net.store.begin();
    tx.insert_subscription(SubscriptionRecord::new(
        circuit_sub,
        ProductType::L2vpn,
        SubscriptionStatus::Provisioning,
    ))
    .insert_blocks(circuit_sub, &circuit);
    tx.commit().unwrap();

    let lookup = UsageLookup::new(&net.store);
    let claiming = [SubscriptionStatus::Provisioning, SubscriptionStatus::Active];
    assert_eq!(
        lookup.used_vlans(net.ports[0].0, &[ProductType::L2vpn], &claiming).unwrap(),
        VlanRangeSet::single(100).unwrap()
    );
    assert_eq!(
        lookup.used_vlans(net.ports[1].0, &[], &claiming).unwrap().to_string(),
        "200-201"
    );
    assert_eq!(
        lookup
            .dependents_of(net.ports[1].0, Some(ProductType::L2vpn), &claiming)
            .unwrap(),
        BTreeSet::from([circuit_sub])
    );
    assert!(lookup.active_vlans(net.ports[0].0).unwrap().is_empty());
}

#[test]
fn node_reaches_everything_built_on_it() {
    let net = network(3);
    let node_sub = net
        .store
        .subscriptions_by_product(ProductType::Node)
        .first()
        .map(|record| record.subscription_id)
        .unwrap();
    let lookup = UsageLookup::new(&net.store);
    let ports = lookup
        .dependents_of(node_sub, Some(ProductType::Port), &[SubscriptionStatus::Active])
        .unwrap();
    assert_eq!(ports.len(), 3);
}

#[test]
fn terminated_claim_is_released() {
    let net = network(1);
    let (port_sub, port) = net.ports[0];
    let holder = SubscriptionId::new();
    let mut tx = net.store.begin();
    tx.insert_subscription(SubscriptionRecord::new(
        holder,
        ProductType::L2vpn,
        SubscriptionStatus::Active,
    ))
    .insert_blocks(holder, &sap(port, "42"));
    tx.commit().unwrap();

    let lookup = UsageLookup::new(&net.store);
    assert_eq!(lookup.active_vlans(port_sub).unwrap().to_string(), "42");

    let mut tx = net.store.begin();
    tx.set_status(holder, SubscriptionStatus::Terminated);
    tx.commit().unwrap();
    let claiming: Vec<_> = SubscriptionStatus::ALL
        .into_iter()
        .filter(|status| status.holds_claim())
        .collect();
    assert!(lookup.used_vlans(port_sub, &[], &claiming).unwrap().is_empty());
}

#[test]
fn modify_replaces_claim_in_place() {
    let net = network(1);
    let (port_sub, port) = net.ports[0];
    let holder = SubscriptionId::new();
    let block = sap(port, "10-20");
    let mut tx = net.store.begin();
    tx.insert_subscription(SubscriptionRecord::new(
        holder,
        ProductType::L2vpn,
        SubscriptionStatus::Active,
    ))
    .insert_blocks(holder, &block);
    tx.commit().unwrap();

    let mut tx = net.store.begin();
    tx.set_vlan(block.instance_id, "10-20,25".parse().unwrap());
    tx.commit().unwrap();

    let lookup = UsageLookup::new(&net.store);
    assert_eq!(lookup.active_vlans(port_sub).unwrap().to_string(), "10-20,25");
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_used_vlans_is_union_of_holders(vlans in proptest::collection::vec(2u16..=4094, 1..10)) {
            let net = network(1);
            let (port_sub, port) = net.ports[0];
            let mut holders = BTreeSet::new();
            let mut tx = net.store.begin();
            for vlan in &vlans {
                let holder = SubscriptionId::new();
                tx.insert_subscription(SubscriptionRecord::new(
                    holder,
                    ProductType::L2vpn,
                    SubscriptionStatus::Active,
                ))
                .insert_blocks(holder, &sap(port, &vlan.to_string()));
                holders.insert(holder);
            }
            tx.commit().unwrap();

            let lookup = UsageLookup::new(&net.store);
            let expected = VlanRangeSet::from_vlans(vlans.iter().copied()).unwrap();
            prop_assert_eq!(lookup.active_vlans(port_sub).unwrap(), expected);
            let found = lookup
                .dependents_of(port_sub, None, &[SubscriptionStatus::Active])
                .unwrap();
            prop_assert!(!found.contains(&port_sub));
            prop_assert_eq!(found, holders);
        }
    }
}
