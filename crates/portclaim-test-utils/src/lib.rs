//! Testing utilities for the portclaim workspace
//!
//! A small network in a [`MemoryStore`]: one node, ports on it and the
//! subscriptions that claim VLANs on those ports.

#![allow(missing_docs)]

use portclaim_graph::{MemoryStore, SubscriptionRecord, ToRecords};
use portclaim_lifecycle::blocks::{
    ActiveNode, ActivePort, ProvisioningNsistp, ProvisioningSap, ProvisioningVirtualCircuit,
    StpDetails,
};
use portclaim_lifecycle::{InstanceId, NodeStatus, PortMode, ProductType, SubscriptionId, SubscriptionStatus};
use portclaim_ranges::VlanRangeSet;
use std::cell::Cell;

/// Speed given to ports created without an explicit one
pub const DEFAULT_PORT_SPEED: u32 = 10_000;

pub struct Fixture {
    pub store: MemoryStore,
    pub node: SubscriptionId,
    node_instance: InstanceId,
    counter: Cell<u32>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Store holding a single active node
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let node = SubscriptionId::new();
        let block = ActiveNode {
            instance_id: InstanceId::new(),
            role_id: 1,
            type_id: 1,
            site_id: 1,
            node_status: NodeStatus::Active,
            node_name: "asd001a-jnx-01".into(),
            node_description: None,
            ims_id: 1,
            nrm_id: 1,
            ipv4_ipam_id: 1,
            ipv6_ipam_id: 1,
        };
        let mut tx = store.begin();
        tx.insert_subscription(SubscriptionRecord::new(node, ProductType::Node, SubscriptionStatus::Active))
            .insert_blocks(node, &block);
        tx.commit().unwrap();
        Self {
            store,
            node,
            node_instance: block.instance_id,
            counter: Cell::new(0),
        }
    }

    fn next(&self) -> u32 {
        let value = self.counter.get() + 1;
        self.counter.set(value);
        value
    }

    pub fn port_with_speed(&self, name: &str, mode: PortMode, speed: u32) -> SubscriptionId {
        let sub = SubscriptionId::new();
        let block = ActivePort {
            instance_id: InstanceId::new(),
            port_name: name.into(),
            port_type: "10G".into(),
            port_description: None,
            port_mode: mode,
            auto_negotiation: false,
            lldp: true,
            enabled: true,
            node: self.node_instance,
            ims_id: u64::from(self.next()),
            nrm_id: u64::from(self.next()),
        };
        let mut tx = self.store.begin();
        tx.insert_subscription(
            SubscriptionRecord::new(sub, ProductType::Port, SubscriptionStatus::Active)
                .with_description(format!("Port {name}"))
                .with_speed(speed),
        )
        .insert_blocks(sub, &block);
        tx.commit().unwrap();
        sub
    }

    pub fn port(&self, name: &str, mode: PortMode) -> SubscriptionId {
        self.port_with_speed(name, mode, DEFAULT_PORT_SPEED)
    }

    pub fn tagged_port(&self, name: &str) -> SubscriptionId {
        self.port(name, PortMode::Tagged)
    }

    pub fn untagged_port(&self, name: &str) -> SubscriptionId {
        self.port(name, PortMode::Untagged)
    }

    pub fn link_member_port(&self, name: &str) -> SubscriptionId {
        self.port(name, PortMode::LinkMember)
    }

    /// Instance id of the port block of `port`
    pub fn port_instance(&self, port: SubscriptionId) -> InstanceId {
        use portclaim_graph::SubscriptionStore;
        self.store
            .instances_of(port)
            .unwrap()
            .into_iter()
            .find(|record| record.port_mode().is_some())
            .map(|record| record.instance_id)
            .unwrap()
    }

    pub fn sap_block(&self, port: SubscriptionId, vlan: &str) -> ProvisioningSap {
        ProvisioningSap {
            instance_id: InstanceId::new(),
            port: self.port_instance(port),
            vlan: vlan.parse::<VlanRangeSet>().unwrap(),
            ims_id: None,
        }
    }

    fn insert<T: ToRecords>(&self, product: ProductType, status: SubscriptionStatus, block: &T) -> SubscriptionId {
        let sub = SubscriptionId::new();
        let mut tx = self.store.begin();
        tx.insert_subscription(SubscriptionRecord::new(sub, product, status))
            .insert_blocks(sub, block);
        tx.commit().unwrap();
        sub
    }

    /// Subscription of `product` in `status` holding one SAP with `vlan` on `port`
    pub fn sap_holder(
        &self,
        port: SubscriptionId,
        product: ProductType,
        status: SubscriptionStatus,
        vlan: &str,
    ) -> SubscriptionId {
        let block = self.sap_block(port, vlan);
        self.insert(product, status, &block)
    }

    /// Active L2VPN with a single SAP
    pub fn holder(&self, port: SubscriptionId, vlan: &str) -> SubscriptionId {
        self.sap_holder(port, ProductType::L2vpn, SubscriptionStatus::Active, vlan)
    }

    /// Virtual circuit of `product` with one SAP per `(port, vlan)`
    pub fn circuit(
        &self,
        product: ProductType,
        status: SubscriptionStatus,
        saps: &[(SubscriptionId, &str)],
    ) -> SubscriptionId {
        let block = ProvisioningVirtualCircuit {
            instance_id: InstanceId::new(),
            saps: saps.iter().map(|(port, vlan)| self.sap_block(*port, vlan)).collect(),
            speed: 1000,
            speed_policer: false,
            ims_id: None,
            nrm_id: None,
        };
        self.insert(product, status, &block)
    }

    /// Active NSISTP reserving `vlan` on `port`
    pub fn stp(&self, port: SubscriptionId, vlan: &str, topology: &str, stp_id: &str) -> SubscriptionId {
        let block = ProvisioningNsistp {
            instance_id: InstanceId::new(),
            sap: self.sap_block(port, vlan),
            topology: topology.into(),
            stp_id: stp_id.into(),
            details: StpDetails {
                bandwidth: Some(1000),
                ..StpDetails::default()
            },
        };
        self.insert(ProductType::Nsistp, SubscriptionStatus::Active, &block)
    }

    /// Active NSISTP with a generated identifier
    pub fn reserve(&self, port: SubscriptionId, vlan: &str) -> SubscriptionId {
        let stp_id = format!("stp-{}", self.next());
        self.stp(port, vlan, "fixture-topology", &stp_id)
    }

    /// Active NSIP2P SAP on `port`
    pub fn consume(&self, port: SubscriptionId, vlan: &str) -> SubscriptionId {
        self.sap_holder(port, ProductType::Nsip2p, SubscriptionStatus::Active, vlan)
    }

    pub fn set_status(&self, subscription: SubscriptionId, status: SubscriptionStatus) {
        let mut tx = self.store.begin();
        tx.set_status(subscription, status);
        tx.commit().unwrap();
    }
}

/// Parses a VLAN set, panicking on bad input
pub fn vlans(text: &str) -> VlanRangeSet {
    text.parse().unwrap()
}
