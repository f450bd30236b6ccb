//! Flattening lifecycle blocks into store records
//!
//! Owned children become instances of the same subscription with a relation
//! to their owner; cross-subscription references (SAP to port, port to node)
//! become relations to the referenced instance.

use crate::store::{InstanceData, InstanceRecord, Relation};
use portclaim_lifecycle::blocks::{
    ActiveCoreLink, ActiveCorePort, ActiveNode, ActiveNsistp, ActivePort, ActiveSap,
    ActiveVirtualCircuit, ProvisioningCoreLink, ProvisioningCorePort, ProvisioningNode,
    ProvisioningNsistp, ProvisioningPort, ProvisioningSap, ProvisioningVirtualCircuit, StpDetails,
};
use portclaim_lifecycle::{InstanceId, SubscriptionId};
use portclaim_ranges::VlanRangeSet;

/// Instances and relations produced by one block tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockRecords {
    /// Block instances, root first
    pub instances: Vec<InstanceRecord>,
    /// Relations, dependency first
    pub relations: Vec<Relation>,
}

impl BlockRecords {
    fn push(&mut self, subscription_id: SubscriptionId, instance_id: InstanceId, data: InstanceData) {
        self.instances
            .push(InstanceRecord::new(instance_id, subscription_id, data));
    }

    fn relate(&mut self, dependency: InstanceId, dependent: InstanceId) {
        self.relations.push(Relation::new(dependency, dependent));
    }
}

/// Block trees that can be stored
pub trait ToRecords {
    /// Flattens the tree for `subscription_id`
    fn to_records(&self, subscription_id: SubscriptionId) -> BlockRecords;
}

fn sap(out: &mut BlockRecords, sub: SubscriptionId, id: InstanceId, port: InstanceId, vlan: &VlanRangeSet) {
    out.push(sub, id, InstanceData::Sap { vlan: vlan.clone() });
    out.relate(port, id);
}

fn stp(out: &mut BlockRecords, sub: SubscriptionId, id: InstanceId, topology: &str, stp_id: &str, details: &StpDetails) {
    out.push(
        sub,
        id,
        InstanceData::Stp {
            topology: topology.to_string(),
            stp_id: stp_id.to_string(),
            bandwidth: details.bandwidth,
        },
    );
}

impl ToRecords for ProvisioningNode {
    fn to_records(&self, subscription_id: SubscriptionId) -> BlockRecords {
        let mut out = BlockRecords::default();
        out.push(subscription_id, self.instance_id, InstanceData::Node { name: self.node_name.clone() });
        out
    }
}

impl ToRecords for ActiveNode {
    fn to_records(&self, subscription_id: SubscriptionId) -> BlockRecords {
        let mut out = BlockRecords::default();
        out.push(subscription_id, self.instance_id, InstanceData::Node { name: self.node_name.clone() });
        out
    }
}

impl ToRecords for ProvisioningPort {
    fn to_records(&self, subscription_id: SubscriptionId) -> BlockRecords {
        let mut out = BlockRecords::default();
        out.push(
            subscription_id,
            self.instance_id,
            InstanceData::Port {
                name: self.port_name.clone(),
                mode: self.port_mode,
            },
        );
        out.relate(self.node, self.instance_id);
        out
    }
}

impl ToRecords for ActivePort {
    fn to_records(&self, subscription_id: SubscriptionId) -> BlockRecords {
        let mut out = BlockRecords::default();
        out.push(
            subscription_id,
            self.instance_id,
            InstanceData::Port {
                name: self.port_name.clone(),
                mode: self.port_mode,
            },
        );
        out.relate(self.node, self.instance_id);
        out
    }
}

impl ToRecords for ProvisioningCorePort {
    fn to_records(&self, subscription_id: SubscriptionId) -> BlockRecords {
        let mut out = BlockRecords::default();
        out.push(subscription_id, self.instance_id, InstanceData::CorePort);
        out.relate(self.node, self.instance_id);
        out
    }
}

impl ToRecords for ActiveCorePort {
    fn to_records(&self, subscription_id: SubscriptionId) -> BlockRecords {
        let mut out = BlockRecords::default();
        out.push(subscription_id, self.instance_id, InstanceData::CorePort);
        out.relate(self.node, self.instance_id);
        out
    }
}

impl ToRecords for ProvisioningSap {
    fn to_records(&self, subscription_id: SubscriptionId) -> BlockRecords {
        let mut out = BlockRecords::default();
        sap(&mut out, subscription_id, self.instance_id, self.port, &self.vlan);
        out
    }
}

impl ToRecords for ActiveSap {
    fn to_records(&self, subscription_id: SubscriptionId) -> BlockRecords {
        let mut out = BlockRecords::default();
        sap(&mut out, subscription_id, self.instance_id, self.port, &self.vlan);
        out
    }
}

impl ToRecords for ProvisioningVirtualCircuit {
    fn to_records(&self, subscription_id: SubscriptionId) -> BlockRecords {
        let mut out = BlockRecords::default();
        out.push(subscription_id, self.instance_id, InstanceData::VirtualCircuit { speed: self.speed });
        for child in &self.saps {
            sap(&mut out, subscription_id, child.instance_id, child.port, &child.vlan);
            out.relate(child.instance_id, self.instance_id);
        }
        out
    }
}

impl ToRecords for ActiveVirtualCircuit {
    fn to_records(&self, subscription_id: SubscriptionId) -> BlockRecords {
        let mut out = BlockRecords::default();
        out.push(subscription_id, self.instance_id, InstanceData::VirtualCircuit { speed: self.speed });
        for child in &self.saps {
            sap(&mut out, subscription_id, child.instance_id, child.port, &child.vlan);
            out.relate(child.instance_id, self.instance_id);
        }
        out
    }
}

impl ToRecords for ProvisioningCoreLink {
    fn to_records(&self, subscription_id: SubscriptionId) -> BlockRecords {
        let mut out = BlockRecords::default();
        out.push(subscription_id, self.instance_id, InstanceData::CoreLink);
        for port in &self.ports {
            out.push(subscription_id, port.instance_id, InstanceData::CorePort);
            out.relate(port.node, port.instance_id);
            out.relate(port.instance_id, self.instance_id);
        }
        out
    }
}

impl ToRecords for ActiveCoreLink {
    fn to_records(&self, subscription_id: SubscriptionId) -> BlockRecords {
        let mut out = BlockRecords::default();
        out.push(subscription_id, self.instance_id, InstanceData::CoreLink);
        for port in &self.ports {
            out.push(subscription_id, port.instance_id, InstanceData::CorePort);
            out.relate(port.node, port.instance_id);
            out.relate(port.instance_id, self.instance_id);
        }
        out
    }
}

impl ToRecords for ProvisioningNsistp {
    fn to_records(&self, subscription_id: SubscriptionId) -> BlockRecords {
        let mut out = BlockRecords::default();
        stp(&mut out, subscription_id, self.instance_id, &self.topology, &self.stp_id, &self.details);
        sap(&mut out, subscription_id, self.sap.instance_id, self.sap.port, &self.sap.vlan);
        out.relate(self.sap.instance_id, self.instance_id);
        out
    }
}

impl ToRecords for ActiveNsistp {
    fn to_records(&self, subscription_id: SubscriptionId) -> BlockRecords {
        let mut out = BlockRecords::default();
        stp(&mut out, subscription_id, self.instance_id, &self.topology, &self.stp_id, &self.details);
        sap(&mut out, subscription_id, self.sap.instance_id, self.sap.port, &self.sap.vlan);
        out.relate(self.sap.instance_id, self.instance_id);
        out
    }
}
