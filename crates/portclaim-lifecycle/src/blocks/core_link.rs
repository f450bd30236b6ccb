//! Core link block: owns exactly two core ports

use super::core_port::{ActiveCorePort, BareCorePort, ProvisioningCorePort};
use crate::fields::MissingFields;
use crate::ids::InstanceId;
use crate::product::BlockKind;
use crate::stage::{demote_through, incomplete, promote_through, Block, Demote, LifecycleStage, Promote};
use crate::FieldMissingError;
use serde::{Deserialize, Serialize};

/// Core link with every field optional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BareCoreLink {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// Core ports at both ends
    pub ports: [BareCorePort; 2],
    /// Link is drained for maintenance
    pub under_maintenance: Option<bool>,
    /// Inventory system identifier
    pub ims_id: Option<u64>,
    /// IPAM identifier of the link prefix
    pub ipv6_prefix_ipam_id: Option<u64>,
    /// Network resource manager identifier
    pub nrm_id: Option<u64>,
}

impl BareCoreLink {
    /// Empty link with two empty ports
    #[must_use]
    pub fn new() -> Self {
        Self {
            instance_id: InstanceId::new(),
            ports: [BareCorePort::new(), BareCorePort::new()],
            under_maintenance: None,
            ims_id: None,
            ipv6_prefix_ipam_id: None,
            nrm_id: None,
        }
    }
}

impl Default for BareCoreLink {
    fn default() -> Self {
        Self::new()
    }
}

/// Core link ready to be provisioned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningCoreLink {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// Core ports at both ends
    pub ports: [ProvisioningCorePort; 2],
    /// Link is drained for maintenance
    pub under_maintenance: bool,
    /// Inventory system identifier
    pub ims_id: Option<u64>,
    /// IPAM identifier of the link prefix
    pub ipv6_prefix_ipam_id: Option<u64>,
    /// Network resource manager identifier
    pub nrm_id: Option<u64>,
}

/// Core link in service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveCoreLink {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// Core ports at both ends
    pub ports: [ActiveCorePort; 2],
    /// Link is drained for maintenance
    pub under_maintenance: bool,
    /// Inventory system identifier
    pub ims_id: u64,
    /// IPAM identifier of the link prefix
    pub ipv6_prefix_ipam_id: u64,
    /// Network resource manager identifier
    pub nrm_id: u64,
}

fn nested_ports<P: Block>(missing: &mut MissingFields, ports: &[P; 2], target: LifecycleStage) {
    for (index, port) in ports.iter().enumerate() {
        missing.nested(&format!("ports[{index}]"), port.missing_fields(target));
    }
}

impl Block for BareCoreLink {
    const KIND: BlockKind = BlockKind::CoreLink;
    const STAGE: LifecycleStage = LifecycleStage::Bare;

    fn missing_fields(&self, target: LifecycleStage) -> Vec<String> {
        let mut missing = MissingFields::new();
        nested_ports(&mut missing, &self.ports, target);
        if target >= LifecycleStage::Provisioning {
            missing.check("under_maintenance", self.under_maintenance.is_some());
        }
        if target >= LifecycleStage::Active {
            missing.check("ims_id", self.ims_id.is_some());
            missing.check("ipv6_prefix_ipam_id", self.ipv6_prefix_ipam_id.is_some());
            missing.check("nrm_id", self.nrm_id.is_some());
        }
        missing.into_fields()
    }
}

impl Block for ProvisioningCoreLink {
    const KIND: BlockKind = BlockKind::CoreLink;
    const STAGE: LifecycleStage = LifecycleStage::Provisioning;

    fn missing_fields(&self, target: LifecycleStage) -> Vec<String> {
        let mut missing = MissingFields::new();
        nested_ports(&mut missing, &self.ports, target);
        if target >= LifecycleStage::Active {
            missing.check("ims_id", self.ims_id.is_some());
            missing.check("ipv6_prefix_ipam_id", self.ipv6_prefix_ipam_id.is_some());
            missing.check("nrm_id", self.nrm_id.is_some());
        }
        missing.into_fields()
    }
}

impl Block for ActiveCoreLink {
    const KIND: BlockKind = BlockKind::CoreLink;
    const STAGE: LifecycleStage = LifecycleStage::Active;

    fn missing_fields(&self, _target: LifecycleStage) -> Vec<String> {
        Vec::new()
    }
}

impl Promote<ProvisioningCoreLink> for BareCoreLink {
    fn promote(self) -> Result<ProvisioningCoreLink, FieldMissingError> {
        let missing = self.missing_fields(LifecycleStage::Provisioning);
        let [a, b] = self.ports;
        let (Ok(a), Ok(b), Some(under_maintenance)) = (
            Promote::<ProvisioningCorePort>::promote(a),
            Promote::<ProvisioningCorePort>::promote(b),
            self.under_maintenance,
        ) else {
            return Err(incomplete::<Self>(LifecycleStage::Provisioning, missing));
        };
        Ok(ProvisioningCoreLink {
            instance_id: self.instance_id,
            ports: [a, b],
            under_maintenance,
            ims_id: self.ims_id,
            ipv6_prefix_ipam_id: self.ipv6_prefix_ipam_id,
            nrm_id: self.nrm_id,
        })
    }
}

impl Promote<ActiveCoreLink> for ProvisioningCoreLink {
    fn promote(self) -> Result<ActiveCoreLink, FieldMissingError> {
        let missing = self.missing_fields(LifecycleStage::Active);
        let [a, b] = self.ports;
        let (Ok(a), Ok(b), Some(ims_id), Some(ipv6_prefix_ipam_id), Some(nrm_id)) = (
            Promote::<ActiveCorePort>::promote(a),
            Promote::<ActiveCorePort>::promote(b),
            self.ims_id,
            self.ipv6_prefix_ipam_id,
            self.nrm_id,
        ) else {
            return Err(incomplete::<Self>(LifecycleStage::Active, missing));
        };
        Ok(ActiveCoreLink {
            instance_id: self.instance_id,
            ports: [a, b],
            under_maintenance: self.under_maintenance,
            ims_id,
            ipv6_prefix_ipam_id,
            nrm_id,
        })
    }
}

impl Promote<ActiveCoreLink> for BareCoreLink {
    fn promote(self) -> Result<ActiveCoreLink, FieldMissingError> {
        promote_through::<Self, ProvisioningCoreLink, ActiveCoreLink>(self)
    }
}

impl Demote<ProvisioningCoreLink> for ActiveCoreLink {
    fn demote(self) -> ProvisioningCoreLink {
        ProvisioningCoreLink {
            instance_id: self.instance_id,
            ports: self.ports.map(Demote::<ProvisioningCorePort>::demote),
            under_maintenance: self.under_maintenance,
            ims_id: Some(self.ims_id),
            ipv6_prefix_ipam_id: Some(self.ipv6_prefix_ipam_id),
            nrm_id: Some(self.nrm_id),
        }
    }
}

impl Demote<BareCoreLink> for ProvisioningCoreLink {
    fn demote(self) -> BareCoreLink {
        BareCoreLink {
            instance_id: self.instance_id,
            ports: self.ports.map(Demote::<BareCorePort>::demote),
            under_maintenance: Some(self.under_maintenance),
            ims_id: self.ims_id,
            ipv6_prefix_ipam_id: self.ipv6_prefix_ipam_id,
            nrm_id: self.nrm_id,
        }
    }
}

impl Demote<BareCoreLink> for ActiveCoreLink {
    fn demote(self) -> BareCoreLink {
        demote_through::<Self, ProvisioningCoreLink, BareCoreLink>(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::promote;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_both_ports_are_reported() {
        let link = BareCoreLink {
            under_maintenance: Some(false),
            ..BareCoreLink::new()
        };
        let err = promote::<ProvisioningCoreLink, _>(link).unwrap_err();
        assert_eq!(
            err.fields,
            vec![
                "ports[0].enabled",
                "ports[0].node",
                "ports[1].enabled",
                "ports[1].node"
            ]
        );
    }

    #[test]
    fn test_port_name_stays_optional() {
        let port = |node| BareCorePort {
            enabled: Some(true),
            node: Some(node),
            ..BareCorePort::new()
        };
        let link = BareCoreLink {
            ports: [port(InstanceId::new()), port(InstanceId::new())],
            under_maintenance: Some(true),
            ..BareCoreLink::new()
        };
        let promoted: ProvisioningCoreLink = promote(link).unwrap();
        assert!(promoted.ports.iter().all(|p| p.port_name.is_none()));
    }
}
