//! Core (backbone) port block

use crate::fields::MissingFields;
use crate::ids::InstanceId;
use crate::product::BlockKind;
use crate::stage::{demote_through, incomplete, promote_through, Block, Demote, LifecycleStage, Promote};
use crate::FieldMissingError;
use serde::{Deserialize, Serialize};

/// Core port with every field optional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BareCorePort {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// Interface name on the node
    pub port_name: Option<String>,
    /// Administratively enabled
    pub enabled: Option<bool>,
    /// Node this port lives on
    pub node: Option<InstanceId>,
    /// Inventory system identifier
    pub ims_id: Option<u64>,
    /// Network resource manager identifier
    pub nrm_id: Option<u64>,
    /// IPAM identifier of the IPv6 address
    pub ipv6_ipam_id: Option<u64>,
}

impl BareCorePort {
    /// Empty core port with a fresh instance id
    #[must_use]
    pub fn new() -> Self {
        Self {
            instance_id: InstanceId::new(),
            port_name: None,
            enabled: None,
            node: None,
            ims_id: None,
            nrm_id: None,
            ipv6_ipam_id: None,
        }
    }
}

impl Default for BareCorePort {
    fn default() -> Self {
        Self::new()
    }
}

/// Core port ready to be provisioned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningCorePort {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// Interface name on the node
    pub port_name: Option<String>,
    /// Administratively enabled
    pub enabled: bool,
    /// Node this port lives on
    pub node: InstanceId,
    /// Inventory system identifier
    pub ims_id: Option<u64>,
    /// Network resource manager identifier
    pub nrm_id: Option<u64>,
    /// IPAM identifier of the IPv6 address
    pub ipv6_ipam_id: Option<u64>,
}

/// Core port in service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveCorePort {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// Interface name on the node
    pub port_name: Option<String>,
    /// Administratively enabled
    pub enabled: bool,
    /// Node this port lives on
    pub node: InstanceId,
    /// Inventory system identifier
    pub ims_id: u64,
    /// Network resource manager identifier
    pub nrm_id: u64,
    /// IPAM identifier of the IPv6 address
    pub ipv6_ipam_id: u64,
}

impl Block for BareCorePort {
    const KIND: BlockKind = BlockKind::CorePort;
    const STAGE: LifecycleStage = LifecycleStage::Bare;

    fn missing_fields(&self, target: LifecycleStage) -> Vec<String> {
        let mut missing = MissingFields::new();
        if target >= LifecycleStage::Provisioning {
            missing.check("enabled", self.enabled.is_some());
            missing.check("node", self.node.is_some());
        }
        if target >= LifecycleStage::Active {
            missing.check("ims_id", self.ims_id.is_some());
            missing.check("nrm_id", self.nrm_id.is_some());
            missing.check("ipv6_ipam_id", self.ipv6_ipam_id.is_some());
        }
        missing.into_fields()
    }
}

impl Block for ProvisioningCorePort {
    const KIND: BlockKind = BlockKind::CorePort;
    const STAGE: LifecycleStage = LifecycleStage::Provisioning;

    fn missing_fields(&self, target: LifecycleStage) -> Vec<String> {
        let mut missing = MissingFields::new();
        if target >= LifecycleStage::Active {
            missing.check("ims_id", self.ims_id.is_some());
            missing.check("nrm_id", self.nrm_id.is_some());
            missing.check("ipv6_ipam_id", self.ipv6_ipam_id.is_some());
        }
        missing.into_fields()
    }
}

impl Block for ActiveCorePort {
    const KIND: BlockKind = BlockKind::CorePort;
    const STAGE: LifecycleStage = LifecycleStage::Active;

    fn missing_fields(&self, _target: LifecycleStage) -> Vec<String> {
        Vec::new()
    }
}

impl Promote<ProvisioningCorePort> for BareCorePort {
    fn promote(self) -> Result<ProvisioningCorePort, FieldMissingError> {
        let missing = self.missing_fields(LifecycleStage::Provisioning);
        let (Some(enabled), Some(node)) = (self.enabled, self.node) else {
            return Err(incomplete::<Self>(LifecycleStage::Provisioning, missing));
        };
        Ok(ProvisioningCorePort {
            instance_id: self.instance_id,
            port_name: self.port_name,
            enabled,
            node,
            ims_id: self.ims_id,
            nrm_id: self.nrm_id,
            ipv6_ipam_id: self.ipv6_ipam_id,
        })
    }
}

impl Promote<ActiveCorePort> for ProvisioningCorePort {
    fn promote(self) -> Result<ActiveCorePort, FieldMissingError> {
        let missing = self.missing_fields(LifecycleStage::Active);
        let (Some(ims_id), Some(nrm_id), Some(ipv6_ipam_id)) =
            (self.ims_id, self.nrm_id, self.ipv6_ipam_id)
        else {
            return Err(incomplete::<Self>(LifecycleStage::Active, missing));
        };
        Ok(ActiveCorePort {
            instance_id: self.instance_id,
            port_name: self.port_name,
            enabled: self.enabled,
            node: self.node,
            ims_id,
            nrm_id,
            ipv6_ipam_id,
        })
    }
}

impl Promote<ActiveCorePort> for BareCorePort {
    fn promote(self) -> Result<ActiveCorePort, FieldMissingError> {
        promote_through::<Self, ProvisioningCorePort, ActiveCorePort>(self)
    }
}

impl Demote<ProvisioningCorePort> for ActiveCorePort {
    fn demote(self) -> ProvisioningCorePort {
        ProvisioningCorePort {
            instance_id: self.instance_id,
            port_name: self.port_name,
            enabled: self.enabled,
            node: self.node,
            ims_id: Some(self.ims_id),
            nrm_id: Some(self.nrm_id),
            ipv6_ipam_id: Some(self.ipv6_ipam_id),
        }
    }
}

impl Demote<BareCorePort> for ProvisioningCorePort {
    fn demote(self) -> BareCorePort {
        BareCorePort {
            instance_id: self.instance_id,
            port_name: self.port_name,
            enabled: Some(self.enabled),
            node: Some(self.node),
            ims_id: self.ims_id,
            nrm_id: self.nrm_id,
            ipv6_ipam_id: self.ipv6_ipam_id,
        }
    }
}

impl Demote<BareCorePort> for ActiveCorePort {
    fn demote(self) -> BareCorePort {
        demote_through::<Self, ProvisioningCorePort, BareCorePort>(self)
    }
}
