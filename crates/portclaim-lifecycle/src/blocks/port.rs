//! Service port block

use crate::fields::MissingFields;
use crate::ids::InstanceId;
use crate::product::{BlockKind, PortMode};
use crate::stage::{demote_through, incomplete, promote_through, Block, Demote, LifecycleStage, Promote};
use crate::FieldMissingError;
use serde::{Deserialize, Serialize};

/// Service port with every field optional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarePort {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// Interface name on the node
    pub port_name: Option<String>,
    /// Port speed class, e.g. `10G`
    pub port_type: Option<String>,
    /// Free text description
    pub port_description: Option<String>,
    /// Tagged, untagged or link member
    pub port_mode: Option<PortMode>,
    /// Speed auto negotiation
    pub auto_negotiation: Option<bool>,
    /// LLDP enabled
    pub lldp: Option<bool>,
    /// Administratively enabled
    pub enabled: Option<bool>,
    /// Node this port lives on
    pub node: Option<InstanceId>,
    /// Inventory system identifier
    pub ims_id: Option<u64>,
    /// Network resource manager identifier
    pub nrm_id: Option<u64>,
}

impl BarePort {
    /// Empty port with a fresh instance id
    #[must_use]
    pub fn new() -> Self {
        Self {
            instance_id: InstanceId::new(),
            port_name: None,
            port_type: None,
            port_description: None,
            port_mode: None,
            auto_negotiation: None,
            lldp: None,
            enabled: None,
            node: None,
            ims_id: None,
            nrm_id: None,
        }
    }
}

impl Default for BarePort {
    fn default() -> Self {
        Self::new()
    }
}

/// Service port ready to be provisioned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningPort {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// Interface name on the node
    pub port_name: String,
    /// Port speed class, e.g. `10G`
    pub port_type: String,
    /// Free text description
    pub port_description: Option<String>,
    /// Tagged, untagged or link member
    pub port_mode: PortMode,
    /// Speed auto negotiation
    pub auto_negotiation: bool,
    /// LLDP enabled
    pub lldp: bool,
    /// Administratively enabled
    pub enabled: bool,
    /// Node this port lives on
    pub node: InstanceId,
    /// Inventory system identifier
    pub ims_id: u64,
    /// Network resource manager identifier
    pub nrm_id: Option<u64>,
}

/// Service port in service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePort {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// Interface name on the node
    pub port_name: String,
    /// Port speed class, e.g. `10G`
    pub port_type: String,
    /// Free text description
    pub port_description: Option<String>,
    /// Tagged, untagged or link member
    pub port_mode: PortMode,
    /// Speed auto negotiation
    pub auto_negotiation: bool,
    /// LLDP enabled
    pub lldp: bool,
    /// Administratively enabled
    pub enabled: bool,
    /// Node this port lives on
    pub node: InstanceId,
    /// Inventory system identifier
    pub ims_id: u64,
    /// Network resource manager identifier
    pub nrm_id: u64,
}

impl Block for BarePort {
    const KIND: BlockKind = BlockKind::Port;
    const STAGE: LifecycleStage = LifecycleStage::Bare;

    fn missing_fields(&self, target: LifecycleStage) -> Vec<String> {
        let mut missing = MissingFields::new();
        if target >= LifecycleStage::Provisioning {
            missing.check("port_name", self.port_name.is_some());
            missing.check("port_type", self.port_type.is_some());
            missing.check("port_mode", self.port_mode.is_some());
            missing.check("auto_negotiation", self.auto_negotiation.is_some());
            missing.check("lldp", self.lldp.is_some());
            missing.check("enabled", self.enabled.is_some());
            missing.check("node", self.node.is_some());
            missing.check("ims_id", self.ims_id.is_some());
        }
        if target >= LifecycleStage::Active {
            missing.check("nrm_id", self.nrm_id.is_some());
        }
        missing.into_fields()
    }
}

impl Block for ProvisioningPort {
    const KIND: BlockKind = BlockKind::Port;
    const STAGE: LifecycleStage = LifecycleStage::Provisioning;

    fn missing_fields(&self, target: LifecycleStage) -> Vec<String> {
        let mut missing = MissingFields::new();
        if target >= LifecycleStage::Active {
            missing.check("nrm_id", self.nrm_id.is_some());
        }
        missing.into_fields()
    }
}

impl Block for ActivePort {
    const KIND: BlockKind = BlockKind::Port;
    const STAGE: LifecycleStage = LifecycleStage::Active;

    fn missing_fields(&self, _target: LifecycleStage) -> Vec<String> {
        Vec::new()
    }
}

impl Promote<ProvisioningPort> for BarePort {
    fn promote(self) -> Result<ProvisioningPort, FieldMissingError> {
        let missing = self.missing_fields(LifecycleStage::Provisioning);
        let (
            Some(port_name),
            Some(port_type),
            Some(port_mode),
            Some(auto_negotiation),
            Some(lldp),
            Some(enabled),
            Some(node),
            Some(ims_id),
        ) = (
            self.port_name,
            self.port_type,
            self.port_mode,
            self.auto_negotiation,
            self.lldp,
            self.enabled,
            self.node,
            self.ims_id,
        )
        else {
            return Err(incomplete::<Self>(LifecycleStage::Provisioning, missing));
        };
        Ok(ProvisioningPort {
            instance_id: self.instance_id,
            port_name,
            port_type,
            port_description: self.port_description,
            port_mode,
            auto_negotiation,
            lldp,
            enabled,
            node,
            ims_id,
            nrm_id: self.nrm_id,
        })
    }
}

impl Promote<ActivePort> for ProvisioningPort {
    fn promote(self) -> Result<ActivePort, FieldMissingError> {
        let missing = self.missing_fields(LifecycleStage::Active);
        let Some(nrm_id) = self.nrm_id else {
            return Err(incomplete::<Self>(LifecycleStage::Active, missing));
        };
        Ok(ActivePort {
            instance_id: self.instance_id,
            port_name: self.port_name,
            port_type: self.port_type,
            port_description: self.port_description,
            port_mode: self.port_mode,
            auto_negotiation: self.auto_negotiation,
            lldp: self.lldp,
            enabled: self.enabled,
            node: self.node,
            ims_id: self.ims_id,
            nrm_id,
        })
    }
}

impl Promote<ActivePort> for BarePort {
    fn promote(self) -> Result<ActivePort, FieldMissingError> {
        promote_through::<Self, ProvisioningPort, ActivePort>(self)
    }
}

impl Demote<ProvisioningPort> for ActivePort {
    fn demote(self) -> ProvisioningPort {
        ProvisioningPort {
            instance_id: self.instance_id,
            port_name: self.port_name,
            port_type: self.port_type,
            port_description: self.port_description,
            port_mode: self.port_mode,
            auto_negotiation: self.auto_negotiation,
            lldp: self.lldp,
            enabled: self.enabled,
            node: self.node,
            ims_id: self.ims_id,
            nrm_id: Some(self.nrm_id),
        }
    }
}

impl Demote<BarePort> for ProvisioningPort {
    fn demote(self) -> BarePort {
        BarePort {
            instance_id: self.instance_id,
            port_name: Some(self.port_name),
            port_type: Some(self.port_type),
            port_description: self.port_description,
            port_mode: Some(self.port_mode),
            auto_negotiation: Some(self.auto_negotiation),
            lldp: Some(self.lldp),
            enabled: Some(self.enabled),
            node: Some(self.node),
            ims_id: Some(self.ims_id),
            nrm_id: self.nrm_id,
        }
    }
}

impl Demote<BarePort> for ActivePort {
    fn demote(self) -> BarePort {
        demote_through::<Self, ProvisioningPort, BarePort>(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{demote, promote};
    use pretty_assertions::assert_eq;

    fn complete() -> BarePort {
        BarePort {
            port_name: Some("xe-0/0/1".into()),
            port_type: Some("10G".into()),
            port_mode: Some(PortMode::Tagged),
            auto_negotiation: Some(false),
            lldp: Some(true),
            enabled: Some(true),
            node: Some(InstanceId::new()),
            ims_id: Some(1001),
            nrm_id: Some(2001),
            ..BarePort::new()
        }
    }

    #[test]
    fn test_missing_port_name_is_the_only_complaint() {
        let bare = BarePort {
            port_name: None,
            ..complete()
        };
        let err = promote::<ProvisioningPort, _>(bare).unwrap_err();
        assert_eq!(err.fields, vec!["port_name"]);
        assert_eq!(err.block, BlockKind::Port);
        assert_eq!(err.target, LifecycleStage::Provisioning);
    }

    #[test]
    fn test_nrm_id_only_needed_for_active() {
        let bare = BarePort {
            nrm_id: None,
            ..complete()
        };
        let provisioning: ProvisioningPort = promote(bare).unwrap();
        let err = promote::<ActivePort, _>(provisioning).unwrap_err();
        assert_eq!(err.fields, vec!["nrm_id"]);
    }

    #[test]
    fn test_demote_then_promote_restores_values() {
        let active: ActivePort = promote(complete()).unwrap();
        let bare: BarePort = demote(active.clone());
        let again: ActivePort = promote(bare).unwrap();
        assert_eq!(again, active);
    }
}
