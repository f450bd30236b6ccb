//! Service access point block: a port paired with the VLANs it uses

use crate::fields::MissingFields;
use crate::ids::InstanceId;
use crate::product::BlockKind;
use crate::stage::{demote_through, incomplete, promote_through, Block, Demote, LifecycleStage, Promote};
use crate::FieldMissingError;
use portclaim_ranges::VlanRangeSet;
use serde::{Deserialize, Serialize};

/// SAP with every field optional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BareSap {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// Port block this SAP sits on (lives in the port's subscription)
    pub port: Option<InstanceId>,
    /// VLANs claimed on the port
    pub vlan: Option<VlanRangeSet>,
    /// Inventory system identifier
    pub ims_id: Option<u64>,
}

impl BareSap {
    /// Empty SAP with a fresh instance id
    #[must_use]
    pub fn new() -> Self {
        Self {
            instance_id: InstanceId::new(),
            port: None,
            vlan: None,
            ims_id: None,
        }
    }
}

impl Default for BareSap {
    fn default() -> Self {
        Self::new()
    }
}

/// SAP ready to be provisioned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningSap {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// Port block this SAP sits on
    pub port: InstanceId,
    /// VLANs claimed on the port
    pub vlan: VlanRangeSet,
    /// Inventory system identifier
    pub ims_id: Option<u64>,
}

/// SAP in service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSap {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// Port block this SAP sits on
    pub port: InstanceId,
    /// VLANs claimed on the port
    pub vlan: VlanRangeSet,
    /// Inventory system identifier
    pub ims_id: u64,
}

impl ProvisioningSap {
    /// Human readable label
    #[must_use]
    pub fn title(&self) -> String {
        format!("SAP {} on port {}", self.vlan, self.port)
    }
}

impl ActiveSap {
    /// Human readable label
    #[must_use]
    pub fn title(&self) -> String {
        format!("SAP {} on port {}", self.vlan, self.port)
    }
}

impl Block for BareSap {
    const KIND: BlockKind = BlockKind::Sap;
    const STAGE: LifecycleStage = LifecycleStage::Bare;

    fn missing_fields(&self, target: LifecycleStage) -> Vec<String> {
        let mut missing = MissingFields::new();
        if target >= LifecycleStage::Provisioning {
            missing.check("port", self.port.is_some());
            missing.check("vlan", self.vlan.is_some());
        }
        if target >= LifecycleStage::Active {
            missing.check("ims_id", self.ims_id.is_some());
        }
        missing.into_fields()
    }
}

impl Block for ProvisioningSap {
    const KIND: BlockKind = BlockKind::Sap;
    const STAGE: LifecycleStage = LifecycleStage::Provisioning;

    fn missing_fields(&self, target: LifecycleStage) -> Vec<String> {
        let mut missing = MissingFields::new();
        if target >= LifecycleStage::Active {
            missing.check("ims_id", self.ims_id.is_some());
        }
        missing.into_fields()
    }
}

impl Block for ActiveSap {
    const KIND: BlockKind = BlockKind::Sap;
    const STAGE: LifecycleStage = LifecycleStage::Active;

    fn missing_fields(&self, _target: LifecycleStage) -> Vec<String> {
        Vec::new()
    }
}

impl Promote<ProvisioningSap> for BareSap {
    fn promote(self) -> Result<ProvisioningSap, FieldMissingError> {
        let missing = self.missing_fields(LifecycleStage::Provisioning);
        let (Some(port), Some(vlan)) = (self.port, self.vlan) else {
            return Err(incomplete::<Self>(LifecycleStage::Provisioning, missing));
        };
        Ok(ProvisioningSap {
            instance_id: self.instance_id,
            port,
            vlan,
            ims_id: self.ims_id,
        })
    }
}

impl Promote<ActiveSap> for ProvisioningSap {
    fn promote(self) -> Result<ActiveSap, FieldMissingError> {
        let missing = self.missing_fields(LifecycleStage::Active);
        let Some(ims_id) = self.ims_id else {
            return Err(incomplete::<Self>(LifecycleStage::Active, missing));
        };
        Ok(ActiveSap {
            instance_id: self.instance_id,
            port: self.port,
            vlan: self.vlan,
            ims_id,
        })
    }
}

impl Promote<ActiveSap> for BareSap {
    fn promote(self) -> Result<ActiveSap, FieldMissingError> {
        promote_through::<Self, ProvisioningSap, ActiveSap>(self)
    }
}

impl Demote<ProvisioningSap> for ActiveSap {
    fn demote(self) -> ProvisioningSap {
        ProvisioningSap {
            instance_id: self.instance_id,
            port: self.port,
            vlan: self.vlan,
            ims_id: Some(self.ims_id),
        }
    }
}

impl Demote<BareSap> for ProvisioningSap {
    fn demote(self) -> BareSap {
        BareSap {
            instance_id: self.instance_id,
            port: Some(self.port),
            vlan: Some(self.vlan),
            ims_id: self.ims_id,
        }
    }
}

impl Demote<BareSap> for ActiveSap {
    fn demote(self) -> BareSap {
        demote_through::<Self, ProvisioningSap, BareSap>(self)
    }
}
