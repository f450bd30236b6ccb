//! NSI service termination point block: owns the SAP that carries the reservation

use super::sap::{ActiveSap, BareSap, ProvisioningSap};
use crate::fields::MissingFields;
use crate::ids::InstanceId;
use crate::product::BlockKind;
use crate::stage::{demote_through, incomplete, promote_through, Block, Demote, LifecycleStage, Promote};
use crate::FieldMissingError;
use serde::{Deserialize, Serialize};

/// Descriptive fields shared by every NSISTP stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StpDetails {
    /// Free text description of the STP
    pub stp_description: Option<String>,
    /// Inbound alias NURN
    pub is_alias_in: Option<String>,
    /// Outbound alias NURN
    pub is_alias_out: Option<String>,
    /// Published in the NSI topology
    pub expose_in_topology: Option<bool>,
    /// Bandwidth in Mbit/s
    pub bandwidth: Option<u32>,
}

/// NSISTP with every field optional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BareNsistp {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// SAP carrying the reserved VLANs
    pub sap: BareSap,
    /// Topology the STP belongs to
    pub topology: Option<String>,
    /// STP identifier, unique within its topology
    pub stp_id: Option<String>,
    /// Optional STP attributes
    pub details: StpDetails,
}

impl BareNsistp {
    /// Empty NSISTP with a fresh instance id
    #[must_use]
    pub fn new() -> Self {
        Self {
            instance_id: InstanceId::new(),
            sap: BareSap::new(),
            topology: None,
            stp_id: None,
            details: StpDetails::default(),
        }
    }
}

impl Default for BareNsistp {
    fn default() -> Self {
        Self::new()
    }
}

/// NSISTP ready to be provisioned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningNsistp {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// SAP carrying the reserved VLANs
    pub sap: ProvisioningSap,
    /// Topology the STP belongs to
    pub topology: String,
    /// STP identifier, unique within its topology
    pub stp_id: String,
    /// Optional STP attributes
    pub details: StpDetails,
}

/// NSISTP in service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveNsistp {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// SAP carrying the reserved VLANs
    pub sap: ActiveSap,
    /// Topology the STP belongs to
    pub topology: String,
    /// STP identifier, unique within its topology
    pub stp_id: String,
    /// Optional STP attributes
    pub details: StpDetails,
}

impl ProvisioningNsistp {
    /// Human readable label
    #[must_use]
    pub fn title(&self) -> String {
        format!("NSISTP {} on {}", self.stp_id, self.sap.title())
    }
}

impl ActiveNsistp {
    /// Human readable label
    #[must_use]
    pub fn title(&self) -> String {
        format!("NSISTP {} on {}", self.stp_id, self.sap.title())
    }
}

impl Block for BareNsistp {
    const KIND: BlockKind = BlockKind::Nsistp;
    const STAGE: LifecycleStage = LifecycleStage::Bare;

    fn missing_fields(&self, target: LifecycleStage) -> Vec<String> {
        let mut missing = MissingFields::new();
        missing.nested("sap", self.sap.missing_fields(target));
        if target >= LifecycleStage::Provisioning {
            missing.check("topology", self.topology.is_some());
            missing.check("stp_id", self.stp_id.is_some());
        }
        missing.into_fields()
    }
}

impl Block for ProvisioningNsistp {
    const KIND: BlockKind = BlockKind::Nsistp;
    const STAGE: LifecycleStage = LifecycleStage::Provisioning;

    fn missing_fields(&self, target: LifecycleStage) -> Vec<String> {
        let mut missing = MissingFields::new();
        missing.nested("sap", self.sap.missing_fields(target));
        missing.into_fields()
    }
}

impl Block for ActiveNsistp {
    const KIND: BlockKind = BlockKind::Nsistp;
    const STAGE: LifecycleStage = LifecycleStage::Active;

    fn missing_fields(&self, _target: LifecycleStage) -> Vec<String> {
        Vec::new()
    }
}

impl Promote<ProvisioningNsistp> for BareNsistp {
    fn promote(self) -> Result<ProvisioningNsistp, FieldMissingError> {
        let missing = self.missing_fields(LifecycleStage::Provisioning);
        let (Ok(sap), Some(topology), Some(stp_id)) = (
            Promote::<ProvisioningSap>::promote(self.sap),
            self.topology,
            self.stp_id,
        ) else {
            return Err(incomplete::<Self>(LifecycleStage::Provisioning, missing));
        };
        Ok(ProvisioningNsistp {
            instance_id: self.instance_id,
            sap,
            topology,
            stp_id,
            details: self.details,
        })
    }
}

impl Promote<ActiveNsistp> for ProvisioningNsistp {
    fn promote(self) -> Result<ActiveNsistp, FieldMissingError> {
        let missing = self.missing_fields(LifecycleStage::Active);
        let Ok(sap) = Promote::<ActiveSap>::promote(self.sap) else {
            return Err(incomplete::<Self>(LifecycleStage::Active, missing));
        };
        Ok(ActiveNsistp {
            instance_id: self.instance_id,
            sap,
            topology: self.topology,
            stp_id: self.stp_id,
            details: self.details,
        })
    }
}

impl Promote<ActiveNsistp> for BareNsistp {
    fn promote(self) -> Result<ActiveNsistp, FieldMissingError> {
        promote_through::<Self, ProvisioningNsistp, ActiveNsistp>(self)
    }
}

impl Demote<ProvisioningNsistp> for ActiveNsistp {
    fn demote(self) -> ProvisioningNsistp {
        ProvisioningNsistp {
            instance_id: self.instance_id,
            sap: self.sap.demote(),
            topology: self.topology,
            stp_id: self.stp_id,
            details: self.details,
        }
    }
}

impl Demote<BareNsistp> for ProvisioningNsistp {
    fn demote(self) -> BareNsistp {
        BareNsistp {
            instance_id: self.instance_id,
            sap: self.sap.demote(),
            topology: Some(self.topology),
            stp_id: Some(self.stp_id),
            details: self.details,
        }
    }
}

impl Demote<BareNsistp> for ActiveNsistp {
    fn demote(self) -> BareNsistp {
        demote_through::<Self, ProvisioningNsistp, BareNsistp>(self)
    }
}
