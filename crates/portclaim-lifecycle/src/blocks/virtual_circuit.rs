//! Virtual circuit block: owns the SAPs it connects

use super::sap::{ActiveSap, BareSap, ProvisioningSap};
use crate::fields::MissingFields;
use crate::ids::InstanceId;
use crate::product::BlockKind;
use crate::stage::{demote_through, incomplete, promote_through, Block, Demote, LifecycleStage, Promote};
use crate::FieldMissingError;
use serde::{Deserialize, Serialize};

/// Virtual circuit with every field optional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BareVirtualCircuit {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// Service access points
    pub saps: Vec<BareSap>,
    /// Circuit speed in Mbit/s
    pub speed: Option<u32>,
    /// Police traffic to `speed`
    pub speed_policer: Option<bool>,
    /// Inventory system identifier
    pub ims_id: Option<u64>,
    /// Network resource manager identifier
    pub nrm_id: Option<u64>,
}

impl BareVirtualCircuit {
    /// Empty circuit with a fresh instance id
    #[must_use]
    pub fn new() -> Self {
        Self {
            instance_id: InstanceId::new(),
            saps: Vec::new(),
            speed: None,
            speed_policer: None,
            ims_id: None,
            nrm_id: None,
        }
    }
}

impl Default for BareVirtualCircuit {
    fn default() -> Self {
        Self::new()
    }
}

/// Virtual circuit ready to be provisioned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningVirtualCircuit {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// Service access points
    pub saps: Vec<ProvisioningSap>,
    /// Circuit speed in Mbit/s
    pub speed: u32,
    /// Police traffic to `speed`
    pub speed_policer: bool,
    /// Inventory system identifier
    pub ims_id: Option<u64>,
    /// Network resource manager identifier
    pub nrm_id: Option<u64>,
}

/// Virtual circuit in service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveVirtualCircuit {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// Service access points
    pub saps: Vec<ActiveSap>,
    /// Circuit speed in Mbit/s
    pub speed: u32,
    /// Police traffic to `speed`
    pub speed_policer: bool,
    /// Inventory system identifier
    pub ims_id: u64,
    /// Network resource manager identifier
    pub nrm_id: u64,
}

impl ProvisioningVirtualCircuit {
    /// Human readable label
    #[must_use]
    pub fn title(&self) -> String {
        format!("{} Mbit/s circuit over {} SAPs", self.speed, self.saps.len())
    }
}

fn nested_saps<S: Block>(missing: &mut MissingFields, saps: &[S], target: LifecycleStage) {
    for (index, sap) in saps.iter().enumerate() {
        missing.nested(&format!("saps[{index}]"), sap.missing_fields(target));
    }
}

impl Block for BareVirtualCircuit {
    const KIND: BlockKind = BlockKind::VirtualCircuit;
    const STAGE: LifecycleStage = LifecycleStage::Bare;

    fn missing_fields(&self, target: LifecycleStage) -> Vec<String> {
        let mut missing = MissingFields::new();
        nested_saps(&mut missing, &self.saps, target);
        if target >= LifecycleStage::Provisioning {
            missing.check("speed", self.speed.is_some());
            missing.check("speed_policer", self.speed_policer.is_some());
        }
        if target >= LifecycleStage::Active {
            missing.check("ims_id", self.ims_id.is_some());
            missing.check("nrm_id", self.nrm_id.is_some());
        }
        missing.into_fields()
    }
}

impl Block for ProvisioningVirtualCircuit {
    const KIND: BlockKind = BlockKind::VirtualCircuit;
    const STAGE: LifecycleStage = LifecycleStage::Provisioning;

    fn missing_fields(&self, target: LifecycleStage) -> Vec<String> {
        let mut missing = MissingFields::new();
        nested_saps(&mut missing, &self.saps, target);
        if target >= LifecycleStage::Active {
            missing.check("ims_id", self.ims_id.is_some());
            missing.check("nrm_id", self.nrm_id.is_some());
        }
        missing.into_fields()
    }
}

impl Block for ActiveVirtualCircuit {
    const KIND: BlockKind = BlockKind::VirtualCircuit;
    const STAGE: LifecycleStage = LifecycleStage::Active;

    fn missing_fields(&self, _target: LifecycleStage) -> Vec<String> {
        Vec::new()
    }
}

impl Promote<ProvisioningVirtualCircuit> for BareVirtualCircuit {
    fn promote(self) -> Result<ProvisioningVirtualCircuit, FieldMissingError> {
        let missing = self.missing_fields(LifecycleStage::Provisioning);
        let saps: Option<Vec<ProvisioningSap>> = self
            .saps
            .into_iter()
            .map(|sap| Promote::<ProvisioningSap>::promote(sap).ok())
            .collect();
        let (Some(saps), Some(speed), Some(speed_policer)) = (saps, self.speed, self.speed_policer)
        else {
            return Err(incomplete::<Self>(LifecycleStage::Provisioning, missing));
        };
        Ok(ProvisioningVirtualCircuit {
            instance_id: self.instance_id,
            saps,
            speed,
            speed_policer,
            ims_id: self.ims_id,
            nrm_id: self.nrm_id,
        })
    }
}

impl Promote<ActiveVirtualCircuit> for ProvisioningVirtualCircuit {
    fn promote(self) -> Result<ActiveVirtualCircuit, FieldMissingError> {
        let missing = self.missing_fields(LifecycleStage::Active);
        let saps: Option<Vec<ActiveSap>> = self
            .saps
            .into_iter()
            .map(|sap| Promote::<ActiveSap>::promote(sap).ok())
            .collect();
        let (Some(saps), Some(ims_id), Some(nrm_id)) = (saps, self.ims_id, self.nrm_id) else {
            return Err(incomplete::<Self>(LifecycleStage::Active, missing));
        };
        Ok(ActiveVirtualCircuit {
            instance_id: self.instance_id,
            saps,
            speed: self.speed,
            speed_policer: self.speed_policer,
            ims_id,
            nrm_id,
        })
    }
}

impl Promote<ActiveVirtualCircuit> for BareVirtualCircuit {
    fn promote(self) -> Result<ActiveVirtualCircuit, FieldMissingError> {
        promote_through::<Self, ProvisioningVirtualCircuit, ActiveVirtualCircuit>(self)
    }
}

impl Demote<ProvisioningVirtualCircuit> for ActiveVirtualCircuit {
    fn demote(self) -> ProvisioningVirtualCircuit {
        ProvisioningVirtualCircuit {
            instance_id: self.instance_id,
            saps: self.saps.into_iter().map(Demote::<ProvisioningSap>::demote).collect(),
            speed: self.speed,
            speed_policer: self.speed_policer,
            ims_id: Some(self.ims_id),
            nrm_id: Some(self.nrm_id),
        }
    }
}

impl Demote<BareVirtualCircuit> for ProvisioningVirtualCircuit {
    fn demote(self) -> BareVirtualCircuit {
        BareVirtualCircuit {
            instance_id: self.instance_id,
            saps: self.saps.into_iter().map(Demote::<BareSap>::demote).collect(),
            speed: Some(self.speed),
            speed_policer: Some(self.speed_policer),
            ims_id: self.ims_id,
            nrm_id: self.nrm_id,
        }
    }
}

impl Demote<BareVirtualCircuit> for ActiveVirtualCircuit {
    fn demote(self) -> BareVirtualCircuit {
        demote_through::<Self, ProvisioningVirtualCircuit, BareVirtualCircuit>(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::promote;
    use portclaim_ranges::VlanRangeSet;
    use pretty_assertions::assert_eq;

    fn sap(vlan: u16) -> BareSap {
        BareSap {
            port: Some(InstanceId::new()),
            vlan: Some(VlanRangeSet::single(vlan).unwrap()),
            ..BareSap::new()
        }
    }

    #[test]
    fn test_child_fields_are_prefixed() {
        let circuit = BareVirtualCircuit {
            saps: vec![sap(10), BareSap::new()],
            speed: Some(1000),
            ..BareVirtualCircuit::new()
        };
        let err = promote::<ProvisioningVirtualCircuit, _>(circuit).unwrap_err();
        assert_eq!(
            err.fields,
            vec!["saps[1].port", "saps[1].vlan", "speed_policer"]
        );
        assert_eq!(err.block, BlockKind::VirtualCircuit);
    }

    #[test]
    fn test_active_requires_every_sap_active() {
        let circuit = BareVirtualCircuit {
            saps: vec![
                BareSap {
                    ims_id: Some(1),
                    ..sap(10)
                },
                sap(20),
            ],
            speed: Some(1000),
            speed_policer: Some(false),
            ims_id: Some(5),
            nrm_id: Some(6),
            ..BareVirtualCircuit::new()
        };
        let err = promote::<ActiveVirtualCircuit, _>(circuit).unwrap_err();
        assert_eq!(err.fields, vec!["saps[1].ims_id"]);
    }

    #[test]
    fn test_promotes_with_all_children() {
        let circuit = BareVirtualCircuit {
            saps: vec![sap(10), sap(20)],
            speed: Some(1000),
            speed_policer: Some(true),
            ..BareVirtualCircuit::new()
        };
        let promoted: ProvisioningVirtualCircuit = promote(circuit).unwrap();
        assert_eq!(promoted.saps.len(), 2);
        assert_eq!(promoted.saps[1].vlan.to_string(), "20");
        assert_eq!(promoted.title(), "1000 Mbit/s circuit over 2 SAPs");
    }
}
