//! Node block

use crate::fields::MissingFields;
use crate::ids::InstanceId;
use crate::product::{BlockKind, NodeStatus};
use crate::stage::{demote_through, incomplete, promote_through, Block, Demote, LifecycleStage, Promote};
use crate::FieldMissingError;
use serde::{Deserialize, Serialize};

/// Node with every field optional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BareNode {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// Node role
    pub role_id: Option<u32>,
    /// Hardware type
    pub type_id: Option<u32>,
    /// Site the node stands at
    pub site_id: Option<u32>,
    /// Operational status
    pub node_status: Option<NodeStatus>,
    /// Host name
    pub node_name: Option<String>,
    /// Free text description
    pub node_description: Option<String>,
    /// Inventory system identifier
    pub ims_id: Option<u64>,
    /// Network resource manager identifier
    pub nrm_id: Option<u64>,
    /// IPAM identifier of the IPv4 address
    pub ipv4_ipam_id: Option<u64>,
    /// IPAM identifier of the IPv6 address
    pub ipv6_ipam_id: Option<u64>,
}

impl BareNode {
    /// Empty node with a fresh instance id
    #[must_use]
    pub fn new() -> Self {
        Self {
            instance_id: InstanceId::new(),
            role_id: None,
            type_id: None,
            site_id: None,
            node_status: None,
            node_name: None,
            node_description: None,
            ims_id: None,
            nrm_id: None,
            ipv4_ipam_id: None,
            ipv6_ipam_id: None,
        }
    }
}

impl Default for BareNode {
    fn default() -> Self {
        Self::new()
    }
}

/// Node ready to be provisioned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningNode {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// Node role
    pub role_id: u32,
    /// Hardware type
    pub type_id: u32,
    /// Site the node stands at
    pub site_id: u32,
    /// Operational status
    pub node_status: NodeStatus,
    /// Host name
    pub node_name: String,
    /// Free text description
    pub node_description: Option<String>,
    /// Inventory system identifier
    pub ims_id: Option<u64>,
    /// Network resource manager identifier
    pub nrm_id: Option<u64>,
    /// IPAM identifier of the IPv4 address
    pub ipv4_ipam_id: Option<u64>,
    /// IPAM identifier of the IPv6 address
    pub ipv6_ipam_id: Option<u64>,
}

/// Node in service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveNode {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// Node role
    pub role_id: u32,
    /// Hardware type
    pub type_id: u32,
    /// Site the node stands at
    pub site_id: u32,
    /// Operational status
    pub node_status: NodeStatus,
    /// Host name
    pub node_name: String,
    /// Free text description
    pub node_description: Option<String>,
    /// Inventory system identifier
    pub ims_id: u64,
    /// Network resource manager identifier
    pub nrm_id: u64,
    /// IPAM identifier of the IPv4 address
    pub ipv4_ipam_id: u64,
    /// IPAM identifier of the IPv6 address
    pub ipv6_ipam_id: u64,
}

impl Block for BareNode {
    const KIND: BlockKind = BlockKind::Node;
    const STAGE: LifecycleStage = LifecycleStage::Bare;

    fn missing_fields(&self, target: LifecycleStage) -> Vec<String> {
        let mut missing = MissingFields::new();
        if target >= LifecycleStage::Provisioning {
            missing.check("role_id", self.role_id.is_some());
            missing.check("type_id", self.type_id.is_some());
            missing.check("site_id", self.site_id.is_some());
            missing.check("node_status", self.node_status.is_some());
            missing.check("node_name", self.node_name.is_some());
        }
        if target >= LifecycleStage::Active {
            missing.check("ims_id", self.ims_id.is_some());
            missing.check("nrm_id", self.nrm_id.is_some());
            missing.check("ipv4_ipam_id", self.ipv4_ipam_id.is_some());
            missing.check("ipv6_ipam_id", self.ipv6_ipam_id.is_some());
        }
        missing.into_fields()
    }
}

impl Block for ProvisioningNode {
    const KIND: BlockKind = BlockKind::Node;
    const STAGE: LifecycleStage = LifecycleStage::Provisioning;

    fn missing_fields(&self, target: LifecycleStage) -> Vec<String> {
        let mut missing = MissingFields::new();
        if target >= LifecycleStage::Active {
            missing.check("ims_id", self.ims_id.is_some());
            missing.check("nrm_id", self.nrm_id.is_some());
            missing.check("ipv4_ipam_id", self.ipv4_ipam_id.is_some());
            missing.check("ipv6_ipam_id", self.ipv6_ipam_id.is_some());
        }
        missing.into_fields()
    }
}

impl Block for ActiveNode {
    const KIND: BlockKind = BlockKind::Node;
    const STAGE: LifecycleStage = LifecycleStage::Active;

    fn missing_fields(&self, _target: LifecycleStage) -> Vec<String> {
        Vec::new()
    }
}

impl Promote<ProvisioningNode> for BareNode {
    fn promote(self) -> Result<ProvisioningNode, FieldMissingError> {
        let missing = self.missing_fields(LifecycleStage::Provisioning);
        let (Some(role_id), Some(type_id), Some(site_id), Some(node_status), Some(node_name)) = (
            self.role_id,
            self.type_id,
            self.site_id,
            self.node_status,
            self.node_name,
        ) else {
            return Err(incomplete::<Self>(LifecycleStage::Provisioning, missing));
        };
        Ok(ProvisioningNode {
            instance_id: self.instance_id,
            role_id,
            type_id,
            site_id,
            node_status,
            node_name,
            node_description: self.node_description,
            ims_id: self.ims_id,
            nrm_id: self.nrm_id,
            ipv4_ipam_id: self.ipv4_ipam_id,
            ipv6_ipam_id: self.ipv6_ipam_id,
        })
    }
}

impl Promote<ActiveNode> for ProvisioningNode {
    fn promote(self) -> Result<ActiveNode, FieldMissingError> {
        let missing = self.missing_fields(LifecycleStage::Active);
        let (Some(ims_id), Some(nrm_id), Some(ipv4_ipam_id), Some(ipv6_ipam_id)) =
            (self.ims_id, self.nrm_id, self.ipv4_ipam_id, self.ipv6_ipam_id)
        else {
            return Err(incomplete::<Self>(LifecycleStage::Active, missing));
        };
        Ok(ActiveNode {
            instance_id: self.instance_id,
            role_id: self.role_id,
            type_id: self.type_id,
            site_id: self.site_id,
            node_status: self.node_status,
            node_name: self.node_name,
            node_description: self.node_description,
            ims_id,
            nrm_id,
            ipv4_ipam_id,
            ipv6_ipam_id,
        })
    }
}

impl Promote<ActiveNode> for BareNode {
    fn promote(self) -> Result<ActiveNode, FieldMissingError> {
        promote_through::<Self, ProvisioningNode, ActiveNode>(self)
    }
}

impl Demote<ProvisioningNode> for ActiveNode {
    fn demote(self) -> ProvisioningNode {
        ProvisioningNode {
            instance_id: self.instance_id,
            role_id: self.role_id,
            type_id: self.type_id,
            site_id: self.site_id,
            node_status: self.node_status,
            node_name: self.node_name,
            node_description: self.node_description,
            ims_id: Some(self.ims_id),
            nrm_id: Some(self.nrm_id),
            ipv4_ipam_id: Some(self.ipv4_ipam_id),
            ipv6_ipam_id: Some(self.ipv6_ipam_id),
        }
    }
}

impl Demote<BareNode> for ProvisioningNode {
    fn demote(self) -> BareNode {
        BareNode {
            instance_id: self.instance_id,
            role_id: Some(self.role_id),
            type_id: Some(self.type_id),
            site_id: Some(self.site_id),
            node_status: Some(self.node_status),
            node_name: Some(self.node_name),
            node_description: self.node_description,
            ims_id: self.ims_id,
            nrm_id: self.nrm_id,
            ipv4_ipam_id: self.ipv4_ipam_id,
            ipv6_ipam_id: self.ipv6_ipam_id,
        }
    }
}

impl Demote<BareNode> for ActiveNode {
    fn demote(self) -> BareNode {
        demote_through::<Self, ProvisioningNode, BareNode>(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::promote;
    use pretty_assertions::assert_eq;

    fn provisioned() -> BareNode {
        BareNode {
            role_id: Some(1),
            type_id: Some(2),
            site_id: Some(3),
            node_status: Some(NodeStatus::Planned),
            node_name: Some("asd001a".into()),
            ..BareNode::new()
        }
    }

    #[test]
    fn test_empty_node_lists_every_provisioning_field() {
        let err = promote::<ProvisioningNode, _>(BareNode::new()).unwrap_err();
        assert_eq!(
            err.fields,
            vec!["role_id", "type_id", "site_id", "node_status", "node_name"]
        );
        assert_eq!(err.block, BlockKind::Node);
    }

    #[test]
    fn test_description_is_optional() {
        let node: ProvisioningNode = provisioned().promote().unwrap();
        assert_eq!(node.node_description, None);
    }

    #[test]
    fn test_bare_to_active_lists_both_tiers() {
        let bare = BareNode {
            node_name: None,
            ..provisioned()
        };
        let err = promote::<ActiveNode, _>(bare).unwrap_err();
        assert_eq!(
            err.fields,
            vec!["node_name", "ims_id", "nrm_id", "ipv4_ipam_id", "ipv6_ipam_id"]
        );
        assert_eq!(err.target, LifecycleStage::Active);
    }
}
