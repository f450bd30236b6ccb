//! Records and the read interface of a subscription store

use crate::error::StoreError;
use portclaim_lifecycle::{BlockKind, InstanceId, PortMode, ProductType, SubscriptionId, SubscriptionStatus};
use portclaim_ranges::VlanRangeSet;
use serde::{Deserialize, Serialize};

/// Stored view of one subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    /// Subscription identifier
    pub subscription_id: SubscriptionId,
    /// Product type
    pub product_type: ProductType,
    /// Lifecycle status
    pub status: SubscriptionStatus,
    /// Free text description
    pub description: Option<String>,
    /// Product speed in Mbit/s, for port products
    pub speed: Option<u32>,
}

impl SubscriptionRecord {
    /// Creates a record without description or speed
    #[must_use]
    pub fn new(subscription_id: SubscriptionId, product_type: ProductType, status: SubscriptionStatus) -> Self {
        Self {
            subscription_id,
            product_type,
            status,
            description: None,
            speed: None,
        }
    }

    /// Sets the description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the product speed
    #[inline]
    #[must_use]
    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = Some(speed);
        self
    }
}

/// Kind-specific payload of a stored block instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceData {
    /// Node
    Node {
        /// Node name
        name: String,
    },
    /// Service port and its operating mode
    Port {
        /// Port name
        name: String,
        /// Operating mode
        mode: PortMode,
    },
    /// Core port
    CorePort,
    /// SAP and the VLANs it claims
    Sap {
        /// Claimed VLANs
        vlan: VlanRangeSet,
    },
    /// Virtual circuit
    VirtualCircuit {
        /// Speed in Mbit/s
        speed: u32,
    },
    /// Core link
    CoreLink,
    /// NSI service termination point
    Stp {
        /// Topology the STP belongs to
        topology: String,
        /// STP identifier, unique per topology
        stp_id: String,
        /// Bandwidth in Mbit/s
        bandwidth: Option<u32>,
    },
}

impl InstanceData {
    /// Block kind this payload belongs to
    #[must_use]
    pub const fn kind(&self) -> BlockKind {
        match self {
            Self::Node { .. } => BlockKind::Node,
            Self::Port { .. } => BlockKind::Port,
            Self::CorePort => BlockKind::CorePort,
            Self::Sap { .. } => BlockKind::Sap,
            Self::VirtualCircuit { .. } => BlockKind::VirtualCircuit,
            Self::CoreLink => BlockKind::CoreLink,
            Self::Stp { .. } => BlockKind::Nsistp,
        }
    }
}

/// Stored view of one product block instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// Owning subscription
    pub subscription_id: SubscriptionId,
    /// Kind-specific payload
    pub data: InstanceData,
}

impl InstanceRecord {
    /// Creates a record
    #[must_use]
    pub fn new(instance_id: InstanceId, subscription_id: SubscriptionId, data: InstanceData) -> Self {
        Self {
            instance_id,
            subscription_id,
            data,
        }
    }

    /// Block kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> BlockKind {
        self.data.kind()
    }

    /// VLANs claimed by this instance, for SAPs
    #[must_use]
    pub fn vlan(&self) -> Option<&VlanRangeSet> {
        match &self.data {
            InstanceData::Sap { vlan } => Some(vlan),
            _ => None,
        }
    }

    /// Port mode, for service ports
    #[must_use]
    pub fn port_mode(&self) -> Option<PortMode> {
        match &self.data {
            InstanceData::Port { mode, .. } => Some(*mode),
            _ => None,
        }
    }
}

/// Directed, non-owning dependency: `dependent` depends on `dependency`
///
/// Read the other way round, `dependency` is in use by `dependent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    /// Instance that is relied upon
    pub dependency: InstanceId,
    /// Instance that relies on it
    pub dependent: InstanceId,
}

impl Relation {
    /// `dependent` depends on `dependency`
    #[must_use]
    pub const fn new(dependency: InstanceId, dependent: InstanceId) -> Self {
        Self {
            dependency,
            dependent,
        }
    }
}

/// Read access to subscriptions, their block instances and relations
pub trait SubscriptionStore {
    /// Subscription by id
    fn subscription(&self, id: SubscriptionId) -> Result<SubscriptionRecord, StoreError>;

    /// Every block instance owned by a subscription
    fn instances_of(&self, id: SubscriptionId) -> Result<Vec<InstanceRecord>, StoreError>;

    /// Block instance by id
    fn instance(&self, id: InstanceId) -> Result<InstanceRecord, StoreError>;

    /// Instances that directly depend on `id`
    fn in_use_by(&self, id: InstanceId) -> Result<Vec<InstanceId>, StoreError>;

    /// Every subscription of a product type
    fn subscriptions_by_product(&self, product_type: ProductType) -> Vec<SubscriptionRecord>;
}
