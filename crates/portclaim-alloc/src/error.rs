//! Allocation errors
//!
//! Every rejection the validator can produce, with a stable [`ErrorKind`] and
//! the form field it belongs to.

use portclaim_graph::StoreError;
use portclaim_lifecycle::{FieldMissingError, PortMode, ProductType, SubscriptionId};
use portclaim_ranges::{RangeValueError, VlanRangeSet};
use serde::Serialize;
use thiserror::Error;

/// Stable classification of an [`AllocationError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum ErrorKind {
    VlanRequired,
    VlanNotAllowed,
    VlanInUse,
    PortInUse,
    VlanNotReserved,
    VlanAlreadyUsedByProduct,
    DuplicateIdentifier,
    RangeValue,
    FieldValue,
    SapCount,
    SingleVlanRequired,
    BandwidthExceeded,
    UnknownSubscription,
    FieldMissing,
    Store,
}

/// Rejection of a candidate allocation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// Tagged port without a VLAN
    #[error("{mode} port must have a VLAN")]
    VlanRequired {
        /// Mode of the port
        mode: PortMode,
    },

    /// VLAN on a port that only accepts untagged traffic
    #[error("{mode} port cannot have a VLAN, got {candidate}")]
    VlanNotAllowed {
        /// Mode of the port
        mode: PortMode,
        /// Rejected candidate
        candidate: VlanRangeSet,
    },

    /// Candidate overlaps VLANs already claimed on a tagged port
    #[error("VLAN(s) {used} already in use")]
    VlanInUse {
        /// Everything already claimed on the port
        used: VlanRangeSet,
        /// Part of the candidate that collides
        overlap: VlanRangeSet,
    },

    /// Untagged or link-member port already taken
    #[error("port already in use")]
    PortInUse,

    /// Candidate reaches outside the NSI reservation on the port
    #[error("VLAN(s) {outside} not reserved on this port (reserved: {reserved})")]
    VlanNotReserved {
        /// Reservation budget on the port
        reserved: VlanRangeSet,
        /// Part of the candidate outside the budget
        outside: VlanRangeSet,
    },

    /// Candidate collides with a sibling consumer of the same reservation
    #[error("VLAN(s) {overlap} already used by another {product} subscription")]
    VlanAlreadyUsedByProduct {
        /// Product type of the sibling consumers
        product: ProductType,
        /// Part of the candidate that collides
        overlap: VlanRangeSet,
    },

    /// STP identifier already taken within its topology
    #[error("STP identifier `{stp_id}` already exists for topology `{topology}`")]
    DuplicateIdentifier {
        /// Requested identifier
        stp_id: String,
        /// Topology it was requested in
        topology: String,
    },

    /// Candidate text is not a valid VLAN set
    #[error(transparent)]
    RangeValue(#[from] RangeValueError),

    /// Free-text field does not satisfy its format
    #[error("{field}: {message}")]
    FieldValue {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// Wrong number of SAPs for the product
    #[error("{product} must have between {min} and {max} SAPs, got {count}")]
    SapCount {
        /// Product being validated
        product: ProductType,
        /// Lower bound
        min: usize,
        /// Upper bound
        max: usize,
        /// Actual count
        count: usize,
    },

    /// Product only supports one VLAN per SAP
    #[error("only one VLAN may be selected per port, got {vlan}")]
    SingleVlanRequired {
        /// Rejected VLAN set
        vlan: VlanRangeSet,
    },

    /// Requested bandwidth above the port speed
    #[error("the port speed {port_speed} is lower than the desired speed {bandwidth}")]
    BandwidthExceeded {
        /// Requested bandwidth in Mbit/s
        bandwidth: u32,
        /// Port speed in Mbit/s
        port_speed: u32,
    },

    /// Port or editing subscription does not exist
    #[error("subscription not found: {0}")]
    UnknownSubscription(SubscriptionId),

    /// Workflow tried to promote an incomplete block
    #[error(transparent)]
    FieldMissing(#[from] FieldMissingError),

    /// Store failure other than a missing subscription
    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for AllocationError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::UnknownSubscription(id) => Self::UnknownSubscription(id),
            other => Self::Store(other),
        }
    }
}

impl AllocationError {
    /// Stable classification
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::VlanRequired { .. } => ErrorKind::VlanRequired,
            Self::VlanNotAllowed { .. } => ErrorKind::VlanNotAllowed,
            Self::VlanInUse { .. } => ErrorKind::VlanInUse,
            Self::PortInUse => ErrorKind::PortInUse,
            Self::VlanNotReserved { .. } => ErrorKind::VlanNotReserved,
            Self::VlanAlreadyUsedByProduct { .. } => ErrorKind::VlanAlreadyUsedByProduct,
            Self::DuplicateIdentifier { .. } => ErrorKind::DuplicateIdentifier,
            Self::RangeValue(_) => ErrorKind::RangeValue,
            Self::FieldValue { .. } => ErrorKind::FieldValue,
            Self::SapCount { .. } => ErrorKind::SapCount,
            Self::SingleVlanRequired { .. } => ErrorKind::SingleVlanRequired,
            Self::BandwidthExceeded { .. } => ErrorKind::BandwidthExceeded,
            Self::UnknownSubscription(_) => ErrorKind::UnknownSubscription,
            Self::FieldMissing(_) => ErrorKind::FieldMissing,
            Self::Store(_) => ErrorKind::Store,
        }
    }

    /// Form field the error should be shown on
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::VlanRequired { .. }
            | Self::VlanNotAllowed { .. }
            | Self::VlanInUse { .. }
            | Self::VlanNotReserved { .. }
            | Self::VlanAlreadyUsedByProduct { .. }
            | Self::RangeValue(_)
            | Self::SingleVlanRequired { .. } => Some("vlan"),
            Self::PortInUse | Self::BandwidthExceeded { .. } | Self::UnknownSubscription(_) => {
                Some("port")
            }
            Self::DuplicateIdentifier { .. } => Some("stp_id"),
            Self::FieldValue { field, .. } => Some(*field),
            Self::SapCount { .. } => Some("saps"),
            Self::FieldMissing(_) | Self::Store(_) => None,
        }
    }

    /// Whether the user can fix this by changing the input
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::FieldMissing(_) | Self::Store(_))
    }

    /// Whether this indicates a workflow or storage defect
    #[must_use]
    pub const fn should_escalate(&self) -> bool {
        !self.is_recoverable()
    }
}

/// Invalid allocator configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML could not be parsed into the configuration
    #[error("failed to parse allocator configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Parsed values are inconsistent
    #[error("invalid allocator configuration: {0}")]
    Invalid(String),
}
