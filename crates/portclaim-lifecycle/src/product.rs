//! Product and block classification tags

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Product type of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProductType {
    /// Network node
    Node,
    /// Physical service port
    Port,
    /// Backbone link between two nodes
    CoreLink,
    /// Multipoint layer-2 VPN
    L2vpn,
    /// NSI service termination point (VLAN reservation)
    Nsistp,
    /// NSI point-to-point service consuming an NSISTP reservation
    Nsip2p,
}

impl ProductType {
    /// Stable product type name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "Node",
            Self::Port => "Port",
            Self::CoreLink => "CoreLink",
            Self::L2vpn => "L2vpn",
            Self::Nsistp => "Nsistp",
            Self::Nsip2p => "Nsip2p",
        }
    }
}

impl Display for ProductType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind tag of a product block instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Node block
    Node,
    /// Service port block
    Port,
    /// Core (backbone) port block
    CorePort,
    /// Service access point: a port paired with VLANs
    Sap,
    /// Circuit joining two or more SAPs
    VirtualCircuit,
    /// Core link joining two core ports
    CoreLink,
    /// NSI service termination point
    Nsistp,
}

impl Display for BlockKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Node => "Node",
            Self::Port => "Port",
            Self::CorePort => "CorePort",
            Self::Sap => "SAP",
            Self::VirtualCircuit => "VirtualCircuit",
            Self::CoreLink => "CoreLink",
            Self::Nsistp => "Nsistp",
        };
        f.write_str(name)
    }
}

/// Operating mode of a service port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortMode {
    /// 802.1Q tagged: every SAP needs a VLAN
    #[serde(rename = "tagged")]
    Tagged,
    /// Untagged: the whole port belongs to one SAP
    #[serde(rename = "untagged")]
    Untagged,
    /// Member of a link aggregate: no VLANs of its own
    #[serde(rename = "link member")]
    LinkMember,
}

impl Display for PortMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tagged => "tagged",
            Self::Untagged => "untagged",
            Self::LinkMember => "link member",
        };
        f.write_str(name)
    }
}

/// Operational status of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum NodeStatus {
    Offline,
    Active,
    Planned,
    Staged,
    Failed,
    Inventory,
    Decommissioning,
}
