//! Product blocks in their bare, provisioning and active shapes

mod core_link;
mod core_port;
mod node;
mod nsistp;
mod port;
mod sap;
mod virtual_circuit;

pub use core_link::{ActiveCoreLink, BareCoreLink, ProvisioningCoreLink};
pub use core_port::{ActiveCorePort, BareCorePort, ProvisioningCorePort};
pub use node::{ActiveNode, BareNode, ProvisioningNode};
pub use nsistp::{ActiveNsistp, BareNsistp, ProvisioningNsistp, StpDetails};
pub use port::{ActivePort, BarePort, ProvisioningPort};
pub use sap::{ActiveSap, BareSap, ProvisioningSap};
pub use virtual_circuit::{ActiveVirtualCircuit, BareVirtualCircuit, ProvisioningVirtualCircuit};
