//! Shape checks for circuit submissions

use crate::error::AllocationError;
use crate::mode::{PortModeLookup, PortModePolicy};
use crate::nsi::MAX_BANDWIDTH;
use crate::validator::check_usage;
use portclaim_graph::SubscriptionStore;
use portclaim_lifecycle::{ProductType, SubscriptionId};
use portclaim_ranges::VlanRangeSet;
use std::collections::HashMap;
use tracing::debug;

/// Fewest SAPs a virtual circuit can have
pub const MIN_SAPS: usize = 2;
/// Most SAPs a virtual circuit can have
pub const MAX_SAPS: usize = 8;

/// One SAP of a submission: the port it lands on and the VLANs it asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SapSelection {
    /// Port subscription
    pub port: SubscriptionId,
    /// Requested VLANs
    pub vlan: VlanRangeSet,
}

impl SapSelection {
    /// Selection of `vlan` on `port`
    #[must_use]
    pub fn new(port: SubscriptionId, vlan: VlanRangeSet) -> Self {
        Self { port, vlan }
    }
}

const fn sap_bounds(product: ProductType) -> (usize, usize) {
    match product {
        ProductType::Nsip2p => (2, 2),
        _ => (MIN_SAPS, MAX_SAPS),
    }
}

/// Number of SAPs allowed for `product`
pub fn check_sap_count(product: ProductType, count: usize) -> Result<(), AllocationError> {
    let (min, max) = sap_bounds(product);
    if (min..=max).contains(&count) {
        Ok(())
    } else {
        Err(AllocationError::SapCount {
            product,
            min,
            max,
            count,
        })
    }
}

/// Each SAP of the product carries exactly one VLAN
pub fn check_single_vlans(saps: &[SapSelection]) -> Result<(), AllocationError> {
    match saps.iter().find(|sap| !sap.vlan.is_single_vlan()) {
        Some(sap) => Err(AllocationError::SingleVlanRequired {
            vlan: sap.vlan.clone(),
        }),
        None => Ok(()),
    }
}

/// SAPs of one submission that share a port must not share a VLAN
///
/// A clash is reported the way the port mode reports usage: overlapping VLANs
/// on a tagged port, the whole port on an untagged or link-member one.
pub fn check_distinct_saps<L: PortModeLookup + ?Sized>(
    modes: &L,
    saps: &[SapSelection],
) -> Result<(), AllocationError> {
    let mut seen: HashMap<SubscriptionId, VlanRangeSet> = HashMap::new();
    for sap in saps {
        let used = seen.entry(sap.port).or_default();
        if sap.vlan.overlaps(used) {
            check_usage(&sap.vlan, used, modes.mode_of(sap.port)?)?;
        }
        *used |= &sap.vlan;
    }
    Ok(())
}

/// Requested bandwidth may not exceed the speed of the port
///
/// A port without a recorded speed takes [`MAX_BANDWIDTH`].
pub fn check_bandwidth<S: SubscriptionStore + ?Sized>(
    store: &S,
    port: SubscriptionId,
    bandwidth: u32,
) -> Result<(), AllocationError> {
    let port_speed = store.subscription(port)?.speed.unwrap_or(MAX_BANDWIDTH);
    debug!(%port, port_speed, bandwidth, "checking bandwidth");
    if bandwidth > port_speed {
        Err(AllocationError::BandwidthExceeded {
            bandwidth,
            port_speed,
        })
    } else {
        Ok(())
    }
}

/// Shape rules of a circuit submission for `product`
///
/// SAP count, single VLANs for NSIP2P, per-port disjointness and bandwidth
/// against every port. Usage on the ports is checked separately by the
/// allocation validator.
pub fn check_circuit<S: SubscriptionStore + ?Sized>(
    store: &S,
    product: ProductType,
    saps: &[SapSelection],
    bandwidth: Option<u32>,
) -> Result<(), AllocationError> {
    check_sap_count(product, saps.len())?;
    if product == ProductType::Nsip2p {
        check_single_vlans(saps)?;
    }
    check_distinct_saps(&PortModePolicy::new(store), saps)?;
    if let Some(bandwidth) = bandwidth {
        for sap in saps {
            check_bandwidth(store, sap.port, bandwidth)?;
        }
    }
    Ok(())
}
