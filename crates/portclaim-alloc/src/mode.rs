//! Port mode resolution

use crate::error::AllocationError;
use portclaim_graph::SubscriptionStore;
use portclaim_lifecycle::{PortMode, ProductType, SubscriptionId};
use tracing::{debug, warn};

/// Resolves the operating mode of the port a SAP lands on
pub trait PortModeLookup {
    /// Mode of `port`
    fn mode_of(&self, port: SubscriptionId) -> Result<PortMode, AllocationError>;
}

/// [`PortModeLookup`] backed by a subscription store
///
/// A Port subscription reports the mode recorded on its port block. Any other
/// product used as a port is treated as tagged.
#[derive(Debug)]
pub struct PortModePolicy<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: SubscriptionStore + ?Sized> PortModePolicy<'a, S> {
    /// Policy over `store`
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }
}

impl<S: SubscriptionStore + ?Sized> PortModeLookup for PortModePolicy<'_, S> {
    fn mode_of(&self, port: SubscriptionId) -> Result<PortMode, AllocationError> {
        let record = self.store.subscription(port)?;
        if record.product_type != ProductType::Port {
            debug!(%port, product = %record.product_type, "non-port product, assuming tagged");
            return Ok(PortMode::Tagged);
        }

        let mode = self
            .store
            .instances_of(port)?
            .iter()
            .find_map(portclaim_graph::InstanceRecord::port_mode);
        if let Some(mode) = mode {
            Ok(mode)
        } else {
            warn!(%port, "port subscription has no port block, assuming tagged");
            Ok(PortMode::Tagged)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portclaim_graph::{InstanceData, InstanceRecord, MemoryStore, SubscriptionRecord};
    use portclaim_lifecycle::{InstanceId, SubscriptionStatus};

    fn port(store: &MemoryStore, mode: PortMode) -> SubscriptionId {
        let sub = SubscriptionId::new();
        let mut tx = store.begin();
        tx.insert_subscription(SubscriptionRecord::new(
            sub,
            ProductType::Port,
            SubscriptionStatus::Active,
        ))
        .insert_instance(InstanceRecord::new(
            InstanceId::new(),
            sub,
            InstanceData::Port {
                name: "ge-0/0/1".into(),
                mode,
            },
        ));
        tx.commit().unwrap();
        sub
    }

    #[test]
    fn test_recorded_mode() {
        let store = MemoryStore::new();
        let policy = PortModePolicy::new(&store);
        for mode in [PortMode::Tagged, PortMode::Untagged, PortMode::LinkMember] {
            let sub = port(&store, mode);
            assert_eq!(policy.mode_of(sub).unwrap(), mode);
        }
    }

    #[test]
    fn test_other_products_are_tagged() {
        let store = MemoryStore::new();
        let sub = SubscriptionId::new();
        let mut tx = store.begin();
        tx.insert_subscription(SubscriptionRecord::new(
            sub,
            ProductType::CoreLink,
            SubscriptionStatus::Active,
        ));
        tx.commit().unwrap();
        let policy = PortModePolicy::new(&store);
        assert_eq!(policy.mode_of(sub).unwrap(), PortMode::Tagged);
    }

    #[test]
    fn test_unknown_port() {
        let store = MemoryStore::new();
        let policy = PortModePolicy::new(&store);
        let id = SubscriptionId::new();
        assert_eq!(
            policy.mode_of(id).unwrap_err(),
            AllocationError::UnknownSubscription(id)
        );
    }
}
