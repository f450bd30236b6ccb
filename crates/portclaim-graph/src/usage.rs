//! Reverse-dependency lookup over a subscription store

use crate::error::StoreError;
use crate::store::SubscriptionStore;
use portclaim_lifecycle::{InstanceId, ProductType, SubscriptionId, SubscriptionStatus};
use portclaim_ranges::VlanRangeSet;
use std::collections::{BTreeSet, HashSet, VecDeque};
use tracing::debug;

/// VLANs held by one SAP instance that depends on an anchor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    /// Subscription holding the claim
    pub subscription_id: SubscriptionId,
    /// SAP instance carrying the VLANs
    pub instance_id: InstanceId,
    /// Product type of the holder
    pub product_type: ProductType,
    /// Status of the holder
    pub status: SubscriptionStatus,
    /// Claimed VLANs
    pub vlan: VlanRangeSet,
}

/// Finds what depends on a subscription and which VLANs those dependents hold
///
/// Read-only. An empty `product_types` slice matches every product type.
#[derive(Debug)]
pub struct UsageLookup<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: SubscriptionStore + ?Sized> UsageLookup<'a, S> {
    /// Lookup over `store`
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Every distinct subscription that transitively depends on any instance of `anchor`
    ///
    /// `anchor` itself is never part of the result.
    pub fn dependents_of(
        &self,
        anchor: SubscriptionId,
        product_type: Option<ProductType>,
        statuses: &[SubscriptionStatus],
    ) -> Result<BTreeSet<SubscriptionId>, StoreError> {
        let mut queue: VecDeque<InstanceId> = self
            .store
            .instances_of(anchor)?
            .into_iter()
            .map(|record| record.instance_id)
            .collect();
        let mut seen: HashSet<InstanceId> = queue.iter().copied().collect();
        let mut reached = BTreeSet::new();

        while let Some(current) = queue.pop_front() {
            for dependent in self.store.in_use_by(current)? {
                if seen.insert(dependent) {
                    reached.insert(self.store.instance(dependent)?.subscription_id);
                    queue.push_back(dependent);
                }
            }
        }
        reached.remove(&anchor);

        let mut found = BTreeSet::new();
        for id in reached {
            let record = self.store.subscription(id)?;
            if product_type.is_some_and(|wanted| wanted != record.product_type) {
                continue;
            }
            if statuses.contains(&record.status) {
                found.insert(id);
            }
        }
        debug!(%anchor, dependents = found.len(), "dependents resolved");
        Ok(found)
    }

    /// SAP claims that directly depend on an instance of `anchor`
    pub fn claims_on(
        &self,
        anchor: SubscriptionId,
        product_types: &[ProductType],
        statuses: &[SubscriptionStatus],
    ) -> Result<Vec<Claim>, StoreError> {
        let mut claims = Vec::new();
        for owned in self.store.instances_of(anchor)? {
            for dependent in self.store.in_use_by(owned.instance_id)? {
                let instance = self.store.instance(dependent)?;
                let Some(vlan) = instance.vlan() else {
                    continue;
                };
                let holder = self.store.subscription(instance.subscription_id)?;
                let product_matches =
                    product_types.is_empty() || product_types.contains(&holder.product_type);
                if product_matches && statuses.contains(&holder.status) {
                    claims.push(Claim {
                        subscription_id: holder.subscription_id,
                        instance_id: instance.instance_id,
                        product_type: holder.product_type,
                        status: holder.status,
                        vlan: vlan.clone(),
                    });
                }
            }
        }
        claims.sort_by_key(|claim| (claim.subscription_id, claim.instance_id));
        debug!(%anchor, claims = claims.len(), "claims resolved");
        Ok(claims)
    }

    /// Union of the VLANs of [`claims_on`](Self::claims_on)
    pub fn used_vlans(
        &self,
        anchor: SubscriptionId,
        product_types: &[ProductType],
        statuses: &[SubscriptionStatus],
    ) -> Result<VlanRangeSet, StoreError> {
        let claims = self.claims_on(anchor, product_types, statuses)?;
        Ok(claims.iter().map(|claim| &claim.vlan).collect())
    }

    /// VLANs of every active SAP on a port
    pub fn active_vlans(&self, port: SubscriptionId) -> Result<VlanRangeSet, StoreError> {
        self.used_vlans(port, &[], &[SubscriptionStatus::Active])
    }
}
