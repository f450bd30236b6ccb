//! NSI reservation budgets

use crate::config::AllocatorConfig;
use crate::error::AllocationError;
use portclaim_graph::{SubscriptionStore, UsageLookup};
use portclaim_lifecycle::{ProductType, SubscriptionId};
use portclaim_ranges::VlanRangeSet;
use tracing::debug;

/// Computes which VLANs a reservation product holds on a port
///
/// The physical tier keeps SAPs on one wire disjoint. On top of it a
/// reservation product (NSISTP) claims a budget that consumer products
/// (NSIP2P) must stay inside.
#[derive(Debug)]
pub struct ReservationPolicy<'a, S: ?Sized> {
    lookup: UsageLookup<'a, S>,
    config: &'a AllocatorConfig,
}

impl<'a, S: SubscriptionStore + ?Sized> ReservationPolicy<'a, S> {
    /// Policy over `store`
    #[must_use]
    pub fn new(store: &'a S, config: &'a AllocatorConfig) -> Self {
        Self {
            lookup: UsageLookup::new(store),
            config,
        }
    }

    /// Union of the claims of every `product` subscription on `port` in a reservation status
    pub fn reserved_for(
        &self,
        port: SubscriptionId,
        product: ProductType,
    ) -> Result<VlanRangeSet, AllocationError> {
        let reserved =
            self.lookup
                .used_vlans(port, &[product], &self.config.reservation_statuses)?;
        debug!(%port, %product, %reserved, "reservation resolved");
        Ok(reserved)
    }

    /// VLANs used by `consumer` subscriptions on `port`, leaving out `editing`
    pub fn consumed_on(
        &self,
        port: SubscriptionId,
        consumer: ProductType,
        editing: Option<SubscriptionId>,
    ) -> Result<VlanRangeSet, AllocationError> {
        let claims = self
            .lookup
            .claims_on(port, &[consumer], &self.config.claim_statuses)?;
        Ok(claims
            .iter()
            .filter(|claim| Some(claim.subscription_id) != editing)
            .map(|claim| &claim.vlan)
            .collect())
    }

    /// Part of the `reservation` budget on `port` that no `consumer` uses yet
    pub fn available_for(
        &self,
        port: SubscriptionId,
        reservation: ProductType,
        consumer: ProductType,
    ) -> Result<VlanRangeSet, AllocationError> {
        let reserved = self.reserved_for(port, reservation)?;
        let consumed = self.consumed_on(port, consumer, None)?;
        Ok(reserved - consumed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portclaim_test_utils::Fixture;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_budget_and_availability() {
        let fx = Fixture::new();
        let port = fx.tagged_port("et-0/0/3");
        fx.reserve(port, "200-210");
        fx.consume(port, "205");
        let config = AllocatorConfig::default();
        let policy = ReservationPolicy::new(&fx.store, &config);

        assert_eq!(
            policy.reserved_for(port, ProductType::Nsistp).unwrap().to_string(),
            "200-210"
        );
        assert_eq!(
            policy
                .available_for(port, ProductType::Nsistp, ProductType::Nsip2p)
                .unwrap()
                .to_string(),
            "200-204,206-210"
        );
    }

    #[test]
    fn test_migrating_reservation_is_not_a_budget() {
        let fx = Fixture::new();
        let port = fx.tagged_port("et-0/0/4");
        let stp = fx.reserve(port, "300");
        fx.set_status(stp, portclaim_lifecycle::SubscriptionStatus::Migrating);
        let config = AllocatorConfig::default();
        let policy = ReservationPolicy::new(&fx.store, &config);
        assert!(policy.reserved_for(port, ProductType::Nsistp).unwrap().is_empty());
    }

    #[test]
    fn test_consumed_leaves_out_editing() {
        let fx = Fixture::new();
        let port = fx.tagged_port("et-0/0/5");
        fx.reserve(port, "100-110");
        let first = fx.consume(port, "101");
        fx.consume(port, "102");
        let config = AllocatorConfig::default();
        let policy = ReservationPolicy::new(&fx.store, &config);
        assert_eq!(
            policy
                .consumed_on(port, ProductType::Nsip2p, Some(first))
                .unwrap()
                .to_string(),
            "102"
        );
    }
}
