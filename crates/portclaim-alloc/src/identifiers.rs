//! STP identifier uniqueness

use crate::error::AllocationError;
use portclaim_graph::{InstanceData, SubscriptionStore};
use portclaim_lifecycle::{ProductType, SubscriptionId, SubscriptionStatus};
use tracing::debug;

/// `stp_id` must be unique within `topology` among active NSISTP subscriptions
///
/// Comparison ignores case. `editing` is left out so a subscription can keep
/// its own identifier on modify.
pub fn check_stp_unique<S: SubscriptionStore + ?Sized>(
    store: &S,
    topology: &str,
    stp_id: &str,
    editing: Option<SubscriptionId>,
) -> Result<(), AllocationError> {
    let active = store
        .subscriptions_by_product(ProductType::Nsistp)
        .into_iter()
        .filter(|record| record.status == SubscriptionStatus::Active)
        .filter(|record| Some(record.subscription_id) != editing);

    for record in active {
        for instance in store.instances_of(record.subscription_id)? {
            let InstanceData::Stp {
                topology: taken_topology,
                stp_id: taken_id,
                ..
            } = &instance.data
            else {
                continue;
            };
            if taken_topology.eq_ignore_ascii_case(topology) && taken_id.eq_ignore_ascii_case(stp_id) {
                debug!(holder = %record.subscription_id, %topology, %stp_id, "STP identifier taken");
                return Err(AllocationError::DuplicateIdentifier {
                    stp_id: stp_id.to_string(),
                    topology: topology.to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use portclaim_test_utils::Fixture;

    #[test]
    fn test_duplicate_in_same_topology() {
        let fx = Fixture::new();
        let port = fx.tagged_port("et-0/0/1");
        let stp = fx.stp(port, "100", "Ams-Topo", "port-1");

        let err = check_stp_unique(&fx.store, "ams-topo", "PORT-1", None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "STP identifier `PORT-1` already exists for topology `ams-topo`"
        );
        assert!(check_stp_unique(&fx.store, "ams-topo", "port-1", Some(stp)).is_ok());
        assert!(check_stp_unique(&fx.store, "other", "port-1", None).is_ok());
    }

    #[test]
    fn test_only_active_subscriptions_count() {
        let fx = Fixture::new();
        let port = fx.tagged_port("et-0/0/2");
        let stp = fx.stp(port, "100", "topo", "stp-a");
        fx.set_status(stp, SubscriptionStatus::Terminated);
        assert!(check_stp_unique(&fx.store, "topo", "stp-a", None).is_ok());
    }
}
