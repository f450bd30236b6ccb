//! Store errors

use portclaim_lifecycle::{InstanceId, LifecycleError, SubscriptionId};
use thiserror::Error;

/// Errors raised by a [`SubscriptionStore`](crate::SubscriptionStore)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No subscription with this id
    #[error("subscription not found: {0}")]
    UnknownSubscription(SubscriptionId),

    /// No block instance with this id
    #[error("product block instance not found: {0}")]
    UnknownInstance(InstanceId),

    /// Subscription id already taken
    #[error("subscription already exists: {0}")]
    DuplicateSubscription(SubscriptionId),

    /// Instance id already taken
    #[error("product block instance already exists: {0}")]
    DuplicateInstance(InstanceId),

    /// Relation would make an instance depend on itself
    #[error("instance {0} cannot depend on itself")]
    SelfRelation(InstanceId),

    /// Status change refused by the lifecycle
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// VLANs can only be set on SAP instances
    #[error("instance {0} does not carry VLANs")]
    NotAClaim(InstanceId),
}
