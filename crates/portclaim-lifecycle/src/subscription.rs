//! Subscription envelope around a root product block

use crate::error::LifecycleError;
use crate::ids::SubscriptionId;
use crate::product::ProductType;
use crate::stage::{Block, Demote, Promote};
use crate::status::{validate_transition, SubscriptionStatus};
use serde::{Deserialize, Serialize};

/// One provisioned service and its root block
///
/// The status always agrees with the stage of `root`: a subscription carrying
/// provisioning blocks is `provisioning` (or `terminated`), one carrying active
/// blocks is `active`, `migrating` or `terminated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription<B> {
    /// Subscription identifier
    pub subscription_id: SubscriptionId,
    /// Product this subscription instantiates
    pub product_type: ProductType,
    /// Free text description
    pub description: Option<String>,
    status: SubscriptionStatus,
    /// Root product block
    pub root: B,
}

impl<B: Block> Subscription<B> {
    /// Wraps `root` in a fresh subscription whose status matches its stage
    #[must_use]
    pub fn new(product_type: ProductType, root: B) -> Self {
        Self {
            subscription_id: SubscriptionId::new(),
            product_type,
            description: None,
            status: B::STAGE.status(),
            root,
        }
    }

    /// Sets the description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Current status
    #[inline]
    #[must_use]
    pub fn status(&self) -> SubscriptionStatus {
        self.status
    }

    /// Promotes the root block and moves the status along with it
    pub fn promote<T>(self) -> Result<Subscription<T>, LifecycleError>
    where
        B: Promote<T>,
        T: Block,
    {
        let next = T::STAGE.status();
        validate_transition(self.status, next)?;
        let root = self.root.promote()?;
        Ok(Subscription {
            subscription_id: self.subscription_id,
            product_type: self.product_type,
            description: self.description,
            status: next,
            root,
        })
    }

    /// Demotes the root block and moves the status back with it
    ///
    /// Only `active -> provisioning` passes the status rules, so a terminated
    /// subscription stays terminated.
    pub fn demote<T>(self) -> Result<Subscription<T>, LifecycleError>
    where
        B: Demote<T>,
        T: Block,
    {
        let next = T::STAGE.status();
        validate_transition(self.status, next)?;
        Ok(Subscription {
            subscription_id: self.subscription_id,
            product_type: self.product_type,
            description: self.description,
            status: next,
            root: self.root.demote(),
        })
    }

    /// Moves to a status that keeps the current block stage
    ///
    /// Used for `active <-> migrating` and for termination.
    pub fn transition(&mut self, to: SubscriptionStatus) -> Result<(), LifecycleError> {
        validate_transition(self.status, to)?;
        if let Some(stage) = to.stage() {
            if stage != B::STAGE {
                return Err(LifecycleError::StageMismatch {
                    status: to,
                    stage: B::STAGE,
                });
            }
        }
        self.status = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{ActiveSap, BareSap, ProvisioningSap};
    use crate::ids::InstanceId;
    use crate::stage::LifecycleStage;
    use portclaim_ranges::VlanRangeSet;

    fn ready_sap() -> BareSap {
        BareSap {
            port: Some(InstanceId::new()),
            vlan: Some(VlanRangeSet::single(100).unwrap()),
            ims_id: Some(1),
            ..BareSap::new()
        }
    }

    #[test]
    fn test_new_subscription_is_initial() {
        let sub = Subscription::new(ProductType::L2vpn, BareSap::new());
        assert_eq!(sub.status(), SubscriptionStatus::Initial);
    }

    #[test]
    fn test_create_then_activate() {
        let sub = Subscription::new(ProductType::L2vpn, ready_sap());
        let id = sub.subscription_id;
        let sub: Subscription<ProvisioningSap> = sub.promote().unwrap();
        assert_eq!(sub.status(), SubscriptionStatus::Provisioning);
        let sub: Subscription<ActiveSap> = sub.promote().unwrap();
        assert_eq!(sub.status(), SubscriptionStatus::Active);
        assert_eq!(sub.subscription_id, id);
    }

    #[test]
    fn test_initial_cannot_jump_to_active() {
        let sub = Subscription::new(ProductType::L2vpn, ready_sap());
        let result = sub.promote::<ActiveSap>();
        assert!(matches!(
            result,
            Err(LifecycleError::IllegalTransition {
                from: SubscriptionStatus::Initial,
                to: SubscriptionStatus::Active
            })
        ));
    }

    #[test]
    fn test_promotion_failure_carries_fields() {
        let sub = Subscription::new(ProductType::L2vpn, BareSap::new());
        match sub.promote::<ProvisioningSap>() {
            Err(LifecycleError::FieldMissing(err)) => {
                assert_eq!(err.fields, vec!["port", "vlan"]);
                assert_eq!(err.target, LifecycleStage::Provisioning);
            }
            other => panic!("expected missing fields, got {other:?}"),
        }
    }

    #[test]
    fn test_migrating_keeps_active_blocks() {
        let sub = Subscription::new(ProductType::L2vpn, ready_sap());
        let mut sub: Subscription<ActiveSap> = sub
            .promote::<ProvisioningSap>()
            .unwrap()
            .promote()
            .unwrap();
        sub.transition(SubscriptionStatus::Migrating).unwrap();
        assert_eq!(sub.status(), SubscriptionStatus::Migrating);
        sub.transition(SubscriptionStatus::Active).unwrap();
        assert!(matches!(
            sub.transition(SubscriptionStatus::Provisioning),
            Err(LifecycleError::StageMismatch { .. })
        ));
    }

    #[test]
    fn test_modify_demotes_to_provisioning() {
        let sub = Subscription::new(ProductType::L2vpn, ready_sap());
        let active: Subscription<ActiveSap> = sub
            .promote::<ProvisioningSap>()
            .unwrap()
            .promote()
            .unwrap();
        let modifying: Subscription<ProvisioningSap> = active.demote().unwrap();
        assert_eq!(modifying.status(), SubscriptionStatus::Provisioning);
        assert_eq!(modifying.root.ims_id, Some(1));
    }

    fn active_sap() -> Subscription<ActiveSap> {
        Subscription::new(ProductType::L2vpn, ready_sap())
            .promote::<ProvisioningSap>()
            .unwrap()
            .promote()
            .unwrap()
    }

    #[test]
    fn test_terminated_cannot_be_demoted() {
        let mut sub = active_sap();
        sub.transition(SubscriptionStatus::Terminated).unwrap();
        assert!(matches!(
            sub.demote::<ProvisioningSap>(),
            Err(LifecycleError::IllegalTransition {
                from: SubscriptionStatus::Terminated,
                to: SubscriptionStatus::Provisioning
            })
        ));
    }

    #[test]
    fn test_active_and_migrating_cannot_return_to_bare() {
        assert!(matches!(
            active_sap().demote::<BareSap>(),
            Err(LifecycleError::IllegalTransition {
                from: SubscriptionStatus::Active,
                to: SubscriptionStatus::Initial
            })
        ));

        let mut migrating = active_sap();
        migrating.transition(SubscriptionStatus::Migrating).unwrap();
        assert!(matches!(
            migrating.demote::<BareSap>(),
            Err(LifecycleError::IllegalTransition {
                from: SubscriptionStatus::Migrating,
                to: SubscriptionStatus::Initial
            })
        ));
    }
}
