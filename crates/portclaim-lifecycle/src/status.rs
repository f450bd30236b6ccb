//! Subscription status and its state machine

use crate::error::LifecycleError;
use crate::stage::LifecycleStage;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Lifecycle status of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// Created, nothing provisioned yet
    Initial,
    /// Being provisioned or modified
    Provisioning,
    /// In service
    Active,
    /// Moving to new infrastructure
    Migrating,
    /// Removed from service
    Terminated,
}

impl SubscriptionStatus {
    /// Every status, in lifecycle order
    pub const ALL: [Self; 5] = [
        Self::Initial,
        Self::Provisioning,
        Self::Active,
        Self::Migrating,
        Self::Terminated,
    ];

    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Provisioning => "provisioning",
            Self::Active => "active",
            Self::Migrating => "migrating",
            Self::Terminated => "terminated",
        }
    }

    /// Whether a subscription in this status still holds its port and VLAN claims
    #[must_use]
    pub const fn holds_claim(self) -> bool {
        matches!(self, Self::Provisioning | Self::Active | Self::Migrating)
    }

    /// Block stage a subscription in this status carries
    ///
    /// `None` for [`Terminated`](Self::Terminated), which may carry any stage.
    #[must_use]
    pub const fn stage(self) -> Option<LifecycleStage> {
        match self {
            Self::Initial => Some(LifecycleStage::Bare),
            Self::Provisioning => Some(LifecycleStage::Provisioning),
            Self::Active | Self::Migrating => Some(LifecycleStage::Active),
            Self::Terminated => None,
        }
    }

    /// Whether this status may be entered from `self`
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        allowed_transitions(self).contains(&to)
    }
}

impl Display for SubscriptionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LifecycleError::UnknownStatus(s.to_string()))
    }
}

/// Validates a status transition
pub fn validate_transition(
    from: SubscriptionStatus,
    to: SubscriptionStatus,
) -> Result<(), LifecycleError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(LifecycleError::IllegalTransition { from, to })
    }
}

/// Statuses reachable in one step from `from`
#[must_use]
pub fn allowed_transitions(from: SubscriptionStatus) -> Vec<SubscriptionStatus> {
    use SubscriptionStatus::{Active, Initial, Migrating, Provisioning, Terminated};
    match from {
        Initial => vec![Provisioning, Terminated],
        Provisioning => vec![Active, Terminated],
        Active => vec![Provisioning, Migrating, Terminated],
        Migrating => vec![Active, Terminated],
        Terminated => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_holding_statuses() {
        let holding: Vec<_> = SubscriptionStatus::ALL
            .into_iter()
            .filter(|s| s.holds_claim())
            .collect();
        assert_eq!(
            holding,
            vec![
                SubscriptionStatus::Provisioning,
                SubscriptionStatus::Active,
                SubscriptionStatus::Migrating
            ]
        );
    }

    #[test]
    fn test_terminated_is_final() {
        assert!(allowed_transitions(SubscriptionStatus::Terminated).is_empty());
        for status in SubscriptionStatus::ALL {
            let result = validate_transition(SubscriptionStatus::Terminated, status);
            assert!(matches!(
                result,
                Err(LifecycleError::IllegalTransition { .. })
            ));
        }
    }

    #[test]
    fn test_initial_cannot_skip_provisioning() {
        assert!(validate_transition(SubscriptionStatus::Initial, SubscriptionStatus::Active).is_err());
        assert!(
            validate_transition(SubscriptionStatus::Initial, SubscriptionStatus::Provisioning).is_ok()
        );
    }

    #[test]
    fn test_modify_round_trip() {
        assert!(validate_transition(SubscriptionStatus::Active, SubscriptionStatus::Provisioning).is_ok());
        assert!(validate_transition(SubscriptionStatus::Provisioning, SubscriptionStatus::Active).is_ok());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "ACTIVE".parse::<SubscriptionStatus>().unwrap(),
            SubscriptionStatus::Active
        );
        assert!("unknown".parse::<SubscriptionStatus>().is_err());
    }
}
