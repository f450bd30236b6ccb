//! Allocation validator
//!
//! A candidate VLAN set runs through a fixed pipeline:
//!
//! 1. normalize: nothing selected means untagged (`{0}`)
//! 2. resolve the port mode
//! 3. cardinality: tagged ports need a VLAN, other modes take only `{0}`
//! 4. collect what the claim family already uses on the port
//! 5. reject overlap with that usage
//! 6. NSI requests stay inside the reservation and clear of their siblings
//! 7. accept the normalized candidate
//!
//! Steps 1, 3, 5 and 6 are free functions so they can be exercised without a
//! store.

use crate::config::AllocatorConfig;
use crate::error::AllocationError;
use crate::lock::{PortLease, PortLocks};
use crate::mode::{PortModeLookup, PortModePolicy};
use crate::overlay::StagedOverlay;
use crate::reservation::ReservationPolicy;
use portclaim_graph::{SubscriptionStore, UsageLookup};
use portclaim_lifecycle::{PortMode, ProductType, SubscriptionId};
use portclaim_ranges::VlanRangeSet;
use tracing::{debug, info, warn};

/// Which tiers a request is checked against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RequestScope {
    /// Physical port only
    #[default]
    Port,
    /// Physical port plus the NSI reservation on it
    Nsi,
}

/// One VLAN selection to validate
#[derive(Debug, Clone, Default)]
pub struct AllocationRequest<'o> {
    /// Port subscription the SAP lands on
    pub port: SubscriptionId,
    /// Selected VLANs, `None` when nothing was entered
    pub candidate: Option<VlanRangeSet>,
    /// Subscription being modified, whose own claims are ignored
    pub editing: Option<SubscriptionId>,
    /// Tiers to check
    pub scope: RequestScope,
    /// Uncommitted selections of the same submission
    pub overlay: Option<&'o StagedOverlay>,
    /// Overlay slot holding this selection
    pub slot: Option<usize>,
}

impl<'o> AllocationRequest<'o> {
    /// Port-scoped request for `candidate` on `port`
    #[must_use]
    pub fn new(port: SubscriptionId, candidate: Option<VlanRangeSet>) -> Self {
        Self {
            port,
            candidate,
            ..Self::default()
        }
    }

    /// Ignore the claims already held by `subscription`
    #[inline]
    #[must_use]
    pub fn editing(mut self, subscription: SubscriptionId) -> Self {
        self.editing = Some(subscription);
        self
    }

    /// Check against the NSI reservation as well
    #[inline]
    #[must_use]
    pub fn nsi(mut self) -> Self {
        self.scope = RequestScope::Nsi;
        self
    }

    /// Account for selections staged earlier in the same submission
    #[inline]
    #[must_use]
    pub fn with_overlay(mut self, overlay: &'o StagedOverlay, slot: Option<usize>) -> Self {
        self.overlay = Some(overlay);
        self.slot = slot;
        self
    }

    fn staged(&self, port: SubscriptionId, used: VlanRangeSet) -> VlanRangeSet {
        match self.overlay {
            Some(overlay) => overlay.apply(port, &used, self.slot),
            None => used,
        }
    }
}

/// Parses form input into a candidate; blank input means nothing selected
pub fn parse_candidate(text: &str) -> Result<Option<VlanRangeSet>, AllocationError> {
    let set: VlanRangeSet = text.parse()?;
    Ok((!set.is_empty()).then_some(set))
}

/// Absent or empty selection becomes the untagged set
#[must_use]
pub fn normalize_candidate(candidate: Option<VlanRangeSet>) -> VlanRangeSet {
    match candidate {
        Some(set) if !set.is_empty() => set,
        _ => VlanRangeSet::untagged(),
    }
}

/// Tagged ports reject `{0}`, untagged and link-member ports accept only `{0}`
pub fn check_cardinality(candidate: &VlanRangeSet, mode: PortMode) -> Result<(), AllocationError> {
    match mode {
        PortMode::Tagged if candidate.is_untagged() => Err(AllocationError::VlanRequired { mode }),
        PortMode::Untagged | PortMode::LinkMember if !candidate.is_untagged() => {
            Err(AllocationError::VlanNotAllowed {
                mode,
                candidate: candidate.clone(),
            })
        }
        _ => Ok(()),
    }
}

/// Rejects a candidate that overlaps what is already used on the port
pub fn check_usage(
    candidate: &VlanRangeSet,
    used: &VlanRangeSet,
    mode: PortMode,
) -> Result<(), AllocationError> {
    if !candidate.overlaps(used) {
        return Ok(());
    }
    match mode {
        PortMode::Tagged => Err(AllocationError::VlanInUse {
            used: used.clone(),
            overlap: candidate & used,
        }),
        PortMode::Untagged | PortMode::LinkMember => Err(AllocationError::PortInUse),
    }
}

/// Candidate must lie inside the reservation budget
pub fn check_reservation(candidate: &VlanRangeSet, reserved: &VlanRangeSet) -> Result<(), AllocationError> {
    if candidate.is_subset(reserved) {
        Ok(())
    } else {
        Err(AllocationError::VlanNotReserved {
            reserved: reserved.clone(),
            outside: candidate - reserved,
        })
    }
}

/// Candidate must not collide with sibling consumers of the reservation
pub fn check_siblings(
    candidate: &VlanRangeSet,
    sibling_used: &VlanRangeSet,
    product: ProductType,
) -> Result<(), AllocationError> {
    if candidate.overlaps(sibling_used) {
        Err(AllocationError::VlanAlreadyUsedByProduct {
            product,
            overlap: candidate & sibling_used,
        })
    } else {
        Ok(())
    }
}

/// Accepted selection, holding the port lock while alive
///
/// Commit the claim before dropping it. [`into_vlan`](Self::into_vlan) gives
/// up the lock right away.
#[derive(Debug)]
#[must_use]
pub struct Allocation {
    vlan: VlanRangeSet,
    lease: Option<PortLease>,
}

impl Allocation {
    /// Normalized VLAN set that was accepted
    #[inline]
    #[must_use]
    pub fn vlan(&self) -> &VlanRangeSet {
        &self.vlan
    }

    /// Port lock, absent when `lock_ports` is off
    #[inline]
    #[must_use]
    pub fn lease(&self) -> Option<&PortLease> {
        self.lease.as_ref()
    }

    /// Drops the lock and keeps the VLAN set
    #[must_use]
    pub fn into_vlan(self) -> VlanRangeSet {
        self.vlan
    }

    /// Splits into the VLAN set and the lock
    #[must_use]
    pub fn into_parts(self) -> (VlanRangeSet, Option<PortLease>) {
        (self.vlan, self.lease)
    }
}

/// Validates VLAN selections against a subscription store
#[derive(Debug)]
pub struct AllocationValidator<'a, S: ?Sized> {
    store: &'a S,
    config: &'a AllocatorConfig,
    locks: PortLocks,
}

impl<'a, S: SubscriptionStore + ?Sized> AllocationValidator<'a, S> {
    /// Validator on the process-wide lock registry
    ///
    /// Every validator built this way locks against every other one.
    #[must_use]
    pub fn new(store: &'a S, config: &'a AllocatorConfig) -> Self {
        Self {
            store,
            config,
            locks: PortLocks::shared(),
        }
    }

    /// Use a separate lock registry
    #[inline]
    #[must_use]
    pub fn with_locks(mut self, locks: PortLocks) -> Self {
        self.locks = locks;
        self
    }

    /// Lock registry in use
    #[must_use]
    pub fn locks(&self) -> &PortLocks {
        &self.locks
    }

    /// Runs the pipeline and returns the normalized candidate
    ///
    /// With `lock_ports` set, the returned [`Allocation`] keeps the port locked
    /// until it is dropped. Any validation of that port, on this thread or
    /// another, blocks meanwhile.
    pub fn validate(&self, request: &AllocationRequest<'_>) -> Result<Allocation, AllocationError> {
        let lease = self.config.lock_ports.then(|| self.locks.acquire(request.port));
        let vlan = self.run(request)?;
        Ok(Allocation { vlan, lease })
    }

    /// Runs the pipeline under the port lock and hands the lock to the caller
    ///
    /// The lock is taken regardless of `lock_ports`.
    pub fn validate_locked(
        &self,
        request: &AllocationRequest<'_>,
    ) -> Result<(VlanRangeSet, PortLease), AllocationError> {
        let lease = self.locks.acquire(request.port);
        let vlan = self.run(request)?;
        Ok((vlan, lease))
    }

    fn run(&self, request: &AllocationRequest<'_>) -> Result<VlanRangeSet, AllocationError> {
        let port = request.port;
        let result = self.pipeline(request);
        match &result {
            Ok(vlan) => info!(%port, %vlan, scope = ?request.scope, "allocation accepted"),
            Err(err) => warn!(%port, kind = ?err.kind(), error = %err, "allocation rejected"),
        }
        result
    }

    fn pipeline(&self, request: &AllocationRequest<'_>) -> Result<VlanRangeSet, AllocationError> {
        let port = request.port;
        let candidate = normalize_candidate(request.candidate.clone());
        let mode = PortModePolicy::new(self.store).mode_of(port)?;
        debug!(%port, %mode, %candidate, "validating allocation");
        check_cardinality(&candidate, mode)?;

        let nsi = request.scope == RequestScope::Nsi;
        let used = self.used_on(port, request.editing, nsi)?;
        let used = if nsi { used } else { request.staged(port, used) };
        check_usage(&candidate, &used, mode)?;

        if nsi {
            let reservations = ReservationPolicy::new(self.store, self.config);
            let reserved = reservations.reserved_for(port, self.config.reservation_product)?;
            check_reservation(&candidate, &reserved)?;

            let consumer = self.config.consumer_product;
            let siblings = reservations.consumed_on(port, consumer, request.editing)?;
            let siblings = request.staged(port, siblings);
            check_siblings(&candidate, &siblings, consumer)?;
        }
        Ok(candidate)
    }

    fn used_on(
        &self,
        port: SubscriptionId,
        editing: Option<SubscriptionId>,
        nsi: bool,
    ) -> Result<VlanRangeSet, AllocationError> {
        let family = self.config.claim_family(nsi);
        if family.is_empty() {
            return Ok(VlanRangeSet::empty());
        }
        let claims =
            UsageLookup::new(self.store).claims_on(port, &family, &self.config.claim_statuses)?;
        Ok(claims
            .iter()
            .filter(|claim| Some(claim.subscription_id) != editing)
            .map(|claim| &claim.vlan)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(text: &str) -> VlanRangeSet {
        text.parse().unwrap()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_candidate(None), VlanRangeSet::untagged());
        assert_eq!(normalize_candidate(Some(VlanRangeSet::empty())), VlanRangeSet::untagged());
        assert_eq!(normalize_candidate(Some(set("7"))), set("7"));
    }

    #[test]
    fn test_parse_candidate() {
        assert_eq!(parse_candidate("  ").unwrap(), None);
        assert_eq!(parse_candidate("5-6, 8").unwrap(), Some(set("5-6,8")));
        assert!(matches!(parse_candidate("1"), Err(AllocationError::RangeValue(_))));
    }

    #[test]
    fn test_cardinality() {
        let untagged = VlanRangeSet::untagged();
        assert_eq!(
            check_cardinality(&untagged, PortMode::Tagged),
            Err(AllocationError::VlanRequired { mode: PortMode::Tagged })
        );
        assert!(check_cardinality(&set("5"), PortMode::Tagged).is_ok());
        for mode in [PortMode::Untagged, PortMode::LinkMember] {
            assert!(check_cardinality(&untagged, mode).is_ok());
            assert!(matches!(
                check_cardinality(&set("5"), mode),
                Err(AllocationError::VlanNotAllowed { .. })
            ));
        }
    }

    #[test]
    fn test_usage() {
        let used = set("10-20");
        assert_eq!(
            check_usage(&set("15-25"), &used, PortMode::Tagged),
            Err(AllocationError::VlanInUse {
                used: used.clone(),
                overlap: set("15-20"),
            })
        );
        assert!(check_usage(&set("21"), &used, PortMode::Tagged).is_ok());

        let untagged = VlanRangeSet::untagged();
        assert_eq!(
            check_usage(&untagged, &untagged, PortMode::Untagged),
            Err(AllocationError::PortInUse)
        );
        assert!(check_usage(&untagged, &VlanRangeSet::empty(), PortMode::LinkMember).is_ok());
    }

    #[test]
    fn test_reservation_and_siblings() {
        let reserved = set("200-210");
        assert!(check_reservation(&set("205"), &reserved).is_ok());
        assert_eq!(
            check_reservation(&set("209-212"), &reserved),
            Err(AllocationError::VlanNotReserved {
                reserved: reserved.clone(),
                outside: set("211-212"),
            })
        );
        assert!(matches!(
            check_siblings(&set("205"), &set("205"), ProductType::Nsip2p),
            Err(AllocationError::VlanAlreadyUsedByProduct {
                product: ProductType::Nsip2p,
                ..
            })
        ));
        assert!(check_siblings(&set("206"), &set("205"), ProductType::Nsip2p).is_ok());
    }
}
