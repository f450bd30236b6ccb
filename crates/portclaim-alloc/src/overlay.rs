//! Claims and releases staged by a multi-step form before anything is committed

use portclaim_lifecycle::SubscriptionId;
use portclaim_ranges::VlanRangeSet;
use serde::{Deserialize, Serialize};

/// Direction of a staged change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagedChange {
    /// VLANs picked earlier in the same submission
    Claim,
    /// VLANs the submission gives back
    Release,
}

/// One staged change on a port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedEntry {
    /// Port the change applies to
    pub port: SubscriptionId,
    /// VLANs concerned
    pub vlan: VlanRangeSet,
    /// Claim or release
    pub change: StagedChange,
}

/// Uncommitted selections of one submission
///
/// Every entry sits in a slot; the slot being validated is left out when the
/// overlay is applied so a SAP never collides with itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedOverlay {
    entries: Vec<StagedEntry>,
}

impl StagedOverlay {
    /// Empty overlay
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a claim and returns its slot
    pub fn stage_claim(&mut self, port: SubscriptionId, vlan: VlanRangeSet) -> usize {
        self.push(port, vlan, StagedChange::Claim)
    }

    /// Stages a release and returns its slot
    pub fn stage_release(&mut self, port: SubscriptionId, vlan: VlanRangeSet) -> usize {
        self.push(port, vlan, StagedChange::Release)
    }

    fn push(&mut self, port: SubscriptionId, vlan: VlanRangeSet, change: StagedChange) -> usize {
        self.entries.push(StagedEntry { port, vlan, change });
        self.entries.len() - 1
    }

    /// Replaces the VLANs of a slot, returning the previous ones
    pub fn replace(&mut self, slot: usize, vlan: VlanRangeSet) -> Option<VlanRangeSet> {
        self.entries
            .get_mut(slot)
            .map(|entry| std::mem::replace(&mut entry.vlan, vlan))
    }

    /// Entry in `slot`
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&StagedEntry> {
        self.entries.get(slot)
    }

    /// Number of slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is staged
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the staged entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = &StagedEntry> {
        self.entries.iter()
    }

    fn collect(&self, port: SubscriptionId, change: StagedChange, except: Option<usize>) -> VlanRangeSet {
        self.entries
            .iter()
            .enumerate()
            .filter(|(slot, entry)| {
                Some(*slot) != except && entry.port == port && entry.change == change
            })
            .map(|(_, entry)| &entry.vlan)
            .collect()
    }

    /// Staged claims on `port` outside slot `except`
    #[must_use]
    pub fn claims_on(&self, port: SubscriptionId, except: Option<usize>) -> VlanRangeSet {
        self.collect(port, StagedChange::Claim, except)
    }

    /// Staged releases on `port` outside slot `except`
    #[must_use]
    pub fn releases_on(&self, port: SubscriptionId, except: Option<usize>) -> VlanRangeSet {
        self.collect(port, StagedChange::Release, except)
    }

    /// `used` as it will be once this submission is committed
    #[must_use]
    pub fn apply(&self, port: SubscriptionId, used: &VlanRangeSet, except: Option<usize>) -> VlanRangeSet {
        &(used - &self.releases_on(port, except)) | &self.claims_on(port, except)
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
    fn test_apply_skips_own_slot() {
        let port = SubscriptionId::new();
        let other = SubscriptionId::new();
        let mut overlay = StagedOverlay::new();
        let first = overlay.stage_claim(port, set("30"));
        overlay.stage_claim(port, set("31"));
        overlay.stage_claim(other, set("32"));

        let used = set("10-20");
        assert_eq!(overlay.apply(port, &used, None).to_string(), "10-20,30-31");
        assert_eq!(overlay.apply(port, &used, Some(first)).to_string(), "10-20,31");
        assert_eq!(overlay.apply(other, &VlanRangeSet::empty(), None).to_string(), "32");
    }

    #[test]
    fn test_release_frees_committed_vlans() {
        let port = SubscriptionId::new();
        let mut overlay = StagedOverlay::new();
        overlay.stage_release(port, set("15-20"));
        overlay.stage_claim(port, set("18"));
        assert_eq!(overlay.apply(port, &set("10-20"), None).to_string(), "10-14,18");
    }

    #[test]
    fn test_replace_slot() {
        let port = SubscriptionId::new();
        let mut overlay = StagedOverlay::new();
        let slot = overlay.stage_claim(port, set("40"));
        assert_eq!(overlay.replace(slot, set("41")), Some(set("40")));
        assert_eq!(overlay.replace(9, set("42")), None);
        assert_eq!(overlay.claims_on(port, None).to_string(), "41");
        assert_eq!(overlay.len(), 1);
    }
}
