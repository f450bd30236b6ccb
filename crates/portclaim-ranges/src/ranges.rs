//! VLAN range sets
//!
//! Provides [`VlanRangeSet`], the value type every allocation decision is
//! expressed in. A set is normalized on construction: intervals are sorted,
//! disjoint and never adjacent, so two sets with the same members compare
//! equal regardless of how they were built.

use crate::error::RangeValueError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::ops::{BitAnd, BitOr, BitOrAssign, Sub, SubAssign};
use std::str::FromStr;

/// Untagged sentinel VLAN
pub const UNTAGGED: u16 = 0;

/// Lowest tagged VLAN identifier
pub const MIN_TAGGED_VLAN: u16 = 2;

/// Highest VLAN identifier
pub const MAX_VLAN: u16 = 4094;

fn check_vlan(vlan: u32) -> Result<u16, RangeValueError> {
    let in_domain = vlan == u32::from(UNTAGGED)
        || (u32::from(MIN_TAGGED_VLAN)..=u32::from(MAX_VLAN)).contains(&vlan);
    match u16::try_from(vlan) {
        Ok(v) if in_domain => Ok(v),
        _ => Err(RangeValueError::OutOfRange { vlan }),
    }
}

/// Inclusive VLAN interval
///
/// Always within the VLAN domain and never spanning the invalid VLAN `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VlanRange {
    start: u16,
    end: u16,
}

impl VlanRange {
    /// Create a validated inclusive interval
    ///
    /// # Errors
    /// Returns error if either bound is outside the domain, if `start > end`,
    /// or if the interval would cover VLAN `1`.
    pub fn new(start: u16, end: u16) -> Result<Self, RangeValueError> {
        let start = check_vlan(start.into())?;
        let end = check_vlan(end.into())?;
        if start > end {
            return Err(RangeValueError::Inverted {
                start: start.into(),
                end: end.into(),
            });
        }
        if start == UNTAGGED && end != UNTAGGED {
            return Err(RangeValueError::OutOfRange { vlan: 1 });
        }
        Ok(Self { start, end })
    }

    #[inline]
    const fn point(vlan: u16) -> Self {
        Self {
            start: vlan,
            end: vlan,
        }
    }

    /// First VLAN of the interval
    #[inline]
    #[must_use]
    pub const fn start(self) -> u16 {
        self.start
    }

    /// Last VLAN of the interval (inclusive)
    #[inline]
    #[must_use]
    pub const fn end(self) -> u16 {
        self.end
    }

    /// Number of VLANs in the interval
    #[inline]
    #[must_use]
    pub fn vlan_count(self) -> usize {
        usize::from(self.end - self.start) + 1
    }

    /// Check membership
    #[inline]
    #[must_use]
    pub const fn contains(self, vlan: u16) -> bool {
        self.start <= vlan && vlan <= self.end
    }
}

impl Display for VlanRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Normalized set of VLAN identifiers
///
/// # Invariants
/// - Intervals are sorted, disjoint and non-adjacent
/// - Every member is `0` or in `2..=4094`
/// - Immutable: every operation returns a new set
///
/// # Examples
/// - `VlanRangeSet::from_vlans([3, 5, 6])` renders as `3,5-6`
/// - `"0".parse::<VlanRangeSet>()` is the untagged set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VlanRangeSet(Vec<VlanRange>);

impl VlanRangeSet {
    fn normalize(mut ranges: Vec<VlanRange>) -> Self {
        ranges.sort_unstable();
        let mut merged: Vec<VlanRange> = Vec::with_capacity(ranges.len());
        for range in ranges {
            match merged.last_mut() {
                Some(last) if u32::from(range.start) <= u32::from(last.end) + 1 => {
                    last.end = last.end.max(range.end);
                }
                _ => merged.push(range),
            }
        }
        Self(merged)
    }

    /// Empty set
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// The untagged set `{0}`
    #[inline]
    #[must_use]
    pub fn untagged() -> Self {
        Self(vec![VlanRange::point(UNTAGGED)])
    }

    /// Set holding a single VLAN
    ///
    /// # Errors
    /// Returns error if `vlan` is outside the VLAN domain
    pub fn single(vlan: u16) -> Result<Self, RangeValueError> {
        let vlan = check_vlan(vlan.into())?;
        Ok(Self(vec![VlanRange::point(vlan)]))
    }

    /// Set holding one inclusive interval
    ///
    /// # Errors
    /// Returns error if the interval is invalid (see [`VlanRange::new`])
    pub fn from_range(start: u16, end: u16) -> Result<Self, RangeValueError> {
        Ok(Self(vec![VlanRange::new(start, end)?]))
    }

    /// Build a set from individual VLAN identifiers
    ///
    /// # Errors
    /// Returns error on the first identifier outside the VLAN domain
    pub fn from_vlans<I>(vlans: I) -> Result<Self, RangeValueError>
    where
        I: IntoIterator<Item = u16>,
    {
        let ranges = vlans
            .into_iter()
            .map(|vlan| check_vlan(vlan.into()).map(VlanRange::point))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::normalize(ranges))
    }

    /// Build a set from already validated intervals
    #[must_use]
    pub fn from_ranges<I>(ranges: I) -> Self
    where
        I: IntoIterator<Item = VlanRange>,
    {
        Self::normalize(ranges.into_iter().collect())
    }

    /// Normalized intervals
    #[inline]
    #[must_use]
    pub fn ranges(&self) -> &[VlanRange] {
        &self.0
    }

    /// Iterator over member VLANs in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().flat_map(|r| r.start..=r.end)
    }

    /// Number of member VLANs
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.iter().map(|r| r.vlan_count()).sum()
    }

    /// Check if the set has no members
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if the set holds exactly one VLAN
    #[inline]
    #[must_use]
    pub fn is_single_vlan(&self) -> bool {
        matches!(self.0.as_slice(), [r] if r.start == r.end)
    }

    /// Check if the set is exactly the untagged set `{0}`
    #[inline]
    #[must_use]
    pub fn is_untagged(&self) -> bool {
        matches!(self.0.as_slice(), [r] if r.start == UNTAGGED && r.end == UNTAGGED)
    }

    /// Check membership
    #[must_use]
    pub fn contains(&self, vlan: u16) -> bool {
        self.0
            .binary_search_by(|r| {
                if r.end < vlan {
                    std::cmp::Ordering::Less
                } else if r.start > vlan {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Check if the sets share at least one VLAN
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let (a, b) = (&self.0, &other.0);
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            if a[i].start.max(b[j].start) <= a[i].end.min(b[j].end) {
                return true;
            }
            if a[i].end < b[j].end {
                i += 1;
            } else {
                j += 1;
            }
        }
        false
    }

    /// Check if every member of `self` is a member of `other`
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.difference(other).is_empty()
    }

    /// Members of either set
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut ranges = Vec::with_capacity(self.0.len() + other.0.len());
        ranges.extend_from_slice(&self.0);
        ranges.extend_from_slice(&other.0);
        Self::normalize(ranges)
    }

    /// Members of both sets
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let (a, b) = (&self.0, &other.0);
        let (mut i, mut j) = (0, 0);
        let mut out = Vec::new();
        while i < a.len() && j < b.len() {
            let lo = a[i].start.max(b[j].start);
            let hi = a[i].end.min(b[j].end);
            if lo <= hi {
                out.push(VlanRange { start: lo, end: hi });
            }
            if a[i].end < b[j].end {
                i += 1;
            } else {
                j += 1;
            }
        }
        Self::normalize(out)
    }

    /// Members of `self` that are not members of `other`
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        let mut out = Vec::new();
        let mut j = 0;
        for range in &self.0 {
            // VLANs are at most 4094, so `end + 1` cannot overflow u16.
            let mut start = range.start;
            while j < other.0.len() && other.0[j].end < start {
                j += 1;
            }
            let mut k = j;
            while start <= range.end {
                match other.0.get(k) {
                    Some(cut) if cut.start <= range.end => {
                        if cut.start > start {
                            out.push(VlanRange {
                                start,
                                end: cut.start - 1,
                            });
                        }
                        start = cut.end + 1;
                        k += 1;
                    }
                    _ => {
                        out.push(VlanRange {
                            start,
                            end: range.end,
                        });
                        break;
                    }
                }
            }
        }
        Self(out)
    }
}

impl Display for VlanRangeSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, range) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{range}")?;
        }
        Ok(())
    }
}

fn parse_bound(raw: &str, token: &str) -> Result<u32, RangeValueError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| RangeValueError::Malformed {
            token: token.to_string(),
        })
}

impl FromStr for VlanRangeSet {
    type Err = RangeValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::empty());
        }

        let ranges = s
            .split(',')
            .map(|raw| {
                let token = raw.trim();
                if token.is_empty() {
                    return Err(RangeValueError::Malformed {
                        token: s.to_string(),
                    });
                }
                match token.split_once('-') {
                    Some((lo, hi)) => {
                        let (lo, hi) = (parse_bound(lo, token)?, parse_bound(hi, token)?);
                        if lo > hi {
                            return Err(RangeValueError::Inverted { start: lo, end: hi });
                        }
                        VlanRange::new(check_vlan(lo)?, check_vlan(hi)?)
                    }
                    None => check_vlan(parse_bound(token, token)?).map(VlanRange::point),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::normalize(ranges))
    }
}

impl TryFrom<u16> for VlanRangeSet {
    type Error = RangeValueError;

    fn try_from(vlan: u16) -> Result<Self, Self::Error> {
        Self::single(vlan)
    }
}

impl TryFrom<Vec<u16>> for VlanRangeSet {
    type Error = RangeValueError;

    fn try_from(vlans: Vec<u16>) -> Result<Self, Self::Error> {
        Self::from_vlans(vlans)
    }
}

impl FromIterator<VlanRangeSet> for VlanRangeSet {
    fn from_iter<I: IntoIterator<Item = VlanRangeSet>>(iter: I) -> Self {
        Self::normalize(iter.into_iter().flat_map(|set| set.0).collect())
    }
}

impl<'a> FromIterator<&'a VlanRangeSet> for VlanRangeSet {
    fn from_iter<I: IntoIterator<Item = &'a VlanRangeSet>>(iter: I) -> Self {
        Self::normalize(
            iter.into_iter()
                .flat_map(|set| set.0.iter().copied())
                .collect(),
        )
    }
}

impl BitOr<&VlanRangeSet> for &VlanRangeSet {
    type Output = VlanRangeSet;

    fn bitor(self, rhs: &VlanRangeSet) -> VlanRangeSet {
        self.union(rhs)
    }
}

impl BitOr for VlanRangeSet {
    type Output = VlanRangeSet;

    fn bitor(self, rhs: VlanRangeSet) -> VlanRangeSet {
        self.union(&rhs)
    }
}

impl BitOrAssign<&VlanRangeSet> for VlanRangeSet {
    fn bitor_assign(&mut self, rhs: &VlanRangeSet) {
        *self = self.union(rhs);
    }
}

impl BitAnd<&VlanRangeSet> for &VlanRangeSet {
    type Output = VlanRangeSet;

    fn bitand(self, rhs: &VlanRangeSet) -> VlanRangeSet {
        self.intersection(rhs)
    }
}

impl BitAnd for VlanRangeSet {
    type Output = VlanRangeSet;

    fn bitand(self, rhs: VlanRangeSet) -> VlanRangeSet {
        self.intersection(&rhs)
    }
}

impl Sub<&VlanRangeSet> for &VlanRangeSet {
    type Output = VlanRangeSet;

    fn sub(self, rhs: &VlanRangeSet) -> VlanRangeSet {
        self.difference(rhs)
    }
}

impl Sub for VlanRangeSet {
    type Output = VlanRangeSet;

    fn sub(self, rhs: VlanRangeSet) -> VlanRangeSet {
        self.difference(&rhs)
    }
}

impl SubAssign<&VlanRangeSet> for VlanRangeSet {
    fn sub_assign(&mut self, rhs: &VlanRangeSet) {
        *self = self.difference(rhs);
    }
}

impl Serialize for VlanRangeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VlanRangeSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
