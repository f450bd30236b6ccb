//! portclaim VLAN ranges
//!
//! Normalized VLAN identifier sets with set arithmetic.
//!
//! # Overview
//!
//! - [`VlanRangeSet`]: immutable set of disjoint inclusive VLAN intervals
//! - [`VlanRange`]: one inclusive interval of a set
//! - [`RangeValueError`]: malformed or out-of-domain VLAN input
//!
//! VLAN `0` is the untagged sentinel; `1` is never valid; tagged VLANs live in
//! `2..=4094`.
//!
//! # Example
//!
//! ```rust
//! use portclaim_ranges::VlanRangeSet;
//!
//! let used: VlanRangeSet = "10-20".parse().unwrap();
//! let candidate = VlanRangeSet::single(15).unwrap();
//!
//! assert!(candidate.overlaps(&used));
//! assert_eq!((&used | &VlanRangeSet::single(25).unwrap()).to_string(), "10-20,25");
//! ```

#![warn(missing_docs)]

mod error;
mod ranges;

pub use error::RangeValueError;
pub use ranges::{VlanRange, VlanRangeSet, MAX_VLAN, MIN_TAGGED_VLAN, UNTAGGED};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
