//! portclaim graph
//!
//! Subscription-instance store and the reverse-dependency lookup used to find
//! which subscriptions already claim VLANs on a port.
//!
//! # Overview
//!
//! - [`SubscriptionStore`]: read interface over subscriptions, block instances
//!   and "in use by" relations
//! - [`MemoryStore`]: petgraph-backed implementation with transactional writes
//! - [`UsageLookup`]: transitive dependents and direct VLAN claims of an anchor
//! - [`ToRecords`]: flattens lifecycle block trees into store records
//!
//! # Example
//!
//! ```rust
//! use portclaim_graph::{MemoryStore, SubscriptionRecord, UsageLookup};
//! use portclaim_lifecycle::{ProductType, SubscriptionId, SubscriptionStatus};
//!
//! let store = MemoryStore::new();
//! let port = SubscriptionId::new();
//! let mut tx = store.begin();
//! tx.insert_subscription(SubscriptionRecord::new(port, ProductType::Port, SubscriptionStatus::Active));
//! tx.commit().unwrap();
//!
//! let lookup = UsageLookup::new(&store);
//! assert!(lookup.active_vlans(port).unwrap().is_empty());
//! ```

#![warn(missing_docs)]

mod error;
mod memory;
mod records;
mod store;
mod usage;

pub use error::StoreError;
pub use memory::{MemoryStore, StoreTransaction};
pub use records::{BlockRecords, ToRecords};
pub use store::{InstanceData, InstanceRecord, Relation, SubscriptionRecord, SubscriptionStore};
pub use usage::{Claim, UsageLookup};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
