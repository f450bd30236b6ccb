//! portclaim alloc
//!
//! Decides whether a VLAN selection on a port can be granted.
//!
//! # Overview
//!
//! - [`AllocationValidator`]: the fixed validation pipeline over a
//!   [`SubscriptionStore`](portclaim_graph::SubscriptionStore)
//! - [`PortModePolicy`]: tagged, untagged or link-member port
//! - [`ReservationPolicy`]: NSI reservation budgets and what is left of them
//! - [`StagedOverlay`]: selections made earlier in the same submission
//! - [`PortLocks`]: per-port serialization of read-check-write
//! - [`nsi`], [`identifiers`], [`circuit`]: field and shape rules around it
//!
//! # Example
//!
//! ```rust
//! use portclaim_alloc::prelude::*;
//! use portclaim_graph::{InstanceData, InstanceRecord, MemoryStore, SubscriptionRecord};
//! use portclaim_lifecycle::{InstanceId, PortMode, ProductType, SubscriptionId, SubscriptionStatus};
//!
//! let store = MemoryStore::new();
//! let port = SubscriptionId::new();
//! let mut tx = store.begin();
//! tx.insert_subscription(SubscriptionRecord::new(port, ProductType::Port, SubscriptionStatus::Active))
//!     .insert_instance(InstanceRecord::new(
//!         InstanceId::new(),
//!         port,
//!         InstanceData::Port { name: "et-0/0/0".into(), mode: PortMode::Untagged },
//!     ));
//! tx.commit().unwrap();
//!
//! let config = AllocatorConfig::default();
//! let validator = AllocationValidator::new(&store, &config);
//!
//! // The allocation keeps the port locked until the claim is committed
//! let allocation = validator.validate(&AllocationRequest::new(port, None)).unwrap();
//! assert!(allocation.vlan().is_untagged());
//! assert!(validator.locks().is_locked(port));
//! drop(allocation);
//!
//! let err = validator
//!     .validate(&AllocationRequest::new(port, Some("5".parse().unwrap())))
//!     .unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::VlanNotAllowed);
//! ```

#![warn(missing_docs)]

pub mod circuit;
mod config;
mod error;
pub mod identifiers;
mod lock;
pub mod logging;
mod mode;
pub mod nsi;
mod overlay;
mod reservation;
pub mod validator;

pub use config::{AllocatorConfig, LogFormat, LoggingConfig};
pub use error::{AllocationError, ConfigError, ErrorKind};
pub use lock::{PortLease, PortLocks};
pub use mode::{PortModeLookup, PortModePolicy};
pub use overlay::{StagedChange, StagedEntry, StagedOverlay};
pub use reservation::ReservationPolicy;
pub use validator::{Allocation, AllocationRequest, AllocationValidator, RequestScope};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Allocation, AllocationError, AllocationRequest, AllocationValidator, AllocatorConfig, ErrorKind,
        PortLocks, PortModeLookup, PortModePolicy, RequestScope, ReservationPolicy, StagedOverlay,
    };
    pub use portclaim_ranges::VlanRangeSet;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
