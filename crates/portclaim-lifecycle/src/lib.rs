//! portclaim lifecycle
//!
//! Type-state model of subscriptions and their product blocks.
//!
//! # Overview
//!
//! Each block kind (node, port, core port, SAP, virtual circuit, core link,
//! NSISTP) comes in three explicit shapes: `Bare*`, `Provisioning*` and
//! `Active*`. [`Promote`] tightens a shape and reports every unset required
//! field in a [`FieldMissingError`]; [`Demote`] loosens it and never fails.
//! [`Subscription`] wraps a root block and keeps its [`SubscriptionStatus`]
//! consistent with the block stage.
//!
//! # Example
//!
//! ```rust
//! use portclaim_lifecycle::prelude::*;
//!
//! let port = BarePort {
//!     port_type: Some("10G".into()),
//!     port_mode: Some(PortMode::Tagged),
//!     auto_negotiation: Some(false),
//!     lldp: Some(true),
//!     enabled: Some(true),
//!     node: Some(InstanceId::new()),
//!     ims_id: Some(1),
//!     ..BarePort::new()
//! };
//!
//! let err = promote::<ProvisioningPort, _>(port).unwrap_err();
//! assert_eq!(err.fields, vec!["port_name"]);
//! ```

#![warn(missing_docs)]

pub mod blocks;
mod error;
mod fields;
mod ids;
mod product;
pub mod stage;
pub mod status;
mod subscription;

pub use error::{FieldMissingError, LifecycleError};
pub use ids::{InstanceId, SubscriptionId};
pub use product::{BlockKind, NodeStatus, PortMode, ProductType};
pub use stage::{demote, promote, Block, Demote, LifecycleStage, Promote};
pub use status::SubscriptionStatus;
pub use subscription::Subscription;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::blocks::*;
    pub use crate::{
        demote, promote, Block, BlockKind, Demote, FieldMissingError, InstanceId, LifecycleError,
        LifecycleStage, NodeStatus, PortMode, ProductType, Promote, Subscription,
        SubscriptionId, SubscriptionStatus,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
