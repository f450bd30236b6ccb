//! Lifecycle errors

use crate::product::BlockKind;
use crate::stage::LifecycleStage;
use crate::status::SubscriptionStatus;
use thiserror::Error;

/// Promotion failed because required fields are unset
///
/// `fields` lists every unset field required by the target stage. Fields of
/// owned child blocks carry a dotted prefix (`sap.vlan`, `saps[1].port`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot promote {block} to {target}: required fields not set: {}", .fields.join(", "))]
pub struct FieldMissingError {
    /// Kind of the block that was promoted
    pub block: BlockKind,
    /// Stage that was requested
    pub target: LifecycleStage,
    /// Unset required fields, in declaration order
    pub fields: Vec<String>,
}

impl FieldMissingError {
    /// Creates a new error
    #[must_use]
    pub fn new(block: BlockKind, target: LifecycleStage, fields: Vec<String>) -> Self {
        Self {
            block,
            target,
            fields,
        }
    }

    /// Whether `field` is among the missing fields
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

/// Errors raised when moving a subscription through its lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The block could not be promoted
    #[error(transparent)]
    FieldMissing(#[from] FieldMissingError),

    /// The status state machine forbids this move
    #[error("illegal status transition: {from} -> {to}")]
    IllegalTransition {
        /// Current status
        from: SubscriptionStatus,
        /// Requested status
        to: SubscriptionStatus,
    },

    /// The status does not fit the stage of the blocks the subscription carries
    #[error("status {status} does not apply to {stage} blocks")]
    StageMismatch {
        /// Requested status
        status: SubscriptionStatus,
        /// Stage of the carried blocks
        stage: LifecycleStage,
    },

    /// Status name was not recognized
    #[error("unknown subscription status: {0}")]
    UnknownStatus(String),
}
