//! Lifecycle stages and the promote/demote conversions between them
//!
//! Every block kind exists in three shapes. A bare block has every field
//! optional, a provisioning block has the fields needed to build the service,
//! and an active block has every field. Promotion tightens the shape and fails
//! with the complete list of unset fields; demotion loosens it and never fails.

use crate::error::FieldMissingError;
use crate::product::BlockKind;
use crate::status::SubscriptionStatus;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Strictness level of a block shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStage {
    /// Every field optional
    Bare,
    /// Fields needed for provisioning are set
    Provisioning,
    /// Every field set
    Active,
}

impl LifecycleStage {
    /// Status a subscription gets when its blocks enter this stage
    #[must_use]
    pub const fn status(self) -> SubscriptionStatus {
        match self {
            Self::Bare => SubscriptionStatus::Initial,
            Self::Provisioning => SubscriptionStatus::Provisioning,
            Self::Active => SubscriptionStatus::Active,
        }
    }
}

impl Display for LifecycleStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bare => "bare",
            Self::Provisioning => "provisioning",
            Self::Active => "active",
        };
        f.write_str(name)
    }
}

/// A product block in one particular stage
pub trait Block {
    /// Kind of block
    const KIND: BlockKind;
    /// Stage this shape represents
    const STAGE: LifecycleStage;

    /// Required fields still unset for reaching `target`, owned children included
    ///
    /// Empty when `target` is not stricter than the current stage.
    fn missing_fields(&self, target: LifecycleStage) -> Vec<String>;
}

/// Conversion to a stricter stage
pub trait Promote<T> {
    /// Tightens the block, or lists every field that prevents it
    fn promote(self) -> Result<T, FieldMissingError>;
}

/// Conversion to a looser stage
pub trait Demote<T> {
    /// Loosens the block, keeping every value
    fn demote(self) -> T;
}

/// Promotes `instance` to the `T` shape
pub fn promote<T, S: Promote<T>>(instance: S) -> Result<T, FieldMissingError> {
    instance.promote()
}

/// Demotes `instance` to the `T` shape
pub fn demote<T, S: Demote<T>>(instance: S) -> T {
    instance.demote()
}

/// Error for a `B` block that is not ready for `target`
pub(crate) fn incomplete<B: Block>(target: LifecycleStage, missing: Vec<String>) -> FieldMissingError {
    FieldMissingError::new(B::KIND, target, missing)
}

/// Bare to active in one step, reporting every missing field at once
pub(crate) fn promote_through<B, P, A>(block: B) -> Result<A, FieldMissingError>
where
    B: Block + Promote<P>,
    P: Promote<A>,
{
    let missing = block.missing_fields(LifecycleStage::Active);
    if !missing.is_empty() {
        return Err(incomplete::<B>(LifecycleStage::Active, missing));
    }
    let provisioning = Promote::<P>::promote(block)?;
    Promote::<A>::promote(provisioning)
}

/// Active to bare in one step
pub(crate) fn demote_through<A, P, B>(block: A) -> B
where
    A: Demote<P>,
    P: Demote<B>,
{
    Demote::<P>::demote(block).demote()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_ordering() {
        assert!(LifecycleStage::Bare < LifecycleStage::Provisioning);
        assert!(LifecycleStage::Provisioning < LifecycleStage::Active);
    }

    #[test]
    fn test_stage_status() {
        assert_eq!(LifecycleStage::Bare.status(), SubscriptionStatus::Initial);
        assert_eq!(LifecycleStage::Active.status(), SubscriptionStatus::Active);
        assert_eq!(
            SubscriptionStatus::Migrating.stage(),
            Some(LifecycleStage::Active)
        );
    }
}
