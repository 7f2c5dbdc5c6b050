//! # Store Errors
//!
//! Failures of the store itself, as opposed to business outcomes such as a version
//! conflict. Everything here means "the transaction did not commit".

use super::entity::EntityId;

/// Errors that can occur within the store actor or on the way to it.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum StoreError {
    #[error("Store actor closed")]
    ActorClosed,
    #[error("Store actor dropped response channel")]
    ActorDropped,
    /// A touched row failed [`Entity::validate`](super::Entity::validate) at commit.
    #[error("{entity} {id} violates a column constraint: {reason}")]
    Constraint {
        entity: &'static str,
        id: EntityId,
        reason: String,
    },
    #[error("Store task failed: {0}")]
    TaskFailed(String),
}
