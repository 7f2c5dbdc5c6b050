//! Error types for the service layer.
//!
//! [`ServiceError`] is what every client method returns. The HTTP layer maps each
//! variant onto one status code; nothing below it knows about HTTP.

use crate::framework::{Entity, EntityId, StoreError, Version};
use thiserror::Error;

/// Errors that can occur during resource operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    /// The requested row does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: EntityId },

    /// A create was attempted without a `Token` header.
    #[error("Token is missing")]
    MissingToken,

    /// The presented token was never issued.
    #[error("Token is invalid")]
    InvalidToken,

    /// The presented token was already consumed by an earlier create.
    #[error("Token already used")]
    TokenAlreadyUsed,

    /// A full replace carried a version other than the stored one.
    #[error("{entity} {id} was modified: expected version {expected}, current is {current}")]
    VersionConflict {
        entity: &'static str,
        id: EntityId,
        expected: Version,
        current: Version,
    },

    /// A full replace arrived without a usable `Version` header.
    #[error("Version header is missing or not an integer")]
    MissingVersion,

    /// A page past the last one was requested.
    #[error("Page {page} not found")]
    PageOutOfRange { page: usize },

    /// The request is malformed (bad body, bad query parameter).
    #[error("{0}")]
    BadRequest(String),

    /// The transaction could not commit and was rolled back.
    #[error("Failed to update {entity}: {reason}")]
    PersistenceFailure { entity: &'static str, reason: String },

    /// The store itself is unavailable.
    #[error(transparent)]
    Store(StoreError),
}

impl ServiceError {
    pub fn not_found<T: Entity>(id: EntityId) -> Self {
        Self::NotFound {
            entity: T::NAME,
            id,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Constraint { entity, reason, .. } => {
                Self::PersistenceFailure { entity, reason }
            }
            other => Self::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_becomes_persistence_failure() {
        let err = ServiceError::from(StoreError::Constraint {
            entity: "Category",
            id: 2,
            reason: "name is 51 characters, limit is 50".into(),
        });
        assert_eq!(
            err,
            ServiceError::PersistenceFailure {
                entity: "Category",
                reason: "name is 51 characters, limit is 50".into(),
            }
        );
    }

    #[test]
    fn test_actor_failures_stay_store_errors() {
        assert_eq!(
            ServiceError::from(StoreError::ActorClosed),
            ServiceError::Store(StoreError::ActorClosed)
        );
    }
}
