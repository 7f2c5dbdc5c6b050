//! Generic transactional store.
//!
//! This module knows nothing about users or products. It provides the building
//! blocks every resource is stored with.
//!
//! # Main Components
//!
//! - [`Entity`] / [`Versioned`] - Traits row types implement to be stored
//! - [`Transaction`] - Journaled scope with commit-time validation and rollback
//! - [`StoreActor`] - Task that owns the tables and serializes transactions
//! - [`StoreClient`] - Cloneable handle, generic over the job it runs
//! - [`StoreError`] - Store and actor failures

pub mod core;
pub mod entity;
pub mod error;
pub mod transaction;

pub use self::core::*;
pub use entity::*;
pub use error::StoreError;
pub use transaction::{StoreStats, Table, Tables, Transaction};
