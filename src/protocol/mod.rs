//! The rules that make concurrent writes safe: token consumption, optimistic
//! replace, and the composite category patch.
//!
//! Each function takes the caller's [`Transaction`](crate::framework::Transaction)
//! and never commits on its own.

pub mod composite;
pub mod guard;
pub mod ledger;

pub use composite::{CompositeOutcome, CompositePatch, ProductRename};
