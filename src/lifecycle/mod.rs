//! Startup and shutdown of the store, and logging setup.

pub mod store_system;
pub mod tracing;

pub use store_system::*;
pub use self::tracing::setup_tracing;
