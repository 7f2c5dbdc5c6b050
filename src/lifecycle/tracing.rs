//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the global `tracing` subscriber.
//!
//! ## Configuration
//!
//! `RUST_LOG` wins when set; otherwise the level from the `[log]` config section (or
//! `--log-level`) is used. The compact format hides the module prefix
//! (`with_target(false)`); the `entity_type` field already says where a line came from.
//!
//! ## What Gets Traced
//!
//! - **Store lifecycle**: start, shutdown, and the final row count
//! - **Transactions**: one line per commit or rollback, with `entity` and `op`
//! - **Client calls**: an `#[instrument]` span per operation, payloads at `debug`
//! - **HTTP**: 5xx responses at `error`
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs (default)
//! storefront
//!
//! # Show full payloads
//! RUST_LOG=debug storefront
//!
//! # Only store activity
//! RUST_LOG=storefront_api::framework=debug storefront
//! ```
//!
//! With `RUST_LOG=info` a create looks like:
//!
//! ```text
//! INFO Committed entity="User" op="create" writes=2
//! INFO create{entity_type="User"}: Created id=1
//! ```
//!
//! Read-only transactions log `Read` at `debug`; business rejections such as a
//! version conflict log `Aborted` at `debug` since nothing was written.

use tracing_subscriber::EnvFilter;

pub fn setup_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
