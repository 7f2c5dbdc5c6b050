//! # Storefront API
//!
//! > **A token-gated CRUD service with optimistic concurrency, built on one actor.**
//!
//! Users, products, categories and orders are served over JSON/HTTP. Creating a row
//! costs a single-use token; replacing one requires the version you last read;
//! patching a category can rename its products in the same transaction.
//!
//! ## Design Philosophy
//!
//! ### One actor, many tables
//! Every table lives inside a single [`StoreActor`](framework::StoreActor). Requests
//! reach it through a channel and run one at a time, so each transaction sees a
//! consistent store and two transactions can never both pass the same check. That
//! is what makes the single-use token and the version compare-and-swap safe under
//! concurrent requests, without a lock around the data.
//!
//! ### Transactions as closures
//! A client method is a closure over a [`Transaction`](framework::Transaction). The
//! actor runs it, commits on `Ok` and rolls back on `Err`. Commit validates every
//! touched row, so a bad column anywhere undoes the whole closure.
//!
//! ### Generics: The Power of `T`
//! [`ResourceClient<T>`](clients::ResourceClient) and the HTTP handlers are written
//! once and instantiated for every [`Versioned`](framework::Versioned) model.
//!
//! ## Architecture Notes
//!
//! ### 1. Error Handling
//! `thiserror` enums per layer: [`StoreError`](framework::StoreError) for the store,
//! [`ServiceError`](error::ServiceError) for business outcomes, and
//! [`ApiError`](http::ApiError) which turns either into a JSON response.
//!
//! ### 2. Weak spots, on purpose
//! - PATCH skips the version check and does not bump the version.
//! - Unknown product ids in a category patch are skipped.
//! - `Order.user_id`, `Order.product_id` and `Product.category_id` are not checked
//!   against their tables.
//!
//! ### 3. Observability
//! `tracing` everywhere. See the [`lifecycle::tracing`] module.
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! Tables, transactions, the store actor and its client.
//!
//! ### 2. The Rules ([`protocol`])
//! Token ledger, concurrency guard, composite category patch.
//!
//! ### 3. The Interface ([`clients`])
//! Typed clients, one transaction per call.
//!
//! ### 4. The Models ([`model`])
//! `User`, `Product`, `Category`, `Order`, `Token`.
//!
//! ### 5. The Surface ([`http`])
//! axum router and handlers.
//!
//! ### 6. The Orchestrator ([`lifecycle`])
//! Starts and stops the store; configures logging.
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info cargo run -- --config storefront.toml
//! ```

pub mod clients;
pub mod config;
pub mod error;
pub mod framework;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod pagination;
pub mod protocol;
