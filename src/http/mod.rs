//! The JSON-over-HTTP surface of the storefront.

pub mod error;
pub mod handlers;

use axum::routing::{get, post};
use axum::Router;

use crate::clients::{CategoryClient, OrderClient, ProductClient, TokenClient, UserClient};
use crate::config::ApiSection;
use crate::lifecycle::StoreSystem;
use crate::model::{Category, Order, Product, User};

pub use error::ApiError;
use handlers::Resource;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenClient,
    pub users: UserClient,
    pub products: ProductClient,
    pub categories: CategoryClient,
    pub orders: OrderClient,
    pub api: ApiSection,
}

impl AppState {
    pub fn new(system: &StoreSystem, api: ApiSection) -> Self {
        Self {
            tokens: system.token_client.clone(),
            users: system.user_client.clone(),
            products: system.product_client.clone(),
            categories: system.category_client.clone(),
            orders: system.order_client.clone(),
            api,
        }
    }
}

/// HTTP server for the storefront API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    pub fn new(state: AppState) -> Self {
        Self {
            router: Self::build_router(state),
        }
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/tokens", post(handlers::issue_token))
            .route("/users", collection::<User>())
            .route("/users/{id}", member::<User>())
            .route("/products", collection::<Product>())
            .route("/products/{id}", member::<Product>())
            .route("/orders", collection::<Order>())
            .route("/orders/{id}", member::<Order>())
            .route("/categories", collection::<Category>())
            .route(
                "/categories/{id}",
                get(handlers::fetch::<Category>)
                    .put(handlers::replace::<Category>)
                    .patch(handlers::patch_category)
                    .delete(handlers::remove::<Category>),
            )
            .route(
                "/categories/{id}/products",
                get(handlers::category_products),
            )
            .with_state(state)
    }

    /// Return the inner [`Router`] (useful for testing with `tower::ServiceExt`).
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve on an already bound listener until `shutdown` completes, then wait
    /// for in-flight requests to finish.
    pub async fn serve_with_shutdown(
        self,
        listener: tokio::net::TcpListener,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), std::io::Error> {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(%addr, "API server listening");
        }
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

fn collection<T: Resource>() -> axum::routing::MethodRouter<AppState> {
    get(handlers::list::<T>).post(handlers::create::<T>)
}

fn member<T: Resource>() -> axum::routing::MethodRouter<AppState> {
    get(handlers::fetch::<T>)
        .put(handlers::replace::<T>)
        .patch(handlers::patch::<T>)
        .delete(handlers::remove::<T>)
}
