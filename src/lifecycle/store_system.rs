use crate::clients::{CategoryClient, OrderClient, ProductClient, TokenClient, UserClient};
use crate::config::StoreSection;
use crate::framework::{StoreActor, StoreClient, StoreError};
use tracing::{error, info};

/// The running storefront: one store actor plus a client per resource.
///
/// `StoreSystem` is responsible for:
/// - **Lifecycle Management**: spawning the store actor and stopping it again
/// - **Dependency Wiring**: handing every client a handle to the same store
///
/// # Example
///
/// ```ignore
/// let system = StoreSystem::new(&StoreSection::default());
///
/// let token = system.token_client.issue().await?;
/// let user = system.user_client.create(token, user_data).await?;
///
/// system.shutdown().await?;
/// ```
pub struct StoreSystem {
    pub token_client: TokenClient,
    pub user_client: UserClient,
    pub product_client: ProductClient,
    pub category_client: CategoryClient,
    pub order_client: OrderClient,

    store: StoreClient,
    handle: tokio::task::JoinHandle<()>,
}

impl StoreSystem {
    /// Spawns the store actor and builds the clients. Must be called inside a Tokio
    /// runtime.
    pub fn new(config: &StoreSection) -> Self {
        let (actor, store) = StoreActor::new(config.channel_capacity);
        let handle = tokio::spawn(actor.run());

        Self {
            token_client: TokenClient::new(store.clone()),
            user_client: UserClient::new(store.clone()),
            product_client: ProductClient::new(store.clone()),
            category_client: CategoryClient::new(store.clone()),
            order_client: OrderClient::new(store.clone()),
            store,
            handle,
        }
    }

    /// A raw handle to the store, for stats and for callers that build their own
    /// clients.
    pub fn store(&self) -> &StoreClient {
        &self.store
    }

    /// Gracefully shuts the store down.
    ///
    /// Dropping every client closes the channel; the actor drains what is queued,
    /// exits its loop, and this waits for the task. Clones handed out elsewhere (for
    /// example to the HTTP router) must be dropped first or this waits for them.
    ///
    /// # Errors
    /// [`StoreError::TaskFailed`] if the actor task panicked.
    pub async fn shutdown(self) -> Result<(), StoreError> {
        info!("Shutting down store...");

        drop(self.token_client);
        drop(self.user_client);
        drop(self.product_client);
        drop(self.category_client);
        drop(self.order_client);
        drop(self.store);

        if let Err(e) = self.handle.await {
            error!(error = ?e, "Store task failed");
            return Err(StoreError::TaskFailed(e.to_string()));
        }

        info!("Store shutdown complete.");
        Ok(())
    }
}
