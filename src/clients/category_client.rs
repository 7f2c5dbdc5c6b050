use crate::clients::ResourceClient;
use crate::error::ServiceError;
use crate::framework::{Entity, EntityId, StoreClient};
use crate::model::{Category, Product};
use crate::protocol::{composite, CompositeOutcome, CompositePatch};
use std::ops::Deref;
use tracing::{debug, info, instrument};

/// Client for categories: the generic CRUD operations plus the two that involve a
/// category's products.
#[derive(Clone)]
pub struct CategoryClient {
    inner: ResourceClient<Category>,
}

impl CategoryClient {
    pub fn new(store: StoreClient) -> Self {
        Self {
            inner: ResourceClient::new(store),
        }
    }

    /// Patch the category and rename the listed products in one transaction.
    ///
    /// Unknown product ids are skipped. A constraint failure on any row reverts
    /// every change and returns [`ServiceError::PersistenceFailure`].
    #[instrument(skip(self, patch))]
    pub async fn patch_with_products(
        &self,
        id: EntityId,
        patch: CompositePatch,
    ) -> Result<CompositeOutcome, ServiceError> {
        debug!(?patch, "Composite patch");
        let outcome = self
            .inner
            .store()
            .transact(Category::NAME, "patch_with_products", move |txn| {
                composite::apply(txn, id, patch)
            })
            .await?;
        info!(
            renamed = outcome.renamed,
            skipped = outcome.skipped.len(),
            "Category patched"
        );
        Ok(outcome)
    }

    /// Products whose `category_id` is `id`, in ascending id order.
    #[instrument(skip(self))]
    pub async fn products(&self, id: EntityId) -> Result<Vec<Product>, ServiceError> {
        self.inner
            .store()
            .transact(Category::NAME, "products", move |txn| {
                if txn.get::<Category>(id).is_none() {
                    return Err(ServiceError::not_found::<Category>(id));
                }
                Ok(txn
                    .rows::<Product>()
                    .filter(|product| product.category_id == Some(id))
                    .cloned()
                    .collect())
            })
            .await
    }
}

impl Deref for CategoryClient {
    type Target = ResourceClient<Category>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
