use crate::error::ServiceError;
use crate::framework::{EntityId, StoreClient, Version, Versioned};
use crate::pagination::{paginate, Page, PageRequest};
use crate::protocol::{guard, ledger};
use std::marker::PhantomData;
use tracing::{debug, info, instrument};

/// Typed CRUD client for one resource kind.
///
/// Each method is one transaction on the store. The generic parameter picks the
/// table; the payload types come from `T`'s [`Versioned`] impl, so a
/// `ResourceClient<User>` only accepts user payloads.
pub struct ResourceClient<T> {
    store: StoreClient,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Versioned> ResourceClient<T> {
    pub fn new(store: StoreClient) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub(crate) fn store(&self) -> &StoreClient {
        &self.store
    }

    /// Fetch a row. The returned value carries its current version.
    #[instrument(skip(self), fields(entity_type = T::NAME))]
    pub async fn get(&self, id: EntityId) -> Result<T, ServiceError> {
        self.store
            .transact(T::NAME, "get", move |txn| {
                txn.get::<T>(id)
                    .cloned()
                    .ok_or_else(|| ServiceError::not_found::<T>(id))
            })
            .await
    }

    /// One page of rows in ascending id order.
    #[instrument(skip(self), fields(entity_type = T::NAME))]
    pub async fn list(&self, request: PageRequest) -> Result<Page<T>, ServiceError> {
        self.store
            .transact(T::NAME, "list", move |txn| {
                let rows: Vec<T> = txn.rows::<T>().cloned().collect();
                paginate(rows.into_iter(), request)
            })
            .await
    }

    /// Consume `token` and insert a new row, atomically.
    ///
    /// # Errors
    /// - [`ServiceError::InvalidToken`] / [`ServiceError::TokenAlreadyUsed`]
    /// - [`ServiceError::PersistenceFailure`] if the row breaks a column constraint;
    ///   the token stays unused.
    #[instrument(skip(self, token, params), fields(entity_type = T::NAME))]
    pub async fn create(&self, token: String, params: T::Create) -> Result<T, ServiceError> {
        debug!(?params, "Create");
        let row = self
            .store
            .transact(T::NAME, "create", move |txn| {
                ledger::create_with_token::<T>(txn, &token, params)
            })
            .await?;
        info!(id = row.id(), "Created");
        Ok(row)
    }

    /// Optimistic full replace. Returns the new version.
    #[instrument(skip(self, params), fields(entity_type = T::NAME))]
    pub async fn replace(
        &self,
        id: EntityId,
        expected: Version,
        params: T::Replace,
    ) -> Result<Version, ServiceError> {
        debug!(?params, "Replace");
        self.store
            .transact(T::NAME, "replace", move |txn| {
                guard::replace::<T>(txn, id, expected, params)
            })
            .await
    }

    /// Unconditional partial merge. The version does not move.
    #[instrument(skip(self, patch), fields(entity_type = T::NAME))]
    pub async fn patch(&self, id: EntityId, patch: T::Patch) -> Result<T, ServiceError> {
        debug!(?patch, "Patch");
        self.store
            .transact(T::NAME, "patch", move |txn| guard::patch::<T>(txn, id, patch))
            .await
    }

    #[instrument(skip(self), fields(entity_type = T::NAME))]
    pub async fn delete(&self, id: EntityId) -> Result<(), ServiceError> {
        self.store
            .transact(T::NAME, "delete", move |txn| {
                txn.remove::<T>(id)
                    .map(|_| ())
                    .ok_or_else(|| ServiceError::not_found::<T>(id))
            })
            .await
    }
}
