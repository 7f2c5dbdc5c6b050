use crate::error::ServiceError;
use crate::framework::{Entity, StoreClient};
use crate::model::Token;
use crate::protocol::ledger;
use tracing::{info, instrument};

/// Client for the token ledger.
#[derive(Clone)]
pub struct TokenClient {
    store: StoreClient,
}

impl TokenClient {
    pub fn new(store: StoreClient) -> Self {
        Self { store }
    }

    /// Issue a fresh unused token and return its value.
    #[instrument(skip(self))]
    pub async fn issue(&self) -> Result<String, ServiceError> {
        let value = self
            .store
            .transact(Token::NAME, "issue", |txn| {
                Ok::<_, ServiceError>(ledger::issue(txn))
            })
            .await?;
        info!("Token issued");
        Ok(value)
    }

    /// Look a token up by value without consuming it.
    #[instrument(skip(self, value))]
    pub async fn lookup(&self, value: &str) -> Result<Option<Token>, ServiceError> {
        let value = value.to_owned();
        self.store
            .transact(Token::NAME, "lookup", move |txn| {
                Ok(txn.find::<Token>(&value).cloned())
            })
            .await
    }
}
