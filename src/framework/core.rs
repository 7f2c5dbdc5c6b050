//! # Store Actor
//!
//! This module defines the runtime half of the store.
//!
//! ## Key Types
//!
//! - [`StoreActor`]: owns [`Tables`] and executes jobs one at a time.
//! - [`StoreRequest`]: the messages the actor understands.
//! - [`Executor`]: the injected seam a [`StoreClient`] submits requests through.
//! - [`StoreClient`]: cloneable handle that turns closures into transactions.

use super::error::StoreError;
use super::transaction::{StoreStats, Tables, Transaction};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE MESSAGES
// =============================================================================

/// What a job reports back to the actor, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Committed { writes: usize },
    RolledBack { writes: usize },
}

/// A unit of work executed against the tables.
///
/// The job owns its transaction: it begins it, decides commit or rollback, and
/// delivers its own result through a channel it captured.
pub type Job = Box<dyn FnOnce(&mut Tables) -> Outcome + Send>;

/// Message sent to the [`StoreActor`].
pub enum StoreRequest {
    Execute {
        entity: &'static str,
        op: &'static str,
        job: Job,
    },
    Stats {
        respond_to: oneshot::Sender<StoreStats>,
    },
}

impl fmt::Debug for StoreRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Execute { entity, op, .. } => f
                .debug_struct("Execute")
                .field("entity", entity)
                .field("op", op)
                .finish_non_exhaustive(),
            Self::Stats { .. } => f.debug_struct("Stats").finish_non_exhaustive(),
        }
    }
}

// =============================================================================
// 2. THE SEAM
// =============================================================================

/// Where a [`StoreClient`] sends its requests.
///
/// The production implementation is the actor's channel. Tests can substitute their
/// own to simulate an unavailable store.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn submit(&self, request: StoreRequest) -> Result<(), StoreError>;
}

/// [`Executor`] backed by the actor's mpsc channel.
pub struct ChannelExecutor {
    sender: mpsc::Sender<StoreRequest>,
}

#[async_trait]
impl Executor for ChannelExecutor {
    async fn submit(&self, request: StoreRequest) -> Result<(), StoreError> {
        self.sender
            .send(request)
            .await
            .map_err(|_| StoreError::ActorClosed)
    }
}

// =============================================================================
// 3. THE ACTOR
// =============================================================================

/// The single owner of every table.
///
/// # Concurrency Model
/// Requests arrive over one channel and run to completion in arrival order. Two
/// transactions therefore never interleave, which gives serializable isolation
/// without a `Mutex` around the data. Callers still get full concurrency up to the
/// channel: many HTTP requests can be queued while one transaction runs.
pub struct StoreActor {
    receiver: mpsc::Receiver<StoreRequest>,
    tables: Tables,
}

impl StoreActor {
    /// Creates the actor and the first client handle.
    ///
    /// `buffer_size` bounds the queue; senders wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            tables: Tables::new(),
        };
        let client = StoreClient::new(Arc::new(ChannelExecutor { sender }));
        (actor, client)
    }

    /// Runs the event loop until every client has been dropped.
    pub async fn run(mut self) {
        info!("Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Execute { entity, op, job } => match job(&mut self.tables) {
                    Outcome::Committed { writes: 0 } => debug!(entity, op, "Read"),
                    Outcome::Committed { writes } => info!(entity, op, writes, "Committed"),
                    Outcome::RolledBack { writes: 0 } => debug!(entity, op, "Aborted"),
                    Outcome::RolledBack { writes } => {
                        warn!(entity, op, writes, "Rolled back")
                    }
                },
                StoreRequest::Stats { respond_to } => {
                    let _ = respond_to.send(self.tables.stats());
                }
            }
        }

        info!(rows = self.tables.stats().total(), "Store shutdown");
    }
}

// =============================================================================
// 4. THE CLIENT
// =============================================================================

/// Cloneable handle to the store.
#[derive(Clone)]
pub struct StoreClient {
    executor: Arc<dyn Executor>,
}

impl StoreClient {
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }

    /// Run `f` inside one transaction.
    ///
    /// If `f` returns `Ok` the transaction commits; a commit failure is converted
    /// into `E` and every write is reverted. If `f` returns `Err` the transaction
    /// rolls back and the error is passed through.
    pub async fn transact<R, E, F>(
        &self,
        entity: &'static str,
        op: &'static str,
        f: F,
    ) -> Result<R, E>
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<R, E> + Send + 'static,
        R: Send + 'static,
        E: From<StoreError> + Send + 'static,
    {
        let (respond_to, response) = oneshot::channel();
        let job: Job = Box::new(move |tables: &mut Tables| {
            let mut txn = Transaction::begin(tables);
            let (result, outcome) = match f(&mut txn) {
                Ok(value) => {
                    let writes = txn.writes();
                    match txn.commit() {
                        Ok(writes) => (Ok(value), Outcome::Committed { writes }),
                        Err(e) => {
                            warn!(entity, op, error = %e, "Commit failed");
                            (Err(E::from(e)), Outcome::RolledBack { writes })
                        }
                    }
                }
                Err(e) => {
                    let writes = txn.rollback();
                    (Err(e), Outcome::RolledBack { writes })
                }
            };
            let _ = respond_to.send(result);
            outcome
        });

        self.executor
            .submit(StoreRequest::Execute { entity, op, job })
            .await?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }

    /// Row counts per table.
    pub async fn stats(&self) -> Result<StoreStats, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.executor
            .submit(StoreRequest::Stats { respond_to })
            .await?;
        response.await.map_err(|_| StoreError::ActorDropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::entity::{check_len, Entity, EntityId};

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        id: EntityId,
        label: String,
        hits: u32,
    }

    impl Entity for Counter {
        const NAME: &'static str = "Counter";
        type Create = String;

        fn from_create(id: EntityId, label: String) -> Self {
            Self { id, label, hits: 0 }
        }

        fn id(&self) -> EntityId {
            self.id
        }

        fn validate(&self) -> Result<(), String> {
            check_len("label", &self.label, 4)
        }
    }

    struct ClosedExecutor;

    #[async_trait]
    impl Executor for ClosedExecutor {
        async fn submit(&self, _request: StoreRequest) -> Result<(), StoreError> {
            Err(StoreError::ActorClosed)
        }
    }

    #[tokio::test]
    async fn test_transactions_run_against_shared_tables() {
        let (actor, client) = StoreActor::new(8);
        let handle = tokio::spawn(actor.run());

        let created: Counter = client
            .transact("Counter", "create", |txn| {
                Ok::<_, StoreError>(txn.insert::<Counter>("a".into()))
            })
            .await
            .unwrap();
        assert_eq!(created.id, 1);

        let hits = client
            .transact("Counter", "hit", move |txn| {
                txn.update::<Counter, _>(created.id, |c| {
                    c.hits += 1;
                    c.hits
                })
                .ok_or(StoreError::ActorDropped)
            })
            .await
            .unwrap();
        assert_eq!(hits, 1);

        let stats = client.stats().await.unwrap();
        assert_eq!(stats.rows("Counter"), 1);

        drop(client);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_commit_failure_is_reported_and_reverted() {
        let (actor, client) = StoreActor::new(8);
        tokio::spawn(actor.run());

        let result = client
            .transact("Counter", "create", |txn| {
                txn.insert::<Counter>("ok".into());
                Ok::<_, StoreError>(txn.insert::<Counter>("too long".into()))
            })
            .await;
        assert!(matches!(result, Err(StoreError::Constraint { id: 2, .. })));
        assert_eq!(client.stats().await.unwrap().total(), 0);
    }

    #[tokio::test]
    async fn test_closed_executor_surfaces_actor_closed() {
        let client = StoreClient::new(Arc::new(ClosedExecutor));
        let result = client
            .transact("Counter", "get", |_txn| Ok::<_, StoreError>(()))
            .await;
        assert_eq!(result, Err(StoreError::ActorClosed));
        assert_eq!(client.stats().await, Err(StoreError::ActorClosed));
    }
}
