//! # Tables & Transactions
//!
//! [`Tables`] is the whole database: one [`Table`] per [`Entity`] type, keyed by
//! `TypeId`. It is owned by the [`StoreActor`](super::StoreActor) and never shared.
//!
//! A [`Transaction`] borrows the tables mutably for the duration of one job. Every
//! write pushes an inverse operation onto an undo journal and records the touched row
//! for commit-time validation.
//!
//! - **Commit** validates every touched row. A constraint violation replays the
//!   journal and reports [`StoreError::Constraint`].
//! - **Rollback** replays the journal in reverse.
//! - **Drop** without commit rolls back.
//!
//! Since the actor runs one transaction at a time, nothing else can observe a
//! half-applied journal.

use super::entity::{Entity, EntityId};
use super::error::StoreError;
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;

// =============================================================================
// 1. TABLES
// =============================================================================

/// Rows of one entity type, ordered by id, plus the [`Entity::unique_key`] index.
#[derive(Debug)]
pub struct Table<T> {
    rows: BTreeMap<EntityId, T>,
    unique: HashMap<String, EntityId>,
    next_id: EntityId,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            unique: HashMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl<T: Entity> Table<T> {
    /// Row whose unique key equals `key`.
    pub fn find(&self, key: &str) -> Option<&T> {
        self.unique.get(key).and_then(|id| self.rows.get(id))
    }

    /// Store `row` under `id`, replacing and returning any previous row. Every row
    /// write goes through here or [`Table::take`] so the index never drifts.
    fn put(&mut self, id: EntityId, row: T) -> Option<T> {
        let previous = self.take(id);
        if let Some(key) = row.unique_key() {
            self.unique.insert(key.to_owned(), id);
        }
        self.rows.insert(id, row);
        previous
    }

    fn take(&mut self, id: EntityId) -> Option<T> {
        let row = self.rows.remove(&id)?;
        if let Some(key) = row.unique_key() {
            if self.unique.get(key) == Some(&id) {
                self.unique.remove(key);
            }
        }
        Some(row)
    }
}

/// Object-safe view of a `Table<T>` so heterogeneous tables share one map.
trait AnyTable: Send {
    fn name(&self) -> &'static str;
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Entity> AnyTable for Table<T> {
    fn name(&self) -> &'static str {
        T::NAME
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Every table in the store.
#[derive(Default)]
pub struct Tables {
    tables: HashMap<TypeId, Box<dyn AnyTable>>,
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access. `None` until the first row of `T` is written.
    pub fn table<T: Entity>(&self) -> Option<&Table<T>> {
        self.tables
            .get(&TypeId::of::<T>())
            .and_then(|table| table.as_any().downcast_ref::<Table<T>>())
    }

    fn table_mut<T: Entity>(&mut self) -> &mut Table<T> {
        let table = self
            .tables
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Table::<T>::default()));
        match table.as_any_mut().downcast_mut::<Table<T>>() {
            Some(table) => table,
            None => unreachable!("table for {} registered under a foreign TypeId", T::NAME),
        }
    }

    /// Row count per table name.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            rows: self
                .tables
                .values()
                .map(|table| (table.name(), table.len()))
                .collect(),
        }
    }
}

/// Snapshot of row counts, keyed by [`Entity::NAME`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub rows: BTreeMap<&'static str, usize>,
}

impl StoreStats {
    /// Row count for one table (0 if it was never written).
    pub fn rows(&self, name: &str) -> usize {
        self.rows.get(name).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.rows.values().sum()
    }
}

// =============================================================================
// 2. TRANSACTION
// =============================================================================

type Undo = Box<dyn FnOnce(&mut Tables) + Send>;
type RowCheck = fn(&Tables, EntityId) -> Result<(), StoreError>;

fn check_row<T: Entity>(tables: &Tables, id: EntityId) -> Result<(), StoreError> {
    match tables.table::<T>().and_then(|table| table.get(id)) {
        Some(row) => row.validate().map_err(|reason| StoreError::Constraint {
            entity: T::NAME,
            id,
            reason,
        }),
        // Removed later in the same transaction.
        None => Ok(()),
    }
}

/// The scope a job runs in. See the module docs for the commit protocol.
pub struct Transaction<'a> {
    tables: &'a mut Tables,
    undo: Vec<Undo>,
    touched: Vec<(RowCheck, EntityId)>,
}

impl<'a> Transaction<'a> {
    pub(crate) fn begin(tables: &'a mut Tables) -> Self {
        Self {
            tables,
            undo: Vec::new(),
            touched: Vec::new(),
        }
    }

    /// Number of journaled writes so far.
    pub fn writes(&self) -> usize {
        self.undo.len()
    }

    pub fn get<T: Entity>(&self, id: EntityId) -> Option<&T> {
        self.tables.table::<T>().and_then(|table| table.get(id))
    }

    /// All rows of `T` in ascending id order.
    pub fn rows<T: Entity>(&self) -> impl Iterator<Item = &T> {
        self.tables
            .table::<T>()
            .into_iter()
            .flat_map(|table| table.iter())
    }

    /// Row of `T` whose [`Entity::unique_key`] equals `key`.
    pub fn find<T: Entity>(&self, key: &str) -> Option<&T> {
        self.tables.table::<T>().and_then(|table| table.find(key))
    }

    pub fn count<T: Entity>(&self) -> usize {
        self.tables.table::<T>().map_or(0, |table| table.len())
    }

    /// Allocate an id, build the row and store it. Returns a copy of the new row.
    pub fn insert<T: Entity>(&mut self, params: T::Create) -> T {
        let table = self.tables.table_mut::<T>();
        let id = table.allocate_id();
        let row = T::from_create(id, params);
        table.put(id, row.clone());

        self.undo.push(Box::new(move |tables: &mut Tables| {
            tables.table_mut::<T>().take(id);
        }));
        self.touched.push((check_row::<T> as RowCheck, id));
        row
    }

    /// Conditional single-row write.
    ///
    /// `f` works on a copy of the current row and either mutates it and returns
    /// `Ok`, in which case the copy is stored, or returns `Err`, in which case the
    /// stored row is left as it was. The check and the write happen in one step
    /// against the same row, so there is no window between reading the condition
    /// and applying the change.
    ///
    /// Returns `None` if the row does not exist.
    pub fn try_update<T, R, E>(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Option<Result<R, E>>
    where
        T: Entity,
    {
        let table = self.tables.table_mut::<T>();
        let mut row = table.rows.get(&id)?.clone();
        let value = match f(&mut row) {
            Ok(value) => value,
            Err(e) => return Some(Err(e)),
        };
        let before = table.put(id, row)?;

        self.undo.push(Box::new(move |tables: &mut Tables| {
            tables.table_mut::<T>().put(id, before);
        }));
        self.touched.push((check_row::<T> as RowCheck, id));
        Some(Ok(value))
    }

    /// Unconditional single-row write. Returns `None` if the row does not exist.
    pub fn update<T, R>(&mut self, id: EntityId, f: impl FnOnce(&mut T) -> R) -> Option<R>
    where
        T: Entity,
    {
        self.try_update::<T, R, Infallible>(id, |row| Ok(f(row)))
            .map(|result| match result {
                Ok(value) => value,
                Err(never) => match never {},
            })
    }

    /// Remove a row, running its [`Entity::on_delete`] hook first.
    pub fn remove<T: Entity>(&mut self, id: EntityId) -> Option<T> {
        let row = self.get::<T>(id)?.clone();
        row.on_delete(self);

        let removed = self.tables.table_mut::<T>().take(id)?;
        let restore = removed.clone();
        self.undo.push(Box::new(move |tables: &mut Tables| {
            tables.table_mut::<T>().put(id, restore);
        }));
        Some(removed)
    }

    /// Validate every touched row and make the writes permanent.
    ///
    /// On a constraint violation the journal is replayed and the error returned.
    pub fn commit(mut self) -> Result<usize, StoreError> {
        let tables: &Tables = self.tables;
        let checked = self
            .touched
            .iter()
            .try_for_each(|(check, id)| check(tables, *id));

        if let Err(e) = checked {
            self.unwind();
            return Err(e);
        }

        let writes = self.undo.len();
        self.undo.clear();
        Ok(writes)
    }

    /// Undo every write. Returns how many writes were reverted.
    pub fn rollback(mut self) -> usize {
        self.unwind()
    }

    fn unwind(&mut self) -> usize {
        let reverted = self.undo.len();
        while let Some(undo) = self.undo.pop() {
            undo(self.tables);
        }
        self.touched.clear();
        reverted
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.undo.is_empty() {
            self.unwind();
        }
    }
}
