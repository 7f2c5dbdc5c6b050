//! # Entity Traits
//!
//! Every row kind the store manages implements [`Entity`]. Rows that take part in
//! optimistic concurrency control additionally implement [`Versioned`].
//!
//! # Architecture Note
//! The store never names a concrete type. It keeps one [`Table`](super::Table) per
//! `Entity` implementor and drives all of them through these two traits, so adding a
//! fifth resource is a model change only.
//!
//! We use associated types (`Create`, `Replace`, `Patch`) for the payloads. A `User`
//! replace requires a `UserReplace`; handing it a `ProductReplace` does not compile.

use super::transaction::Transaction;
use std::fmt::Debug;

/// Row identifier. Assigned by the owning table, starting at 1, never reused.
pub type EntityId = u64;

/// Optimistic concurrency counter.
pub type Version = u64;

/// Version every [`Versioned`] row starts at.
pub const INITIAL_VERSION: Version = 1;

/// A row kind stored in its own table.
///
/// # Provided Methods (Hooks)
/// - [`Entity::validate`] runs at commit time for every row the transaction touched.
///   Returning `Err` fails the commit and rolls the whole transaction back.
/// - [`Entity::on_delete`] runs inside the deleting transaction, just before the row
///   is removed. Use it to fix up dependent rows.
/// - [`Entity::unique_key`] names a unique column. The owning table keeps a value
///   index over it so [`Transaction::find`] is a hash lookup.
///
/// All three default to doing nothing.
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    /// Human readable kind, used in logs and error messages (e.g. `"User"`).
    const NAME: &'static str;

    /// The data required to create a new row.
    type Create: Debug + Send + 'static;

    /// Build the row from its freshly allocated id and the creation payload.
    fn from_create(id: EntityId, params: Self::Create) -> Self;

    fn id(&self) -> EntityId;

    /// Column constraints checked at commit.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Called inside the deleting transaction before the row is removed.
    fn on_delete(&self, _txn: &mut Transaction<'_>) {}

    /// Value of the indexed unique column, if this kind has one.
    fn unique_key(&self) -> Option<&str> {
        None
    }
}

/// A row carrying a version counter.
///
/// The counter starts at [`INITIAL_VERSION`] and is only ever moved by a full replace.
/// Implementors apply payloads; they never touch the version themselves.
pub trait Versioned: Entity {
    /// Full replacement payload (every mutable field).
    type Replace: Debug + Send + 'static;

    /// Sparse payload; only present fields are applied.
    type Patch: Debug + Send + 'static;

    fn version(&self) -> Version;

    fn version_mut(&mut self) -> &mut Version;

    fn apply_replace(&mut self, params: Self::Replace);

    fn apply_patch(&mut self, patch: Self::Patch);
}

/// Column length check shared by the models.
pub fn check_len(column: &str, value: &str, max: usize) -> Result<(), String> {
    let len = value.chars().count();
    if len > max {
        return Err(format!("{column} is {len} characters, limit is {max}"));
    }
    Ok(())
}
