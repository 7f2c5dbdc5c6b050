//! # Composite Category Patch
//!
//! Renames a category and any number of its products in one transaction. Product
//! ids that do not exist are skipped, not reported as errors. Whether the category
//! and products all change or none do is decided by the single commit.

use crate::error::ServiceError;
use crate::framework::{EntityId, Transaction};
use crate::model::{Category, CategoryPatch, Product};
use serde::Deserialize;
use tracing::debug;

use super::guard;

/// One entry of the nested `products` array.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRename {
    pub id: EntityId,
    pub name: String,
}

/// Body of `PATCH /categories/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompositePatch {
    pub name: Option<String>,
    pub products: Option<Vec<ProductRename>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeOutcome {
    pub category: Category,
    pub renamed: usize,
    pub skipped: Vec<EntityId>,
}

pub fn apply(
    txn: &mut Transaction<'_>,
    category_id: EntityId,
    patch: CompositePatch,
) -> Result<CompositeOutcome, ServiceError> {
    let category = guard::patch::<Category>(
        txn,
        category_id,
        CategoryPatch { name: patch.name },
    )?;

    let mut renamed = 0;
    let mut skipped = Vec::new();
    for rename in patch.products.unwrap_or_default() {
        let ProductRename { id, name } = rename;
        match txn.update::<Product, _>(id, |product| product.name = name) {
            Some(()) => renamed += 1,
            None => skipped.push(id),
        }
    }

    if !skipped.is_empty() {
        debug!(category_id, ?skipped, "Skipped missing products");
    }

    Ok(CompositeOutcome {
        category,
        renamed,
        skipped,
    })
}
