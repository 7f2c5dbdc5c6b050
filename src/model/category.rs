use crate::framework::{
    check_len, Entity, EntityId, Transaction, Version, Versioned, INITIAL_VERSION,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Product, NAME_MAX};

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    #[serde(skip)]
    pub version: Version,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
}

pub type CategoryReplace = CategoryCreate;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
}

impl Entity for Category {
    const NAME: &'static str = "Category";
    type Create = CategoryCreate;

    fn from_create(id: EntityId, params: CategoryCreate) -> Self {
        Self {
            id,
            name: params.name,
            version: INITIAL_VERSION,
        }
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn validate(&self) -> Result<(), String> {
        check_len("name", &self.name, NAME_MAX)
    }

    /// Detaches every product pointing at this category. Product versions are left
    /// alone; the detach is a side effect of the delete, not an edit.
    fn on_delete(&self, txn: &mut Transaction<'_>) {
        let members: Vec<EntityId> = txn
            .rows::<Product>()
            .filter(|product| product.category_id == Some(self.id))
            .map(|product| product.id)
            .collect();

        for product_id in &members {
            txn.update::<Product, _>(*product_id, |product| product.category_id = None);
        }
        debug!(category_id = self.id, detached = members.len(), "Detached products");
    }
}

impl Versioned for Category {
    type Replace = CategoryReplace;
    type Patch = CategoryPatch;

    fn version(&self) -> Version {
        self.version
    }

    fn version_mut(&mut self) -> &mut Version {
        &mut self.version
    }

    fn apply_replace(&mut self, params: CategoryReplace) {
        self.name = params.name;
    }

    fn apply_patch(&mut self, patch: CategoryPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
    }
}
