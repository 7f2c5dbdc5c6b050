use crate::framework::{check_len, Entity, EntityId, Version, Versioned, INITIAL_VERSION};
use serde::{Deserialize, Serialize};

use super::{double_option, NAME_MAX};

/// Represents a product in the catalogue.
///
/// A product optionally belongs to a [`Category`](super::Category). Deleting the
/// category detaches the product (`category_id` becomes `None`) rather than
/// deleting it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub color: String,
    pub category_id: Option<EntityId>,
    #[serde(skip)]
    pub version: Version,
}

/// Payload for creating a product. `PUT` takes the same shape.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub color: String,
    pub category_id: Option<EntityId>,
}

pub type ProductReplace = ProductCreate;

/// Payload for patching a product.
///
/// `category_id` distinguishes "absent" (`None`) from "set to null" (`Some(None)`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<EntityId>>,
}

impl Entity for Product {
    const NAME: &'static str = "Product";
    type Create = ProductCreate;

    fn from_create(id: EntityId, params: ProductCreate) -> Self {
        Self {
            id,
            name: params.name,
            color: params.color,
            category_id: params.category_id,
            version: INITIAL_VERSION,
        }
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn validate(&self) -> Result<(), String> {
        check_len("name", &self.name, NAME_MAX)?;
        check_len("color", &self.color, NAME_MAX)
    }
}

impl Versioned for Product {
    type Replace = ProductReplace;
    type Patch = ProductPatch;

    fn version(&self) -> Version {
        self.version
    }

    fn version_mut(&mut self) -> &mut Version {
        &mut self.version
    }

    fn apply_replace(&mut self, params: ProductReplace) {
        self.name = params.name;
        self.color = params.color;
        self.category_id = params.category_id;
    }

    fn apply_patch(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
    }
}
