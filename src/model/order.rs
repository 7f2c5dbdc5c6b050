use crate::framework::{Entity, EntityId, Version, Versioned, INITIAL_VERSION};
use serde::{Deserialize, Serialize};

/// Represents a customer order: one user buying one product.
///
/// The referenced user and product are not checked; see the crate docs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: EntityId,
    pub user_id: EntityId,
    pub product_id: EntityId,
    #[serde(skip)]
    pub version: Version,
}

/// Payload for creating a new order. `PUT` takes the same shape.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreate {
    pub user_id: EntityId,
    pub product_id: EntityId,
}

pub type OrderReplace = OrderCreate;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPatch {
    pub user_id: Option<EntityId>,
    pub product_id: Option<EntityId>,
}

impl Entity for Order {
    const NAME: &'static str = "Order";
    type Create = OrderCreate;

    fn from_create(id: EntityId, params: OrderCreate) -> Self {
        Self {
            id,
            user_id: params.user_id,
            product_id: params.product_id,
            version: INITIAL_VERSION,
        }
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

impl Versioned for Order {
    type Replace = OrderReplace;
    type Patch = OrderPatch;

    fn version(&self) -> Version {
        self.version
    }

    fn version_mut(&mut self) -> &mut Version {
        &mut self.version
    }

    fn apply_replace(&mut self, params: OrderReplace) {
        self.user_id = params.user_id;
        self.product_id = params.product_id;
    }

    fn apply_patch(&mut self, patch: OrderPatch) {
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        if let Some(product_id) = patch.product_id {
            self.product_id = product_id;
        }
    }
}
