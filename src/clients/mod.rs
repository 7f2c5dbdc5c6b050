//! Typed wrappers around [`StoreClient`](crate::framework::StoreClient).

pub mod category_client;
pub mod resource_client;
pub mod token_client;

pub use category_client::*;
pub use resource_client::*;
pub use token_client::*;

use crate::model::{Order, Product, User};

pub type UserClient = ResourceClient<User>;
pub type ProductClient = ResourceClient<Product>;
pub type OrderClient = ResourceClient<Order>;
