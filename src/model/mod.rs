//! Row types implementing the [`Entity`](crate::framework::Entity) trait.

pub mod category;
pub mod order;
pub mod product;
pub mod token;
pub mod user;

pub use category::*;
pub use order::*;
pub use product::*;
pub use token::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

/// Column width for names, emails and colors.
pub const NAME_MAX: usize = 50;

/// Deserializes a present field (even `null`) as `Some(..)`. Combine with
/// `#[serde(default)]` so an absent field stays `None`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_patch_tells_null_from_absent() {
        let absent: ProductPatch = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
        assert_eq!(absent.category_id, None);

        let cleared: ProductPatch = serde_json::from_str(r#"{"category_id":null}"#).unwrap();
        assert_eq!(cleared.category_id, Some(None));

        let moved: ProductPatch = serde_json::from_str(r#"{"category_id":4}"#).unwrap();
        assert_eq!(moved.category_id, Some(Some(4)));
    }

    #[test]
    fn test_entity_json_omits_version() {
        let user = User {
            id: 3,
            name: "Alice".into(),
            email: "alice@example.com".into(),
            version: 7,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 3, "name": "Alice", "email": "alice@example.com"})
        );
    }

    #[test]
    fn test_validate_enforces_column_width() {
        let mut product = Product {
            id: 1,
            name: "n".repeat(NAME_MAX),
            color: "red".into(),
            category_id: None,
            version: 1,
        };
        assert!(crate::framework::Entity::validate(&product).is_ok());
        product.name.push('!');
        assert!(crate::framework::Entity::validate(&product).is_err());
    }
}
