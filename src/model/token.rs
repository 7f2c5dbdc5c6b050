use crate::framework::{check_len, Entity, EntityId};

/// Longest token value the ledger accepts.
pub const TOKEN_VALUE_MAX: usize = 32;

/// A single-use creation credential. Not versioned: the only transition is
/// `used: false -> true`, made by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: EntityId,
    pub value: String,
    pub used: bool,
}

impl Entity for Token {
    const NAME: &'static str = "Token";
    type Create = String;

    fn from_create(id: EntityId, value: String) -> Self {
        Self {
            id,
            value,
            used: false,
        }
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn validate(&self) -> Result<(), String> {
        check_len("token", &self.value, TOKEN_VALUE_MAX)
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.value)
    }
}
