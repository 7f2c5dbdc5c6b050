use crate::framework::{check_len, Entity, EntityId, Version, Versioned, INITIAL_VERSION};
use serde::{Deserialize, Serialize};

use super::NAME_MAX;

/// Represents a registered user in the system.
///
/// See [`impl Versioned for User`](#impl-Versioned-for-User) for details on:
/// - Creation / replacement parameters ([`UserCreate`])
/// - Patch parameters ([`UserPatch`])
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub version: Version,
}

/// Payload for creating a user. `PUT` takes the same shape.
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
}

pub type UserReplace = UserCreate;

/// Payload for patching an existing user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Entity for User {
    const NAME: &'static str = "User";
    type Create = UserCreate;

    fn from_create(id: EntityId, params: UserCreate) -> Self {
        Self {
            id,
            name: params.name,
            email: params.email,
            version: INITIAL_VERSION,
        }
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn validate(&self) -> Result<(), String> {
        check_len("name", &self.name, NAME_MAX)?;
        check_len("email", &self.email, NAME_MAX)
    }
}

impl Versioned for User {
    type Replace = UserReplace;
    type Patch = UserPatch;

    fn version(&self) -> Version {
        self.version
    }

    fn version_mut(&mut self) -> &mut Version {
        &mut self.version
    }

    fn apply_replace(&mut self, params: UserReplace) {
        self.name = params.name;
        self.email = params.email;
    }

    /// # Fields Updated
    /// - `name`: User's display name
    /// - `email`: User's email address
    fn apply_patch(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
    }
}
