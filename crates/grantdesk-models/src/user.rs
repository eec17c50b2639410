//! Authenticated identities.

use serde::{Deserialize, Serialize};

use crate::ids::UserId;
use crate::role::{Role, RoleSet};

/// A decoded, trusted identity as returned by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique identifier for the user.
    pub id: UserId,
    /// Contact email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Roles held by the user.
    #[serde(default)]
    pub roles: RoleSet,
}

impl Identity {
    /// Creates an identity with the given roles.
    pub fn new(
        id: impl Into<UserId>,
        name: impl Into<String>,
        email: impl Into<String>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            roles: roles.into_iter().collect(),
        }
    }
}
