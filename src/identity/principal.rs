use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::User;

/// The resolved caller identity the access guard injects into protected
/// handlers. Carries no credential material.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self { user_id: user.id, name: user.name.clone(), email: user.email.clone() }
    }
}
