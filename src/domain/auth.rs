use serde::Serialize;

use crate::domain::types::{AuthTokenKey, UserId};
use crate::domain::user::User;

/// Identity resolved from an `Authorization: Token <key>` header.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: String,
    pub is_staff: bool,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.to_string(),
            is_staff: user.is_staff,
        }
    }
}

/// API token owned by a single user.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AuthToken {
    pub key: AuthTokenKey,
    pub user_id: UserId,
}
