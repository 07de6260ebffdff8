use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ImagePath, UserEmail, UserId, UserName};

/// Registered account. The password hash never leaves the repository layer
/// except through [`UserCredentials`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: UserEmail,
    pub name: UserName,
    pub image: Option<ImagePath>,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: NaiveDateTime,
}

/// A user paired with the stored password hash, used only for login.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Data required to insert a new [`User`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: UserEmail,
    pub name: UserName,
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: NaiveDateTime,
}

/// Partial profile update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateUser {
    pub email: Option<UserEmail>,
    pub name: Option<UserName>,
    pub password_hash: Option<String>,
}

impl UpdateUser {
    /// Whether the update carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none() && self.password_hash.is_none()
    }
}

/// Sort order accepted by the user list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserOrdering {
    #[default]
    Id,
    CreatedAt,
    CreatedAtDesc,
}

impl UserOrdering {
    /// Parses a comma separated `ordering` parameter.
    ///
    /// Unknown fields are ignored; the first recognised field wins.
    pub fn from_param(param: &str) -> Self {
        param
            .split(',')
            .map(str::trim)
            .find_map(|field| match field {
                "created_at" => Some(Self::CreatedAt),
                "-created_at" => Some(Self::CreatedAtDesc),
                _ => None,
            })
            .unwrap_or_default()
    }
}
