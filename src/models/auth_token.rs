use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::auth::AuthToken as DomainAuthToken;
use crate::domain::types::{AuthTokenKey, TypeConstraintError};

/// Diesel model representing the `auth_tokens` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::auth_tokens)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AuthToken {
    pub key: String,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
}

impl TryFrom<AuthToken> for DomainAuthToken {
    type Error = TypeConstraintError;

    fn try_from(token: AuthToken) -> Result<Self, Self::Error> {
        Ok(Self {
            key: AuthTokenKey::new(token.key)?,
            user_id: token.user_id.try_into()?,
        })
    }
}
