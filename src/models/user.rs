use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{ImagePath, TypeConstraintError, UserEmail, UserName};
use crate::domain::user::{
    NewUser as DomainNewUser, UpdateUser as DomainUpdateUser, User as DomainUser, UserCredentials,
};

/// Diesel model representing the `users` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub image: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`User`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: NaiveDateTime,
}

/// Partial update; `None` fields are skipped by Diesel.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::users)]
pub struct UserChangeset {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: user.id.try_into()?,
            email: UserEmail::new(user.email)?,
            name: UserName::new(user.name)?,
            image: user.image.map(ImagePath::new).transpose()?,
            is_active: user.is_active,
            is_staff: user.is_staff,
            created_at: user.created_at,
        })
    }
}

impl TryFrom<User> for UserCredentials {
    type Error = TypeConstraintError;

    fn try_from(mut user: User) -> Result<Self, Self::Error> {
        let password_hash = std::mem::take(&mut user.password_hash);
        Ok(Self {
            user: user.try_into()?,
            password_hash,
        })
    }
}

impl From<DomainNewUser> for NewUser {
    fn from(user: DomainNewUser) -> Self {
        Self {
            email: user.email.into_inner(),
            name: user.name.into_inner(),
            password_hash: user.password_hash,
            is_staff: user.is_staff,
            created_at: user.created_at,
        }
    }
}

impl From<DomainUpdateUser> for UserChangeset {
    fn from(update: DomainUpdateUser) -> Self {
        Self {
            email: update.email.map(UserEmail::into_inner),
            name: update.name.map(UserName::into_inner),
            password_hash: update.password_hash,
        }
    }
}
