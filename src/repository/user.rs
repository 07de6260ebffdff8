use chrono::Utc;
use diesel::prelude::*;

use crate::domain::auth::AuthToken;
use crate::domain::types::{AuthTokenKey, ImagePath, UserEmail, UserId};
use crate::domain::user::{NewUser, UpdateUser, User, UserCredentials, UserOrdering};
use crate::models::auth_token::AuthToken as DbAuthToken;
use crate::models::user::{NewUser as DbNewUser, User as DbUser, UserChangeset};
use crate::repository::{
    DieselRepository, RepositoryError, RepositoryResult, UserListQuery, UserReader, UserWriter,
};

impl UserReader for DieselRepository {
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<Vec<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let items = users::table
            .select(DbUser::as_select())
            .into_boxed::<diesel::sqlite::Sqlite>();
        let items = match query.ordering {
            UserOrdering::Id => items.order(users::id.asc()),
            UserOrdering::CreatedAt => items.order((users::created_at.asc(), users::id.asc())),
            UserOrdering::CreatedAtDesc => {
                items.order((users::created_at.desc(), users::id.desc()))
            }
        };

        let items = items
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<User>, _>>()?;

        Ok(items)
    }

    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::id.eq(id.get()))
            .select(DbUser::as_select())
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(TryInto::try_into).transpose()?)
    }

    fn get_credentials_by_email(
        &self,
        email: &UserEmail,
    ) -> RepositoryResult<Option<UserCredentials>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::email.eq(email.as_str()))
            .select(DbUser::as_select())
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(TryInto::try_into).transpose()?)
    }

    fn get_user_by_token(&self, key: &str) -> RepositoryResult<Option<User>> {
        use crate::schema::{auth_tokens, users};

        let mut conn = self.conn()?;

        let user = users::table
            .inner_join(auth_tokens::table)
            .filter(auth_tokens::key.eq(key))
            .filter(users::is_active.eq(true))
            .select(DbUser::as_select())
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(TryInto::try_into).transpose()?)
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user: DbNewUser = user.clone().into();

        let created = diesel::insert_into(users::table)
            .values(db_user)
            .returning(DbUser::as_returning())
            .get_result::<DbUser>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_user(&self, id: UserId, update: UpdateUser) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let updated = diesel::update(users::table.filter(users::id.eq(id.get())))
            .set(UserChangeset::from(update))
            .returning(DbUser::as_returning())
            .get_result::<DbUser>(&mut conn)
            .optional()?
            .ok_or(RepositoryError::NotFound)?;

        Ok(updated.try_into()?)
    }

    fn delete_user(&self, id: UserId) -> RepositoryResult<usize> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let affected =
            diesel::delete(users::table.filter(users::id.eq(id.get()))).execute(&mut conn)?;

        Ok(affected)
    }

    fn set_user_image(&self, id: UserId, image: &ImagePath) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let updated = diesel::update(users::table.filter(users::id.eq(id.get())))
            .set(users::image.eq(Some(image.as_str())))
            .returning(DbUser::as_returning())
            .get_result::<DbUser>(&mut conn)
            .optional()?
            .ok_or(RepositoryError::NotFound)?;

        Ok(updated.try_into()?)
    }

    fn get_or_create_token(
        &self,
        user_id: UserId,
        candidate: &AuthTokenKey,
    ) -> RepositoryResult<AuthToken> {
        use crate::schema::auth_tokens;

        let mut conn = self.conn()?;

        let token = conn.transaction::<_, RepositoryError, _>(|conn| {
            let existing = auth_tokens::table
                .filter(auth_tokens::user_id.eq(user_id.get()))
                .select(DbAuthToken::as_select())
                .first::<DbAuthToken>(conn)
                .optional()?;

            match existing {
                Some(token) => Ok(token),
                None => Ok(diesel::insert_into(auth_tokens::table)
                    .values(DbAuthToken {
                        key: candidate.as_str().to_string(),
                        user_id: user_id.get(),
                        created_at: Utc::now().naive_utc(),
                    })
                    .returning(DbAuthToken::as_returning())
                    .get_result::<DbAuthToken>(conn)?),
            }
        })?;

        Ok(token.try_into()?)
    }
}
