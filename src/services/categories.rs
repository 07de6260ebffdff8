use crate::domain::auth::AuthenticatedUser;
use crate::domain::category::Category;
use crate::domain::types::CategoryId;
use crate::forms::categories::CategoryFormPayload;
use crate::repository::{CategoryReader, CategoryWriter};

use super::errors::repository_failure;
use super::{ServiceError, ServiceResult, ensure_staff};

pub fn list_categories<R>(repo: &R) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader,
{
    repo.list_categories()
        .map_err(|e| repository_failure("list categories", e))
}

pub fn get_category<R>(category_id: i32, repo: &R) -> ServiceResult<Category>
where
    R: CategoryReader,
{
    let category_id = CategoryId::new(category_id).map_err(|_| ServiceError::NotFound)?;

    match repo.get_category_by_id(category_id) {
        Ok(Some(category)) => Ok(category),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => Err(repository_failure("get category", e)),
    }
}

pub fn create_category<R>(
    payload: CategoryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Category>
where
    R: CategoryWriter,
{
    ensure_staff(user)?;

    let category = payload.into_new_category();
    let created = repo
        .create_category(&category)
        .map_err(|e| repository_failure("create category", e))?;

    log::info!("User {} created category {}", user.id, created);
    Ok(created)
}

pub fn update_category<R>(
    category_id: i32,
    payload: CategoryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Category>
where
    R: CategoryWriter,
{
    ensure_staff(user)?;

    let category_id = CategoryId::new(category_id).map_err(|_| ServiceError::NotFound)?;

    repo.update_category(category_id, &payload.name)
        .map_err(|e| repository_failure("update category", e))
}

/// Deletes a category; its products go with it.
pub fn delete_category<R>(category_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: CategoryWriter,
{
    ensure_staff(user)?;

    let category_id = CategoryId::new(category_id).map_err(|_| ServiceError::NotFound)?;

    match repo.delete_category(category_id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => {
            log::info!("User {} deleted category {category_id}", user.id);
            Ok(())
        }
        Err(e) => Err(repository_failure("delete category", e)),
    }
}
