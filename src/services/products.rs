use crate::domain::auth::AuthenticatedUser;
use crate::domain::image::generate_product_image_path;
use crate::domain::product::Product;
use crate::domain::types::{CategoryId, ImagePath, ProductId, PropertyId};
use crate::forms::products::{AddPropertiesFormPayload, ProductFormPayload};
use crate::forms::uploads::ImageUpload;
use crate::repository::{CategoryReader, ProductListQuery, ProductReader, ProductWriter};
use crate::storage::ImageStorage;

use super::errors::repository_failure;
use super::{ServiceError, ServiceResult, discard_upload, ensure_staff};

/// Lists products, optionally restricted to one category.
///
/// An unknown category simply yields an empty list.
pub fn list_products<R>(category: Option<i32>, repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
{
    let mut query = ProductListQuery::default();
    if let Some(category) = category {
        match CategoryId::new(category) {
            Ok(category_id) => query = query.category(category_id),
            Err(_) => return Ok(vec![]),
        }
    }

    repo.list_products(query)
        .map_err(|e| repository_failure("list products", e))
}

pub fn get_product<R>(product_id: i32, repo: &R) -> ServiceResult<Product>
where
    R: ProductReader,
{
    let product_id = ProductId::new(product_id).map_err(|_| ServiceError::NotFound)?;

    match repo.get_product_by_id(product_id) {
        Ok(Some(product)) => Ok(product),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => Err(repository_failure("get product", e)),
    }
}

/// Rejects payloads pointing at a category that does not exist.
fn ensure_category_exists<R>(category_id: CategoryId, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader,
{
    match repo.get_category_by_id(category_id) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(ServiceError::Form(format!(
            "Invalid category id {category_id}: object does not exist."
        ))),
        Err(e) => Err(repository_failure("get category", e)),
    }
}

pub fn create_product<R>(
    payload: ProductFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Product>
where
    R: CategoryReader + ProductWriter,
{
    ensure_staff(user)?;
    ensure_category_exists(payload.category_id, repo)?;

    let created = repo
        .create_product(&payload.into_new_product())
        .map_err(|e| repository_failure("create product", e))?;

    log::info!("User {} created product {} ({})", user.id, created.id, created);
    Ok(created)
}

pub fn update_product<R>(
    product_id: i32,
    payload: ProductFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Product>
where
    R: CategoryReader + ProductWriter,
{
    ensure_staff(user)?;

    let product_id = ProductId::new(product_id).map_err(|_| ServiceError::NotFound)?;
    ensure_category_exists(payload.category_id, repo)?;

    repo.update_product(product_id, &payload.into_update())
        .map_err(|e| repository_failure("update product", e))
}

pub fn delete_product<R>(product_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: ProductWriter,
{
    ensure_staff(user)?;

    let product_id = ProductId::new(product_id).map_err(|_| ServiceError::NotFound)?;

    match repo.delete_product(product_id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => {
            log::info!("User {} deleted product {product_id}", user.id);
            Ok(())
        }
        Err(e) => Err(repository_failure("delete product", e)),
    }
}

/// Attaches properties to a product.
///
/// The whole request is rejected when the product would end up with two
/// properties whose names differ only by case; nothing is attached then.
pub fn add_product_properties<R>(
    product_id: i32,
    payload: AddPropertiesFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Product>
where
    R: ProductWriter,
{
    ensure_staff(user)?;

    let product_id = ProductId::new(product_id).map_err(|_| ServiceError::NotFound)?;

    repo.add_product_properties(product_id, &payload.property_ids)
        .map_err(|e| repository_failure("add product properties", e))
}

pub fn remove_product_property<R>(
    product_id: i32,
    property_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: ProductWriter,
{
    ensure_staff(user)?;

    let product_id = ProductId::new(product_id).map_err(|_| ServiceError::NotFound)?;
    let property_id = PropertyId::new(property_id).map_err(|_| ServiceError::NotFound)?;

    match repo.remove_product_property(product_id, property_id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => Err(repository_failure("remove product property", e)),
    }
}

/// Stores an uploaded product image under a fresh name and records its path.
pub fn upload_product_image<R, S>(
    product_id: i32,
    upload: ImageUpload,
    user: &AuthenticatedUser,
    repo: &R,
    storage: &S,
) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter,
    S: ImageStorage,
{
    ensure_staff(user)?;

    let product = get_product(product_id, repo)?;

    let image = ImagePath::new(generate_product_image_path(&upload.file_name))?;
    storage.save(image.as_str(), &upload.bytes).map_err(|e| {
        log::error!("Failed to store image for product {}: {e}", product.id);
        ServiceError::Internal
    })?;

    repo.set_product_image(product.id, &image).map_err(|e| {
        discard_upload(storage, image.as_str());
        repository_failure("set product image", e)
    })
}
