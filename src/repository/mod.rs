use crate::db::{DbConnection, DbPool};
use crate::domain::auth::AuthToken;
use crate::domain::category::{Category, NewCategory};
use crate::domain::product::{NewProduct, Product, UpdateProduct};
use crate::domain::property::{NewProperty, Property};
use crate::domain::types::{
    AuthTokenKey, CategoryId, CategoryName, ImagePath, ProductId, PropertyId, UserEmail, UserId,
};
use crate::domain::user::{NewUser, UpdateUser, User, UserCredentials, UserOrdering};

pub mod category;
pub mod errors;
pub mod product;
pub mod property;
#[cfg(test)]
pub mod test;
pub mod user;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters used when listing products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Restrict to products of one category.
    pub category_id: Option<CategoryId>,
}

impl ProductListQuery {
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Query parameters used when listing users.
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub ordering: UserOrdering,
}

impl UserListQuery {
    pub fn ordering(mut self, ordering: UserOrdering) -> Self {
        self.ordering = ordering;
        self
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List all categories ordered by name.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Rename a category.
    fn update_category(&self, id: CategoryId, name: &CategoryName) -> RepositoryResult<Category>;
    /// Delete a category together with its products.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for property entities.
pub trait PropertyReader {
    /// List all properties ordered by name.
    fn list_properties(&self) -> RepositoryResult<Vec<Property>>;
    /// Retrieve a property by its identifier.
    fn get_property_by_id(&self, id: PropertyId) -> RepositoryResult<Option<Property>>;
}

/// Write operations for property entities.
///
/// Implementations reject a name and value pair that collides
/// case-insensitively with another property.
pub trait PropertyWriter {
    /// Persist a new property.
    fn create_property(&self, property: &NewProperty) -> RepositoryResult<Property>;
    /// Replace the name and value of a property.
    fn update_property(&self, id: PropertyId, property: &NewProperty)
    -> RepositoryResult<Property>;
    /// Delete a property, detaching it from every product.
    fn delete_property(&self, id: PropertyId) -> RepositoryResult<usize>;
}

/// Read-only operations for product entities.
pub trait ProductReader {
    /// List products matching the supplied query parameters.
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;
    /// Retrieve a product by its identifier.
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
}

/// Write operations for product entities and their property associations.
pub trait ProductWriter {
    /// Persist a new product without properties.
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product>;
    /// Replace the editable fields of a product.
    fn update_product(&self, id: ProductId, product: &UpdateProduct) -> RepositoryResult<Product>;
    /// Delete a product.
    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize>;
    /// Attach properties to a product.
    ///
    /// Fails with [`RepositoryError::ValidationError`] when the resulting set
    /// would hold two properties whose names only differ by case.
    fn add_product_properties(
        &self,
        id: ProductId,
        property_ids: &[PropertyId],
    ) -> RepositoryResult<Product>;
    /// Detach a single property from a product.
    fn remove_product_property(
        &self,
        id: ProductId,
        property_id: PropertyId,
    ) -> RepositoryResult<usize>;
    /// Store the path of a freshly uploaded product image.
    fn set_product_image(&self, id: ProductId, image: &ImagePath) -> RepositoryResult<Product>;
}

/// Read-only operations for user entities.
pub trait UserReader {
    /// List users in the requested order.
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<Vec<User>>;
    /// Retrieve a user by its identifier.
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    /// Retrieve a user with its password hash for login.
    fn get_credentials_by_email(
        &self,
        email: &UserEmail,
    ) -> RepositoryResult<Option<UserCredentials>>;
    /// Resolve the active user owning an API token.
    fn get_user_by_token(&self, key: &str) -> RepositoryResult<Option<User>>;
}

/// Write operations for user entities and their API tokens.
pub trait UserWriter {
    /// Persist a new user.
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User>;
    /// Apply a partial profile update.
    fn update_user(&self, id: UserId, update: UpdateUser) -> RepositoryResult<User>;
    /// Delete a user and its token.
    fn delete_user(&self, id: UserId) -> RepositoryResult<usize>;
    /// Store the path of a freshly uploaded profile image.
    fn set_user_image(&self, id: UserId, image: &ImagePath) -> RepositoryResult<User>;
    /// Return the user's token, storing `candidate` if it has none yet.
    fn get_or_create_token(
        &self,
        user_id: UserId,
        candidate: &AuthTokenKey,
    ) -> RepositoryResult<AuthToken>;
}
