use std::cell::RefCell;

use chrono::{DateTime, NaiveDateTime};

use crate::domain::auth::AuthToken;
use crate::domain::category::{Category, NewCategory};
use crate::domain::product::{NewProduct, Product, UpdateProduct};
use crate::domain::property::{
    NewProperty, Property, ensure_distinct_property_names, ensure_unique_property,
};
use crate::domain::types::{
    AuthTokenKey, CategoryId, CategoryName, ImagePath, ProductId, PropertyId, UserEmail, UserId,
};
use crate::domain::user::{NewUser, UpdateUser, User, UserCredentials, UserOrdering};
use crate::repository::{
    CategoryReader, CategoryWriter, ProductListQuery, ProductReader, ProductWriter, PropertyReader,
    PropertyWriter, RepositoryError, RepositoryResult, UserListQuery, UserReader, UserWriter,
};

/// Fixed timestamp used for records created by the in-memory repository.
pub fn epoch() -> NaiveDateTime {
    DateTime::from_timestamp(0, 0).unwrap().naive_utc()
}

/// Simple in-memory repository used for unit tests.
#[derive(Default)]
pub struct TestRepository {
    categories: RefCell<Vec<Category>>,
    properties: RefCell<Vec<Property>>,
    products: RefCell<Vec<Product>>,
    users: RefCell<Vec<UserCredentials>>,
    tokens: RefCell<Vec<AuthToken>>,
    image_writes_fail: bool,
}

impl TestRepository {
    pub fn new(categories: Vec<Category>, properties: Vec<Property>, products: Vec<Product>) -> Self {
        Self {
            categories: RefCell::new(categories),
            properties: RefCell::new(properties),
            products: RefCell::new(products),
            ..Default::default()
        }
    }

    pub fn with_users(self, users: Vec<UserCredentials>) -> Self {
        *self.users.borrow_mut() = users;
        self
    }

    pub fn with_tokens(self, tokens: Vec<AuthToken>) -> Self {
        *self.tokens.borrow_mut() = tokens;
        self
    }

    /// Makes `set_product_image` and `set_user_image` fail as if the database
    /// went away.
    pub fn with_failing_image_writes(mut self) -> Self {
        self.image_writes_fail = true;
        self
    }

    fn check_image_write(&self) -> RepositoryResult<()> {
        if self.image_writes_fail {
            return Err(RepositoryError::Connection("database is locked".to_string()));
        }
        Ok(())
    }

    fn next_id(ids: impl Iterator<Item = i32>) -> i32 {
        ids.max().unwrap_or(0) + 1
    }
}

impl CategoryReader for TestRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        Ok(self.categories.borrow().clone())
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        Ok(self.categories.borrow().iter().find(|c| c.id == id).cloned())
    }
}

impl CategoryWriter for TestRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        let mut categories = self.categories.borrow_mut();
        if categories.iter().any(|c| c.name == category.name) {
            return Err(RepositoryError::ConstraintViolation(
                "already exists: categories.name".into(),
            ));
        }
        let id = Self::next_id(categories.iter().map(|c| c.id.get()));
        let created = Category {
            id: CategoryId::new(id)?,
            name: category.name.clone(),
            created_at: category.created_at,
        };
        categories.push(created.clone());
        Ok(created)
    }

    fn update_category(&self, id: CategoryId, name: &CategoryName) -> RepositoryResult<Category> {
        let mut categories = self.categories.borrow_mut();
        let category = categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        category.name = name.clone();
        Ok(category.clone())
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        let mut categories = self.categories.borrow_mut();
        let before = categories.len();
        categories.retain(|c| c.id != id);
        self.products.borrow_mut().retain(|p| p.category_id != id);
        Ok(before - categories.len())
    }
}

impl PropertyReader for TestRepository {
    fn list_properties(&self) -> RepositoryResult<Vec<Property>> {
        Ok(self.properties.borrow().clone())
    }

    fn get_property_by_id(&self, id: PropertyId) -> RepositoryResult<Option<Property>> {
        Ok(self.properties.borrow().iter().find(|p| p.id == id).cloned())
    }
}

impl PropertyWriter for TestRepository {
    fn create_property(&self, property: &NewProperty) -> RepositoryResult<Property> {
        let mut properties = self.properties.borrow_mut();
        ensure_unique_property(property, None, properties.iter())?;
        let id = Self::next_id(properties.iter().map(|p| p.id.get()));
        let created = Property {
            id: PropertyId::new(id)?,
            name: property.name.clone(),
            value: property.value.clone(),
        };
        properties.push(created.clone());
        Ok(created)
    }

    fn update_property(
        &self,
        id: PropertyId,
        property: &NewProperty,
    ) -> RepositoryResult<Property> {
        let mut properties = self.properties.borrow_mut();
        ensure_unique_property(property, Some(id), properties.iter())?;
        let existing = properties
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        existing.name = property.name.clone();
        existing.value = property.value.clone();
        Ok(existing.clone())
    }

    fn delete_property(&self, id: PropertyId) -> RepositoryResult<usize> {
        let mut properties = self.properties.borrow_mut();
        let before = properties.len();
        properties.retain(|p| p.id != id);
        for product in self.products.borrow_mut().iter_mut() {
            product.properties.retain(|p| p.id != id);
        }
        Ok(before - properties.len())
    }
}

impl ProductReader for TestRepository {
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>> {
        let mut items = self.products.borrow().clone();
        if let Some(category_id) = query.category_id {
            items.retain(|p| p.category_id == category_id);
        }
        Ok(items)
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        Ok(self.products.borrow().iter().find(|p| p.id == id).cloned())
    }
}

impl ProductWriter for TestRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        if self.get_category_by_id(product.category_id)?.is_none() {
            return Err(RepositoryError::ConstraintViolation(
                "references a missing record: products.category_id".into(),
            ));
        }
        let mut products = self.products.borrow_mut();
        let id = Self::next_id(products.iter().map(|p| p.id.get()));
        let created = Product {
            id: ProductId::new(id)?,
            category_id: product.category_id,
            name: product.name.clone(),
            description: product.description.clone(),
            brand: product.brand.clone(),
            price: product.price,
            stock: product.stock,
            image: None,
            properties: vec![],
            created_at: product.created_at,
            updated_at: product.updated_at,
        };
        products.push(created.clone());
        Ok(created)
    }

    fn update_product(&self, id: ProductId, update: &UpdateProduct) -> RepositoryResult<Product> {
        let mut products = self.products.borrow_mut();
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        product.category_id = update.category_id;
        product.name = update.name.clone();
        product.description = update.description.clone();
        product.brand = update.brand.clone();
        product.price = update.price;
        product.stock = update.stock;
        Ok(product.clone())
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize> {
        let mut products = self.products.borrow_mut();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(before - products.len())
    }

    fn add_product_properties(
        &self,
        id: ProductId,
        property_ids: &[PropertyId],
    ) -> RepositoryResult<Product> {
        let properties = self.properties.borrow();
        let mut additions = Vec::new();
        for property_id in property_ids {
            let property = properties
                .iter()
                .find(|p| p.id == *property_id)
                .ok_or_else(|| {
                    RepositoryError::ValidationError(format!("unknown property id(s): {property_id}"))
                })?;
            additions.push(property.clone());
        }

        let mut products = self.products.borrow_mut();
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;

        ensure_distinct_property_names(product.properties.iter().chain(additions.iter()))?;

        for property in additions {
            if !product.properties.iter().any(|p| p.id == property.id) {
                product.properties.push(property);
            }
        }
        Ok(product.clone())
    }

    fn remove_product_property(
        &self,
        id: ProductId,
        property_id: PropertyId,
    ) -> RepositoryResult<usize> {
        let mut products = self.products.borrow_mut();
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(0);
        };
        let before = product.properties.len();
        product.properties.retain(|p| p.id != property_id);
        Ok(before - product.properties.len())
    }

    fn set_product_image(&self, id: ProductId, image: &ImagePath) -> RepositoryResult<Product> {
        self.check_image_write()?;
        let mut products = self.products.borrow_mut();
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        product.image = Some(image.clone());
        Ok(product.clone())
    }
}

impl UserReader for TestRepository {
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<Vec<User>> {
        let mut items: Vec<User> = self.users.borrow().iter().map(|c| c.user.clone()).collect();
        match query.ordering {
            UserOrdering::Id => items.sort_by_key(|u| u.id),
            UserOrdering::CreatedAt => items.sort_by_key(|u| (u.created_at, u.id)),
            UserOrdering::CreatedAtDesc => {
                items.sort_by_key(|u| std::cmp::Reverse((u.created_at, u.id)))
            }
        }
        Ok(items)
    }

    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .borrow()
            .iter()
            .find(|c| c.user.id == id)
            .map(|c| c.user.clone()))
    }

    fn get_credentials_by_email(
        &self,
        email: &UserEmail,
    ) -> RepositoryResult<Option<UserCredentials>> {
        Ok(self
            .users
            .borrow()
            .iter()
            .find(|c| c.user.email == *email)
            .cloned())
    }

    fn get_user_by_token(&self, key: &str) -> RepositoryResult<Option<User>> {
        let tokens = self.tokens.borrow();
        let Some(token) = tokens.iter().find(|t| t.key == key) else {
            return Ok(None);
        };
        Ok(self
            .get_user_by_id(token.user_id)?
            .filter(|user| user.is_active))
    }
}

impl UserWriter for TestRepository {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        let mut users = self.users.borrow_mut();
        if users.iter().any(|c| c.user.email == user.email) {
            return Err(RepositoryError::ConstraintViolation(
                "already exists: users.email".into(),
            ));
        }
        let id = Self::next_id(users.iter().map(|c| c.user.id.get()));
        let created = User {
            id: UserId::new(id)?,
            email: user.email.clone(),
            name: user.name.clone(),
            image: None,
            is_active: true,
            is_staff: user.is_staff,
            created_at: user.created_at,
        };
        users.push(UserCredentials {
            user: created.clone(),
            password_hash: user.password_hash.clone(),
        });
        Ok(created)
    }

    fn update_user(&self, id: UserId, update: UpdateUser) -> RepositoryResult<User> {
        let mut users = self.users.borrow_mut();
        let credentials = users
            .iter_mut()
            .find(|c| c.user.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if let Some(email) = update.email {
            credentials.user.email = email;
        }
        if let Some(name) = update.name {
            credentials.user.name = name;
        }
        if let Some(password_hash) = update.password_hash {
            credentials.password_hash = password_hash;
        }
        Ok(credentials.user.clone())
    }

    fn delete_user(&self, id: UserId) -> RepositoryResult<usize> {
        let mut users = self.users.borrow_mut();
        let before = users.len();
        users.retain(|c| c.user.id != id);
        self.tokens.borrow_mut().retain(|t| t.user_id != id);
        Ok(before - users.len())
    }

    fn set_user_image(&self, id: UserId, image: &ImagePath) -> RepositoryResult<User> {
        self.check_image_write()?;
        let mut users = self.users.borrow_mut();
        let credentials = users
            .iter_mut()
            .find(|c| c.user.id == id)
            .ok_or(RepositoryError::NotFound)?;
        credentials.user.image = Some(image.clone());
        Ok(credentials.user.clone())
    }

    fn get_or_create_token(
        &self,
        user_id: UserId,
        candidate: &AuthTokenKey,
    ) -> RepositoryResult<AuthToken> {
        let mut tokens = self.tokens.borrow_mut();
        if let Some(token) = tokens.iter().find(|t| t.user_id == user_id) {
            return Ok(token.clone());
        }
        let token = AuthToken {
            key: candidate.clone(),
            user_id,
        };
        tokens.push(token.clone());
        Ok(token)
    }
}
