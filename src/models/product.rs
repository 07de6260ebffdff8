use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, UpdateProduct as DomainUpdateProduct,
};
use crate::domain::property::Property as DomainProperty;
use crate::domain::types::{
    ImagePath, ProductBrand, ProductDescription, ProductName, ProductPrice, ProductStock,
    TypeConstraintError,
};

/// Diesel model representing the `products` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Product {
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    pub description: String,
    pub brand: String,
    pub price_cents: i64,
    pub stock: i32,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Product`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub category_id: i32,
    pub name: String,
    pub description: String,
    pub brand: String,
    pub price_cents: i64,
    pub stock: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Changeset applied when editing a product.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct ProductChangeset {
    pub category_id: i32,
    pub name: String,
    pub description: String,
    pub brand: String,
    pub price_cents: i64,
    pub stock: i32,
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Converts the row into a domain product carrying `properties`.
    pub fn into_domain(
        self,
        properties: Vec<DomainProperty>,
    ) -> Result<DomainProduct, TypeConstraintError> {
        Ok(DomainProduct {
            id: self.id.try_into()?,
            category_id: self.category_id.try_into()?,
            name: ProductName::new(self.name)?,
            description: ProductDescription::new(self.description)?,
            brand: ProductBrand::new(self.brand)?,
            price: ProductPrice::from_cents(self.price_cents)?,
            stock: ProductStock::new(self.stock)?,
            image: self.image.map(ImagePath::new).transpose()?,
            properties,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<DomainNewProduct> for NewProduct {
    fn from(product: DomainNewProduct) -> Self {
        Self {
            category_id: product.category_id.get(),
            name: product.name.into_inner(),
            description: product.description.into_inner(),
            brand: product.brand.into_inner(),
            price_cents: product.price.cents(),
            stock: product.stock.get(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl ProductChangeset {
    pub fn new(product: &DomainUpdateProduct, updated_at: NaiveDateTime) -> Self {
        Self {
            category_id: product.category_id.get(),
            name: product.name.as_str().to_string(),
            description: product.description.as_str().to_string(),
            brand: product.brand.as_str().to_string(),
            price_cents: product.price.cents(),
            stock: product.stock.get(),
            updated_at,
        }
    }
}
