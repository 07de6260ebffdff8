use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::property::Property;
use crate::domain::types::{
    CategoryId, ImagePath, ProductBrand, ProductDescription, ProductId, ProductName, ProductPrice,
    ProductStock,
};

/// A catalog product together with its attached properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub name: ProductName,
    pub description: ProductDescription,
    pub brand: ProductBrand,
    pub price: ProductPrice,
    pub stock: ProductStock,
    /// Storage path assigned by the last image upload.
    pub image: Option<ImagePath>,
    pub properties: Vec<Property>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Display for Product {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Information required to create a new [`Product`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct NewProduct {
    pub category_id: CategoryId,
    pub name: ProductName,
    pub description: ProductDescription,
    pub brand: ProductBrand,
    pub price: ProductPrice,
    pub stock: ProductStock,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Editable product fields.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct UpdateProduct {
    pub category_id: CategoryId,
    pub name: ProductName,
    pub description: ProductDescription,
    pub brand: ProductBrand,
    pub price: ProductPrice,
    pub stock: ProductStock,
}
