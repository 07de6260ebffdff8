use chrono::Utc;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewProduct, UpdateProduct};
use crate::domain::types::{
    CategoryId, ProductBrand, ProductDescription, ProductName, ProductPrice, ProductStock,
    PropertyId, TypeConstraintError,
};

/// JSON body accepted when creating or replacing a product.
///
/// `price` is a decimal such as `"100.99"` or `100.99`.
#[derive(Deserialize, Validate)]
pub struct ProductForm {
    #[validate(range(min = 1))]
    pub category: i32,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1, max = 255))]
    pub brand: String,
    #[serde(deserialize_with = "price_text")]
    pub price: String,
    #[validate(range(min = 0))]
    pub stock: i32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PriceInput {
    Text(String),
    Integer(i64),
    Float(f64),
}

/// Reads a price sent either as a JSON string or a JSON number.
///
/// Numbers are turned back into their shortest decimal form and parsed like
/// strings, so `100.99` and `"100.99"` give the same price.
fn price_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match PriceInput::deserialize(deserializer)? {
        PriceInput::Text(text) => text,
        PriceInput::Integer(whole) => whole.to_string(),
        PriceInput::Float(number) => number.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductFormPayload {
    pub category_id: CategoryId,
    pub name: ProductName,
    pub description: ProductDescription,
    pub brand: ProductBrand,
    pub price: ProductPrice,
    pub stock: ProductStock,
}

impl ProductFormPayload {
    pub fn into_new_product(self) -> NewProduct {
        let now = Utc::now().naive_utc();
        NewProduct {
            category_id: self.category_id,
            name: self.name,
            description: self.description,
            brand: self.brand,
            price: self.price,
            stock: self.stock,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_update(self) -> UpdateProduct {
        UpdateProduct {
            category_id: self.category_id,
            name: self.name,
            description: self.description,
            brand: self.brand,
            price: self.price,
            stock: self.stock,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProductFormError {
    #[error("Product form validation failed: {0}")]
    Validation(String),
    #[error("Product form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ProductFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ProductFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ProductForm> for ProductFormPayload {
    type Error = ProductFormError;

    fn try_from(value: ProductForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            category_id: CategoryId::new(value.category)?,
            name: ProductName::new(value.name)?,
            description: ProductDescription::new(value.description)?,
            brand: ProductBrand::new(value.brand)?,
            price: ProductPrice::parse(&value.price)?,
            stock: ProductStock::new(value.stock)?,
        })
    }
}

/// JSON body of `POST /products/{id}/properties`.
#[derive(Deserialize, Validate)]
pub struct AddPropertiesForm {
    #[validate(length(min = 1))]
    pub properties: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddPropertiesFormPayload {
    pub property_ids: Vec<PropertyId>,
}

#[derive(Debug, Error)]
pub enum AddPropertiesFormError {
    #[error("Add properties form validation failed: {0}")]
    Validation(String),
    #[error("Add properties form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AddPropertiesFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AddPropertiesFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<AddPropertiesForm> for AddPropertiesFormPayload {
    type Error = AddPropertiesFormError;

    fn try_from(value: AddPropertiesForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let property_ids = value
            .properties
            .into_iter()
            .map(PropertyId::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { property_ids })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> ProductForm {
        ProductForm {
            category: 1,
            name: "testname".to_string(),
            description: "some desc".to_string(),
            brand: "test brand".to_string(),
            price: "100.99".to_string(),
            stock: 100,
        }
    }

    #[test]
    fn parses_decimal_price() {
        let payload: ProductFormPayload = sample_form().try_into().unwrap();
        assert_eq!(payload.price.cents(), 10099);
        assert_eq!(payload.stock.get(), 100);
    }

    #[test]
    fn rejects_price_with_three_decimals() {
        let form = ProductForm {
            price: "1.005".to_string(),
            ..sample_form()
        };
        let payload: Result<ProductFormPayload, _> = form.try_into();
        assert!(matches!(payload, Err(ProductFormError::TypeConstraint(_))));
    }

    #[test]
    fn accepts_price_as_number_or_string() {
        let body = |price: serde_json::Value| {
            serde_json::json!({
                "category": 1,
                "name": "testname",
                "description": "some desc",
                "brand": "test brand",
                "price": price,
                "stock": 100,
            })
        };
        let cents = |price| {
            let form: ProductForm = serde_json::from_value(body(price)).unwrap();
            ProductFormPayload::try_from(form).map(|p| p.price.cents())
        };

        assert_eq!(cents(serde_json::json!(100.99)).unwrap(), 10099);
        assert_eq!(cents(serde_json::json!(12)).unwrap(), 1200);
        assert_eq!(cents(serde_json::json!("100.99")).unwrap(), 10099);
        assert!(cents(serde_json::json!(1.005)).is_err());
        assert!(serde_json::from_value::<ProductForm>(body(serde_json::json!(true))).is_err());
    }

    #[test]
    fn rejects_negative_stock() {
        let form = ProductForm {
            stock: -5,
            ..sample_form()
        };
        let payload: Result<ProductFormPayload, _> = form.try_into();
        assert!(matches!(payload, Err(ProductFormError::Validation(_))));
    }

    #[test]
    fn add_properties_requires_ids() {
        let empty = AddPropertiesForm { properties: vec![] };
        assert!(AddPropertiesFormPayload::try_from(empty).is_err());

        let form = AddPropertiesForm {
            properties: vec![1, 2],
        };
        let payload = AddPropertiesFormPayload::try_from(form).unwrap();
        assert_eq!(payload.property_ids.len(), 2);
    }
}
