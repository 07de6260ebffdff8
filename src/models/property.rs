use diesel::prelude::*;

use crate::domain::property::{NewProperty as DomainNewProperty, Property as DomainProperty};
use crate::domain::types::{PropertyName, PropertyValue, TypeConstraintError};

/// Diesel model representing the `properties` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::properties)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Property {
    pub id: i32,
    pub name: String,
    pub value: String,
    pub name_key: String,
    pub value_key: String,
}

/// Insertable/patchable form of [`Property`].
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::properties)]
pub struct NewProperty {
    pub name: String,
    pub value: String,
    pub name_key: String,
    pub value_key: String,
}

/// Row of the `product_properties` join table.
#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::product_properties)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProductProperty {
    pub product_id: i32,
    pub property_id: i32,
}

impl TryFrom<Property> for DomainProperty {
    type Error = TypeConstraintError;

    fn try_from(property: Property) -> Result<Self, Self::Error> {
        Ok(Self {
            id: property.id.try_into()?,
            name: PropertyName::new(property.name)?,
            value: PropertyValue::new(property.value)?,
        })
    }
}

impl From<&DomainNewProperty> for NewProperty {
    fn from(property: &DomainNewProperty) -> Self {
        Self {
            name: property.name.as_str().to_string(),
            value: property.value.as_str().to_string(),
            name_key: property.name.normalized(),
            value_key: property.value.normalized(),
        }
    }
}
