use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::property::NewProperty;
use crate::domain::types::{PropertyName, PropertyValue, TypeConstraintError};

/// JSON body accepted when creating or editing a property.
#[derive(Deserialize, Validate)]
pub struct PropertyForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyFormPayload {
    pub name: PropertyName,
    pub value: PropertyValue,
}

impl PropertyFormPayload {
    pub fn into_new_property(self) -> NewProperty {
        NewProperty {
            name: self.name,
            value: self.value,
        }
    }
}

#[derive(Debug, Error)]
pub enum PropertyFormError {
    #[error("Property form validation failed: {0}")]
    Validation(String),
    #[error("Property form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for PropertyFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for PropertyFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<PropertyForm> for PropertyFormPayload {
    type Error = PropertyFormError;

    fn try_from(value: PropertyForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: PropertyName::new(value.name)?,
            value: PropertyValue::new(value.value)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_name_case() {
        let form = PropertyForm {
            name: "Fabric".to_string(),
            value: " Cotton ".to_string(),
        };
        let payload: PropertyFormPayload = form.try_into().unwrap();
        assert_eq!(payload.name.as_str(), "Fabric");
        assert_eq!(payload.value.as_str(), "Cotton");
    }

    #[test]
    fn rejects_empty_value() {
        let form = PropertyForm {
            name: "color".to_string(),
            value: String::new(),
        };
        let payload: Result<PropertyFormPayload, _> = form.try_into();
        assert!(matches!(payload, Err(PropertyFormError::Validation(_))));
    }
}
