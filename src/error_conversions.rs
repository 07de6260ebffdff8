//! Conversions from form and domain errors into [`ServiceError`].
//!
//! Kept outside the domain and forms modules so those stay free of service
//! layer types.

use crate::domain::types::TypeConstraintError;
use crate::forms::categories::CategoryFormError;
use crate::forms::products::{AddPropertiesFormError, ProductFormError};
use crate::forms::properties::PropertyFormError;
use crate::forms::uploads::ImageUploadFormError;
use crate::forms::users::UserFormError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<CategoryFormError> for ServiceError {
    fn from(val: CategoryFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<PropertyFormError> for ServiceError {
    fn from(val: PropertyFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<ProductFormError> for ServiceError {
    fn from(val: ProductFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<AddPropertiesFormError> for ServiceError {
    fn from(val: AddPropertiesFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<UserFormError> for ServiceError {
    fn from(val: UserFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<ImageUploadFormError> for ServiceError {
    fn from(val: ImageUploadFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_errors_keep_their_message() {
        let err: ServiceError = ImageUploadFormError::NotAnImage.into();
        assert!(matches!(err, ServiceError::Form(msg) if msg.contains("not an image")));

        let err: ServiceError = TypeConstraintError::EmptyString("name").into();
        assert_eq!(err, ServiceError::TypeConstraint("name cannot be empty".into()));
    }
}
