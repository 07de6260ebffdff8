use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{TypeConstraintError, UserEmail, UserName};

/// JSON body of `POST /user/create`.
#[derive(Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 5))]
    pub password: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterFormPayload {
    pub email: UserEmail,
    pub password: String,
    pub name: UserName,
}

/// JSON body of `POST /user/token`.
#[derive(Deserialize, Validate)]
pub struct TokenForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenFormPayload {
    pub email: UserEmail,
    pub password: String,
}

/// JSON body of `PUT /user/me`; email and name are required.
#[derive(Deserialize, Validate)]
pub struct ProfileForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 5))]
    pub password: Option<String>,
}

/// JSON body of `PATCH /user/me`; every field is optional.
#[derive(Deserialize, Validate, Default)]
pub struct PatchProfileForm {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 5))]
    pub password: Option<String>,
}

/// Validated profile changes shared by PUT and PATCH.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileFormPayload {
    pub email: Option<UserEmail>,
    pub name: Option<UserName>,
    pub password: Option<String>,
}

#[derive(Debug, Error)]
pub enum UserFormError {
    #[error("User form validation failed: {0}")]
    Validation(String),
    #[error("User form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for UserFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for UserFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<RegisterForm> for RegisterFormPayload {
    type Error = UserFormError;

    fn try_from(value: RegisterForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            email: UserEmail::new(value.email)?,
            password: value.password,
            name: UserName::new(value.name)?,
        })
    }
}

impl TryFrom<TokenForm> for TokenFormPayload {
    type Error = UserFormError;

    fn try_from(value: TokenForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            email: UserEmail::new(value.email)?,
            password: value.password,
        })
    }
}

impl TryFrom<ProfileForm> for ProfileFormPayload {
    type Error = UserFormError;

    fn try_from(value: ProfileForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            email: Some(UserEmail::new(value.email)?),
            name: Some(UserName::new(value.name)?),
            password: value.password,
        })
    }
}

impl TryFrom<PatchProfileForm> for ProfileFormPayload {
    type Error = UserFormError;

    fn try_from(value: PatchProfileForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            email: value.email.map(UserEmail::new).transpose()?,
            name: value.name.map(UserName::new).transpose()?,
            password: value.password,
        })
    }
}
