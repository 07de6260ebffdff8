//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs should carry these wrappers instead of raw primitives so that
//! identifiers, text values and numeric constraints are enforced at the
//! boundary.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use validator::ValidateEmail;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A numeric value required to be non-negative was negative.
    #[error("{0} must be zero or greater")]
    NegativeNumber(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// Email validation failed.
    #[error("{0} must be a valid email address")]
    InvalidEmail(&'static str),
    /// A price was not a decimal with at most two fractional digits.
    #[error("invalid price: {0}")]
    InvalidPrice(String),
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        Self::new_for_field(value, "value")
    }

    /// Same as [`Self::new`] but with field-specific error context.
    pub fn new_for_field<S: Into<String>>(
        value: S,
        field: &'static str,
    ) -> Result<Self, TypeConstraintError> {
        trim_and_require_non_empty(value, field).map(Self)
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new_for_field(value, $field)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }
    };
}

macro_rules! non_negative_i32_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Constructs a value that must be zero or greater.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value >= 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NegativeNumber($field))
                }
            }

            /// Returns the raw `i32` value.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(CategoryId, "Unique identifier for a category.", "category_id");
id_newtype!(ProductId, "Unique identifier for a product.", "product_id");
id_newtype!(PropertyId, "Unique identifier for a property.", "property_id");
id_newtype!(UserId, "Unique identifier for a user.", "user_id");

non_empty_string_newtype!(
    CategoryName,
    "Category name enforcing non-empty values.",
    "category name"
);
non_empty_string_newtype!(
    ProductName,
    "Product name enforcing non-empty values.",
    "product name"
);
non_empty_string_newtype!(
    ProductDescription,
    "Product description enforcing non-empty values.",
    "description"
);
non_empty_string_newtype!(
    ProductBrand,
    "Product brand enforcing non-empty values.",
    "brand"
);
non_empty_string_newtype!(
    PropertyName,
    "Property name such as `color`. Compared case-insensitively.",
    "property name"
);
non_empty_string_newtype!(
    PropertyValue,
    "Property value such as `red`.",
    "property value"
);
non_empty_string_newtype!(UserName, "Display name of a user.", "name");
non_empty_string_newtype!(
    ImagePath,
    "Storage path of an uploaded image, relative to the media root.",
    "image"
);
non_empty_string_newtype!(AuthTokenKey, "Opaque API token key.", "token");

non_negative_i32_newtype!(ProductStock, "Units of a product in stock.", "stock");

impl PropertyName {
    /// Case-folded form used for uniqueness checks and the `name_key` column.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    /// Whether two names collide when case is ignored.
    pub fn eq_ignore_case(&self, other: &PropertyName) -> bool {
        self.normalized() == other.normalized()
    }
}

impl PropertyValue {
    /// Case-folded form stored in the `value_key` column.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn eq_ignore_case(&self, other: &PropertyValue) -> bool {
        self.normalized() == other.normalized()
    }
}

/// Email address with the domain part lowercased.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct UserEmail(String);

impl UserEmail {
    /// Trims, validates and normalizes an email address.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "email")?;
        if !trimmed.validate_email() {
            return Err(TypeConstraintError::InvalidEmail("email"));
        }
        let normalized = match trimmed.rsplit_once('@') {
            Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
            None => trimmed,
        };
        Ok(Self(normalized))
    }

    /// Borrow the email as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for UserEmail {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for UserEmail {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Non-negative price with two fractional digits, held in minor units.
///
/// Serialized as a decimal string (`"100.99"`) so no precision is lost on the
/// wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductPrice(i64);

impl ProductPrice {
    /// Maximum number of digits before the decimal point.
    pub const MAX_WHOLE_DIGITS: usize = 8;

    /// Builds a price from minor units (cents).
    pub fn from_cents(cents: i64) -> Result<Self, TypeConstraintError> {
        if cents >= 0 {
            Ok(Self(cents))
        } else {
            Err(TypeConstraintError::NegativeNumber("price"))
        }
    }

    /// Parses a decimal string such as `"100.99"` or `"5"`.
    pub fn parse(value: &str) -> Result<Self, TypeConstraintError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(TypeConstraintError::EmptyString("price"));
        }
        if value.starts_with('-') {
            return Err(TypeConstraintError::NegativeNumber("price"));
        }

        let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
        let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if whole.is_empty() || !is_digits(whole) || !is_digits(fraction) {
            return Err(TypeConstraintError::InvalidPrice(value.to_string()));
        }
        if fraction.len() > 2 {
            return Err(TypeConstraintError::InvalidPrice(format!(
                "{value} has more than 2 decimal places"
            )));
        }
        let whole = whole.trim_start_matches('0');
        if whole.len() > Self::MAX_WHOLE_DIGITS {
            return Err(TypeConstraintError::InvalidPrice(format!(
                "{value} has more than {} digits before the decimal point",
                Self::MAX_WHOLE_DIGITS
            )));
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| TypeConstraintError::InvalidPrice(value.to_string()))?
        };
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().unwrap_or_default() * 10,
            _ => fraction.parse::<i64>().unwrap_or_default(),
        };

        Self::from_cents(whole * 100 + cents)
    }

    /// Returns the price in minor units.
    pub const fn cents(self) -> i64 {
        self.0
    }
}

impl Display for ProductPrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for ProductPrice {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ProductPrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProductPrice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_non_empty_strings() {
        let value = NonEmptyString::new("  product  ").unwrap();
        assert_eq!(value.as_str(), "product");
    }

    #[test]
    fn rejects_non_positive_ids() {
        let err = ProductId::new(0).unwrap_err();
        assert_eq!(err, TypeConstraintError::NonPositiveId("product_id"));
    }

    #[test]
    fn property_names_compare_ignoring_case() {
        let lower = PropertyName::new("fabric").unwrap();
        let upper = PropertyName::new("FABRIC").unwrap();
        assert!(lower.eq_ignore_case(&upper));
        assert_eq!(upper.normalized(), "fabric");
        assert_ne!(lower, upper);

        let cotton = PropertyValue::new("Cotton").unwrap();
        assert!(cotton.eq_ignore_case(&PropertyValue::new("COTTON").unwrap()));
        assert!(!cotton.eq_ignore_case(&PropertyValue::new("Linen").unwrap()));
    }

    #[test]
    fn parses_decimal_prices() {
        assert_eq!(ProductPrice::parse("100.99").unwrap().cents(), 10099);
        assert_eq!(ProductPrice::parse("5").unwrap().cents(), 500);
        assert_eq!(ProductPrice::parse("0.5").unwrap().cents(), 50);
        assert_eq!(ProductPrice::parse("007.05").unwrap().to_string(), "7.05");
    }

    #[test]
    fn rejects_malformed_prices() {
        assert_eq!(
            ProductPrice::parse("-1").unwrap_err(),
            TypeConstraintError::NegativeNumber("price")
        );
        assert!(ProductPrice::parse("1.999").is_err());
        assert!(ProductPrice::parse("abc").is_err());
        assert!(ProductPrice::parse(".5").is_err());
        assert!(ProductPrice::parse("123456789").is_err());
    }

    #[test]
    fn price_serializes_as_decimal_string() {
        let price = ProductPrice::parse("100.9").unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"100.90\"");
    }

    #[test]
    fn stock_rejects_negative_numbers() {
        assert_eq!(
            ProductStock::new(-1).unwrap_err(),
            TypeConstraintError::NegativeNumber("stock")
        );
    }

    #[test]
    fn email_domain_is_lowercased() {
        let email = UserEmail::new(" Jane@EXAMPLE.com ").unwrap();
        assert_eq!(email.as_str(), "Jane@example.com");
        assert_eq!(
            UserEmail::new("not-an-email").unwrap_err(),
            TypeConstraintError::InvalidEmail("email")
        );
    }
}
