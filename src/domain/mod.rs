//! Domain entities and value objects shared by every layer.

pub mod auth;
pub mod category;
pub mod image;
pub mod product;
pub mod property;
pub mod types;
pub mod user;
