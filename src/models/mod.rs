//! Diesel row types and their conversions into domain entities.

pub mod auth_token;
pub mod category;
pub mod config;
pub mod product;
pub mod property;
pub mod user;
