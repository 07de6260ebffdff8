//! Request payloads and their conversion into validated domain values.

pub mod categories;
pub mod products;
pub mod properties;
pub mod uploads;
pub mod users;
