//! HTTP handlers and the glue shared between them.
//!
//! Every endpoint answers with JSON; failures use `{"detail": "..."}`.

use actix_multipart::form::MultipartFormConfig;
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::services::{ServiceError, ServiceResult};

pub mod auth;
pub mod categories;
pub mod products;
pub mod properties;
pub mod users;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub detail: &'a str,
}

pub fn error_response(status: StatusCode, detail: &str) -> HttpResponse {
    HttpResponse::build(status).json(ErrorBody { detail })
}

pub fn service_error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => error_response(
            StatusCode::FORBIDDEN,
            "You do not have permission to perform this action.",
        ),
        ServiceError::NotFound => error_response(StatusCode::NOT_FOUND, "Not found."),
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            error_response(StatusCode::BAD_REQUEST, &message)
        }
        ServiceError::Internal => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error.",
        ),
    }
}

/// Serializes a successful result with `status`, or maps the error.
pub fn json_response<T: Serialize>(status: StatusCode, result: ServiceResult<T>) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::build(status).json(body),
        Err(err) => service_error_response(err),
    }
}

/// Turns an extractor failure into a 400 with the usual error body.
fn bad_request<E>(err: E) -> actix_web::Error
where
    E: std::fmt::Display + std::fmt::Debug + 'static,
{
    let response = error_response(StatusCode::BAD_REQUEST, &err.to_string());
    InternalError::from_response(err, response).into()
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| bad_request(err))
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| bad_request(err))
}

pub fn multipart_config(total_limit: usize) -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(total_limit)
        .memory_limit(total_limit)
        .error_handler(|err, _req| bad_request(err))
}

/// Registers every API endpoint below `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/user")
                    .service(users::create_user)
                    .service(users::issue_token)
                    .service(users::list_users)
                    .service(users::get_user)
                    .service(users::get_profile)
                    .service(users::replace_profile)
                    .service(users::patch_profile)
                    .service(users::delete_profile)
                    .service(users::upload_profile_image),
            )
            .service(categories::list_categories)
            .service(categories::create_category)
            .service(categories::get_category)
            .service(categories::update_category)
            .service(categories::delete_category)
            .service(properties::list_properties)
            .service(properties::create_property)
            .service(properties::get_property)
            .service(properties::update_property)
            .service(properties::delete_property)
            .service(products::list_products)
            .service(products::create_product)
            .service(products::get_product)
            .service(products::update_product)
            .service(products::delete_product)
            .service(products::add_product_properties)
            .service(products::remove_product_property)
            .service(products::upload_product_image),
    );
}
