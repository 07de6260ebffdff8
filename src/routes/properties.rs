use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::domain::auth::AuthenticatedUser;
use crate::forms::properties::{PropertyForm, PropertyFormPayload};
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::properties::{
    create_property as create_property_service, delete_property as delete_property_service,
    get_property as get_property_service, list_properties as list_properties_service,
    update_property as update_property_service,
};

use super::{json_response, service_error_response};

#[get("/properties")]
pub async fn list_properties(repo: web::Data<DieselRepository>) -> impl Responder {
    json_response(StatusCode::OK, list_properties_service(repo.get_ref()))
}

#[post("/properties")]
pub async fn create_property(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<PropertyForm>,
) -> impl Responder {
    let result = PropertyFormPayload::try_from(form)
        .map_err(ServiceError::from)
        .and_then(|payload| create_property_service(payload, &user, repo.get_ref()));
    json_response(StatusCode::CREATED, result)
}

#[get("/properties/{property_id}")]
pub async fn get_property(
    property_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        StatusCode::OK,
        get_property_service(property_id.into_inner(), repo.get_ref()),
    )
}

#[put("/properties/{property_id}")]
pub async fn update_property(
    property_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<PropertyForm>,
) -> impl Responder {
    let result = PropertyFormPayload::try_from(form)
        .map_err(ServiceError::from)
        .and_then(|payload| {
            update_property_service(property_id.into_inner(), payload, &user, repo.get_ref())
        });
    json_response(StatusCode::OK, result)
}

#[delete("/properties/{property_id}")]
pub async fn delete_property(
    property_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_property_service(property_id.into_inner(), &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => service_error_response(err),
    }
}
