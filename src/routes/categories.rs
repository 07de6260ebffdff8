use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::domain::auth::AuthenticatedUser;
use crate::forms::categories::{CategoryForm, CategoryFormPayload};
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::categories::{
    create_category as create_category_service, delete_category as delete_category_service,
    get_category as get_category_service, list_categories as list_categories_service,
    update_category as update_category_service,
};

use super::{json_response, service_error_response};

#[get("/categories")]
pub async fn list_categories(repo: web::Data<DieselRepository>) -> impl Responder {
    json_response(StatusCode::OK, list_categories_service(repo.get_ref()))
}

#[post("/categories")]
pub async fn create_category(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CategoryForm>,
) -> impl Responder {
    let result = CategoryFormPayload::try_from(form)
        .map_err(ServiceError::from)
        .and_then(|payload| create_category_service(payload, &user, repo.get_ref()));
    json_response(StatusCode::CREATED, result)
}

#[get("/categories/{category_id}")]
pub async fn get_category(
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        StatusCode::OK,
        get_category_service(category_id.into_inner(), repo.get_ref()),
    )
}

#[put("/categories/{category_id}")]
pub async fn update_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CategoryForm>,
) -> impl Responder {
    let result = CategoryFormPayload::try_from(form)
        .map_err(ServiceError::from)
        .and_then(|payload| {
            update_category_service(category_id.into_inner(), payload, &user, repo.get_ref())
        });
    json_response(StatusCode::OK, result)
}

#[delete("/categories/{category_id}")]
pub async fn delete_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_category_service(category_id.into_inner(), &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => service_error_response(err),
    }
}
