use actix_multipart::form::MultipartForm;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use serde::Deserialize;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::products::{
    AddPropertiesForm, AddPropertiesFormPayload, ProductForm, ProductFormPayload,
};
use crate::forms::uploads::{ImageUpload, ImageUploadForm};
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::products::{
    add_product_properties as add_product_properties_service,
    create_product as create_product_service, delete_product as delete_product_service,
    get_product as get_product_service, list_products as list_products_service,
    remove_product_property as remove_product_property_service,
    update_product as update_product_service,
    upload_product_image as upload_product_image_service,
};
use crate::storage::MediaStorage;

use super::{json_response, service_error_response};

#[derive(Deserialize, Debug)]
struct ProductsQueryParams {
    category: Option<i32>,
}

#[get("/products")]
pub async fn list_products(
    params: web::Query<ProductsQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        StatusCode::OK,
        list_products_service(params.category, repo.get_ref()),
    )
}

#[post("/products")]
pub async fn create_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ProductForm>,
) -> impl Responder {
    let result = ProductFormPayload::try_from(form)
        .map_err(ServiceError::from)
        .and_then(|payload| create_product_service(payload, &user, repo.get_ref()));
    json_response(StatusCode::CREATED, result)
}

#[get("/products/{product_id}")]
pub async fn get_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        StatusCode::OK,
        get_product_service(product_id.into_inner(), repo.get_ref()),
    )
}

#[put("/products/{product_id}")]
pub async fn update_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ProductForm>,
) -> impl Responder {
    let result = ProductFormPayload::try_from(form)
        .map_err(ServiceError::from)
        .and_then(|payload| {
            update_product_service(product_id.into_inner(), payload, &user, repo.get_ref())
        });
    json_response(StatusCode::OK, result)
}

#[delete("/products/{product_id}")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_product_service(product_id.into_inner(), &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => service_error_response(err),
    }
}

#[post("/products/{product_id}/properties")]
pub async fn add_product_properties(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddPropertiesForm>,
) -> impl Responder {
    let result = AddPropertiesFormPayload::try_from(form)
        .map_err(ServiceError::from)
        .and_then(|payload| {
            add_product_properties_service(
                product_id.into_inner(),
                payload,
                &user,
                repo.get_ref(),
            )
        });
    json_response(StatusCode::OK, result)
}

#[delete("/products/{product_id}/properties/{property_id}")]
pub async fn remove_product_property(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (product_id, property_id) = path.into_inner();
    match remove_product_property_service(product_id, property_id, &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => service_error_response(err),
    }
}

#[post("/products/{product_id}/upload-image")]
pub async fn upload_product_image(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    storage: web::Data<MediaStorage>,
    MultipartForm(form): MultipartForm<ImageUploadForm>,
) -> impl Responder {
    let result = ImageUpload::try_from(form)
        .map_err(ServiceError::from)
        .and_then(|upload| {
            upload_product_image_service(
                product_id.into_inner(),
                upload,
                &user,
                repo.get_ref(),
                storage.get_ref(),
            )
        });
    json_response(StatusCode::OK, result)
}
