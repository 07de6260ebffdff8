use actix_multipart::form::MultipartForm;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::{ImagePath, UserId};
use crate::forms::uploads::{ImageUpload, ImageUploadForm};
use crate::forms::users::{
    PatchProfileForm, ProfileForm, ProfileFormPayload, RegisterForm, RegisterFormPayload,
    TokenForm, TokenFormPayload,
};
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::users::{
    create_user as create_user_service, delete_profile as delete_profile_service,
    get_profile as get_profile_service, get_user as get_user_service,
    issue_token as issue_token_service, list_users as list_users_service,
    update_profile as update_profile_service,
    upload_profile_image as upload_profile_image_service,
};
use crate::storage::MediaStorage;

use super::{json_response, service_error_response};

#[derive(Deserialize, Debug)]
struct UsersQueryParams {
    ordering: Option<String>,
}

#[derive(Serialize)]
struct TokenResponse {
    token: String,
}

#[derive(Serialize)]
struct ProfileImageResponse {
    id: UserId,
    image: Option<ImagePath>,
}

#[post("/create")]
pub async fn create_user(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<RegisterForm>,
) -> impl Responder {
    let result = RegisterFormPayload::try_from(form)
        .map_err(ServiceError::from)
        .and_then(|payload| create_user_service(payload, repo.get_ref()));
    json_response(StatusCode::CREATED, result)
}

#[post("/token")]
pub async fn issue_token(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<TokenForm>,
) -> impl Responder {
    let result = TokenFormPayload::try_from(form)
        .map_err(ServiceError::from)
        .and_then(|payload| issue_token_service(payload, repo.get_ref()))
        .map(|token| TokenResponse {
            token: token.key.into_inner(),
        });
    json_response(StatusCode::OK, result)
}

#[get("/users")]
pub async fn list_users(
    params: web::Query<UsersQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        StatusCode::OK,
        list_users_service(params.ordering.as_deref(), repo.get_ref()),
    )
}

#[get("/users/{user_id}")]
pub async fn get_user(user_id: web::Path<i32>, repo: web::Data<DieselRepository>) -> impl Responder {
    json_response(
        StatusCode::OK,
        get_user_service(user_id.into_inner(), repo.get_ref()),
    )
}

#[get("/me")]
pub async fn get_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(StatusCode::OK, get_profile_service(&user, repo.get_ref()))
}

#[put("/me")]
pub async fn replace_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ProfileForm>,
) -> impl Responder {
    let result = ProfileFormPayload::try_from(form)
        .map_err(ServiceError::from)
        .and_then(|payload| update_profile_service(payload, &user, repo.get_ref()));
    json_response(StatusCode::OK, result)
}

#[patch("/me")]
pub async fn patch_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<PatchProfileForm>,
) -> impl Responder {
    let result = ProfileFormPayload::try_from(form)
        .map_err(ServiceError::from)
        .and_then(|payload| update_profile_service(payload, &user, repo.get_ref()));
    json_response(StatusCode::OK, result)
}

#[delete("/me")]
pub async fn delete_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_profile_service(&user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => service_error_response(err),
    }
}

#[post("/me/upload-image")]
pub async fn upload_profile_image(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    storage: web::Data<MediaStorage>,
    MultipartForm(form): MultipartForm<ImageUploadForm>,
) -> impl Responder {
    let result = ImageUpload::try_from(form)
        .map_err(ServiceError::from)
        .and_then(|upload| {
            upload_profile_image_service(upload, &user, repo.get_ref(), storage.get_ref())
        })
        .map(|updated| ProfileImageResponse {
            id: updated.id,
            image: updated.image,
        });
    json_response(StatusCode::OK, result)
}
