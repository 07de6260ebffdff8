use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};

use crate::domain::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::users::authenticate_token;

use super::error_response;

const TOKEN_SCHEME: &str = "Token";

/// Key of an `Authorization: Token <key>` header, if well formed.
fn token_key(req: &HttpRequest) -> Option<&str> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, key) = header.trim().split_once(' ')?;
    let key = key.trim();
    (scheme.eq_ignore_ascii_case(TOKEN_SCHEME) && !key.is_empty()).then_some(key)
}

fn reject(status: StatusCode, detail: &'static str) -> actix_web::Error {
    InternalError::from_response(detail, error_response(status, detail)).into()
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(key) = token_key(req) else {
            return ready(Err(reject(
                StatusCode::UNAUTHORIZED,
                "Authentication credentials were not provided.",
            )));
        };

        let Some(repo) = req.app_data::<web::Data<DieselRepository>>() else {
            log::error!("Repository is not registered as app data");
            return ready(Err(reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error.",
            )));
        };

        ready(match authenticate_token(key, repo.get_ref()) {
            Ok(user) => Ok(user),
            Err(ServiceError::Internal) => Err(reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error.",
            )),
            Err(_) => Err(reject(StatusCode::UNAUTHORIZED, "Invalid token.")),
        })
    }
}
