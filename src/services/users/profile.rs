use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::common::response::error_response;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        requests::{UpdateLanguageRequest, UpdateProfileRequest},
        responses::UserResponse,
    },
};
use crate::services::current_user;
use crate::utils::validate::{validate_display_name, validate_language};

pub async fn update_profile(
    service: &UserService,
    update: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Some(name) = &update.display_name
        && let Err(msg) = validate_display_name(name)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserUpdateFailed, msg)));
    }

    let storage = service.get_storage(request);
    match storage.update_user_profile(user.id, update.display_name).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse { user },
            "Profile updated",
        ))),
        Ok(None) => Ok(user_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn update_language(
    service: &UserService,
    update: UpdateLanguageRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let language = update.language.trim();
    if let Err(msg) = validate_language(language) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserLanguageInvalid, msg)));
    }

    let storage = service.get_storage(request);
    match storage.update_user_language(user.id, language).await {
        Ok(Some(user)) => {
            tracing::debug!("User {} switched language to {}", user.id, user.language);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "Language preference updated",
            )))
        }
        Ok(None) => Ok(user_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}

pub(super) fn user_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::UserNotFound,
        "User not found",
    ))
}
