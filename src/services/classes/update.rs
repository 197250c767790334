use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use super::access::{load_class, permission_denied};
use crate::models::classes::entities::Class;
use crate::models::classes::requests::UpdateClassRequest;
use crate::models::common::response::error_response;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;

pub async fn update_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    update_data: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let class = match load_class(&storage, class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };
    if !is_class_owner(&user, &class) {
        return Ok(permission_denied(
            "You do not have permission to update this class",
        ));
    }

    if update_data
        .name
        .as_deref()
        .is_some_and(|name| name.trim().is_empty())
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Class name cannot be empty",
        )));
    }

    match storage.update_class(class_id, update_data).await {
        Ok(Some(class)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            class,
            "Class information updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// 任课教师或管理员
pub(super) fn is_class_owner(user: &User, class: &Class) -> bool {
    user.role == UserRole::Admin || class.teacher_id == user.id
}
