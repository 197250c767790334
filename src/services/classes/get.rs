use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use super::access::{load_class, require_class_member};
use crate::models::classes::responses::ClassDetailResponse;
use crate::models::common::response::error_response;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;

pub async fn get_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
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
    if let Err(resp) = require_class_member(&storage, &user, class_id).await {
        return Ok(resp);
    }

    match storage.count_class_students(class_id).await {
        Ok(student_count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassDetailResponse {
                class,
                student_count,
            },
            "Class information retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

// 学生加入前用邀请码预览班级
pub async fn get_class_by_code(
    service: &ClassService,
    request: &HttpRequest,
    code: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_class_by_code(code.trim()).await {
        Ok(Some(class)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            class,
            "Class information retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassInviteCodeInvalid,
            "Class not found or invite code is invalid",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
