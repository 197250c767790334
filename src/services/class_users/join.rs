use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassUserService;
use crate::models::common::response::error_response_with;
use crate::models::{
    ApiResponse, ErrorCode,
    class_users::{entities::ClassUserRole, requests::JoinClassRequest},
};
use crate::services::current_user;

pub async fn join_class(
    service: &ClassUserService,
    request: &HttpRequest,
    class_id: i64,
    join_data: JoinClassRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    // 班级 ID 与邀请码必须匹配
    let class = match storage.get_class_by_code(join_data.invite_code.trim()).await {
        Ok(Some(class)) if class.id == class_id => class,
        Ok(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassInviteCodeInvalid,
                "Class not found or invite code is invalid",
            )));
        }
        Err(e) => return Ok(error_response_with(&e, ErrorCode::ClassJoinFailed)),
    };

    match storage
        .join_class(user.id, class.id, ClassUserRole::Student)
        .await
    {
        Ok(class_user) => {
            info!("User {} joined class {}", user.id, class.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                class_user,
                "Class joined successfully",
            )))
        }
        Err(e) => Ok(error_response_with(&e, ErrorCode::ClassAlreadyJoined)),
    }
}
