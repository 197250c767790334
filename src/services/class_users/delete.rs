use crate::{
    models::{
        ApiResponse, ErrorCode,
        classes::entities::Class,
        common::response::error_response,
        users::entities::{User, UserRole},
    },
    services::{ClassUserService, current_user},
};
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::services::classes::access::{load_class, permission_denied};

pub async fn delete_class_user(
    service: &ClassUserService,
    req: &HttpRequest,
    class_id: i64,
    target_user_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(req);

    let class = match load_class(&storage, class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };

    if !can_remove_member(&user, target_user_id, &class) {
        return Ok(permission_denied(
            "You do not have permission to remove this class member",
        ));
    }

    // 任课教师不能被移出
    if class.teacher_id == target_user_id {
        return Ok(permission_denied(
            "The class teacher cannot leave the class. Delete the class instead.",
        ));
    }

    match storage.leave_class(target_user_id, class_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
            "Class member removed successfully",
        ))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassUserNotFound,
            "Class member not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// 管理员、任课教师可移除任何人，学生只能退出自己
fn can_remove_member(user: &User, target_user_id: i64, class: &Class) -> bool {
    match user.role {
        UserRole::Admin => true,
        _ if class.teacher_id == user.id => true,
        _ => target_user_id == user.id,
    }
}
