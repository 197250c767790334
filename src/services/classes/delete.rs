use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use super::access::{load_class, permission_denied};
use super::update::is_class_owner;
use crate::models::common::response::error_response_with;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;

pub async fn delete_class(
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
    if !is_class_owner(&user, &class) {
        return Ok(permission_denied(
            "You do not have permission to delete this class",
        ));
    }

    match storage.delete_class(class_id).await {
        Ok(true) => {
            info!("Class {} deleted by {}", class_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Class deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class not found",
        ))),
        Err(e) => Ok(error_response_with(&e, ErrorCode::ClassDeleteFailed)),
    }
}
