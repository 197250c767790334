use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::models::common::response::error_response;
use crate::models::notifications::responses::UnreadCountResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;

pub async fn delete_notification(
    service: &NotificationService,
    request: &HttpRequest,
    notification_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.delete_notification(notification_id, user.id).await {
        Ok(true) => match storage.get_unread_notification_count(user.id).await {
            Ok(unread_count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                UnreadCountResponse { unread_count },
                "Notification deleted",
            ))),
            Err(e) => Ok(error_response(&e)),
        },
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotificationNotFound,
            "Notification not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
