use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::models::common::response::error_response;
use crate::models::notifications::responses::{MarkAllReadResponse, UnreadCountResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;

// 标记单条已读，返回最新未读数
pub async fn mark_as_read(
    service: &NotificationService,
    request: &HttpRequest,
    notification_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage
        .mark_notification_as_read(notification_id, user.id)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::NotificationNotFound,
                "Notification not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }

    match storage.get_unread_notification_count(user.id).await {
        Ok(unread_count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UnreadCountResponse { unread_count },
            "Notification marked as read",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn mark_all_as_read(
    service: &NotificationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let updated = match storage.mark_all_notifications_as_read(user.id).await {
        Ok(updated) => updated,
        Err(e) => return Ok(error_response(&e)),
    };

    match storage.get_unread_notification_count(user.id).await {
        Ok(unread_count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MarkAllReadResponse {
                updated,
                unread_count,
            },
            "All notifications marked as read",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
