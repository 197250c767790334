use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::notifications::requests::NotificationListParams;
use crate::services::current_user;

pub async fn list_notifications(
    service: &NotificationService,
    request: &HttpRequest,
    query: NotificationListParams,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let (page, size) = query.pagination.normalized();

    match storage
        .list_notifications_with_pagination(
            user.id,
            query.unread_only.unwrap_or(false),
            page,
            size,
        )
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Notifications retrieved",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
