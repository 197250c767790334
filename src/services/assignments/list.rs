use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::assignments::requests::{AssignmentListParams, AssignmentListQuery};
use crate::models::common::response::error_response;
use crate::models::users::entities::UserRole;
use crate::models::ApiResponse;
use crate::services::classes::access::require_class_member;
use crate::services::current_user;

pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    query: AssignmentListParams,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let (page, size) = query.pagination.normalized();

    // 指定班级时必须是成员；否则列出自己所在班级的作业
    let member_id = match query.class_id {
        Some(class_id) => {
            if let Err(resp) = require_class_member(&storage, &user, class_id).await {
                return Ok(resp);
            }
            None
        }
        None if user.role == UserRole::Admin => None,
        None => Some(user.id),
    };

    let list_query = AssignmentListQuery {
        page: Some(page as i64),
        size: Some(size as i64),
        class_id: query.class_id,
        member_id,
        search: query.search,
    };

    match storage.list_assignments_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Assignments retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
