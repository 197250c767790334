use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::classes::requests::{ClassListQuery, ClassQueryParams};
use crate::models::common::response::error_response;
use crate::models::users::entities::UserRole;
use crate::models::ApiResponse;
use crate::services::current_user;

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
    query: ClassQueryParams,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let (page, size) = query.pagination.normalized();

    // 管理员看全部，其他人只看自己所在的班级
    let member_id = (user.role != UserRole::Admin).then_some(user.id);

    let list_query = ClassListQuery {
        page: Some(page as i64),
        size: Some(size as i64),
        teacher_id: None,
        member_id,
        search: query.search,
    };

    match storage.list_classes_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Class list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
