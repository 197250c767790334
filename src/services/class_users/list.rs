use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::{
    models::{
        ApiResponse,
        class_users::requests::{ClassUserListParams, ClassUserQuery},
        common::response::error_response,
    },
    services::ClassUserService,
};

// 成员身份已由 RequireClassRole 校验
pub async fn list_class_members(
    service: &ClassUserService,
    request: &HttpRequest,
    class_id: i64,
    query: ClassUserListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let (page, size) = query.pagination.normalized();

    let list_query = ClassUserQuery {
        page: Some(page as i64),
        size: Some(size as i64),
        search: query.search,
        role: query.role,
    };

    match storage
        .list_class_members_with_pagination(class_id, list_query)
        .await
    {
        Ok(members) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            members,
            "Class members retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
