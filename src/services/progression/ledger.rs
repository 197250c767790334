use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProgressService;
use crate::models::common::response::error_response;
use crate::models::{ApiResponse, PaginationQuery};
use crate::services::current_user;

pub async fn list_my_ledger(
    service: &ProgressService,
    request: &HttpRequest,
    query: PaginationQuery,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let (page, size) = query.normalized();

    match storage.list_ledger_with_pagination(user.id, page, size).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Ledger retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
