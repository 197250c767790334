use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::IntegrationService;
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::integrations::requests::{ExternalStudentListParams, SyncRunListParams};

pub async fn list_external_students(
    service: &IntegrationService,
    request: &HttpRequest,
    query: ExternalStudentListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let (page, size) = query.pagination.normalized();
    let search = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match storage.list_external_students(search, page, size).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "External students retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn list_sync_runs(
    service: &IntegrationService,
    request: &HttpRequest,
    query: SyncRunListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let (page, size) = query.pagination.normalized();

    match storage.list_sync_runs(page, size).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Sync runs retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
