use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, load_assignment};
use crate::models::assignments::requests::{UpdateAssignmentRequest, validate_assignment_numbers};
use crate::models::common::response::error_response;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::classes::access::require_class_manager;
use crate::services::current_user;

pub async fn update_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    update: UpdateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let assignment = match load_assignment(&storage, assignment_id).await {
        Ok(assignment) => assignment,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_class_manager(&storage, &user, assignment.class_id).await {
        return Ok(resp);
    }

    if update
        .title
        .as_deref()
        .is_some_and(|title| title.trim().is_empty())
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AssignmentInvalid,
            "Title cannot be empty",
        )));
    }
    // 按更新后的值整体校验
    if let Err(msg) = validate_assignment_numbers(
        update.max_score.unwrap_or(assignment.max_score),
        update.xp_reward.unwrap_or(assignment.xp_reward),
        update.coin_reward.unwrap_or(assignment.coin_reward),
    ) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AssignmentInvalid, msg)));
    }

    match storage.update_assignment(assignment_id, update).await {
        Ok(Some(assignment)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            assignment,
            "Assignment updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
