use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubmissionService;
use crate::errors::ClassQuestError;
use crate::models::common::response::{error_response, error_response_with};
use crate::models::submissions::requests::CreateSubmissionRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::load_assignment;
use crate::services::classes::access::{ClassAccess, permission_denied, resolve_class_access};
use crate::services::current_user;

const MAX_CONTENT_CHARS: usize = 20_000;

pub async fn submit(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    req: CreateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let content = req.content.trim();
    if content.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Submission content cannot be empty",
        )));
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("Submission content must be at most {MAX_CONTENT_CHARS} characters"),
        )));
    }

    let assignment = match load_assignment(&storage, assignment_id).await {
        Ok(assignment) => assignment,
        Err(resp) => return Ok(resp),
    };

    // 只有班级学生可以提交
    match resolve_class_access(&storage, &user, assignment.class_id).await {
        Ok(ClassAccess::Student) => {}
        Ok(_) => {
            return Ok(permission_denied(
                "Only students of this class can submit",
            ));
        }
        Err(e) => return Ok(error_response(&e)),
    }

    match storage
        .upsert_submission(&assignment, user.id, content.to_string())
        .await
    {
        Ok(submission) => {
            info!(
                "Student {} submitted assignment {} (late: {})",
                user.id, assignment.id, submission.is_late
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                submission,
                "Submission saved successfully",
            )))
        }
        Err(ClassQuestError::InvalidState(msg)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::SubmissionAlreadyGraded, msg),
        )),
        Err(e) => Ok(error_response_with(&e, ErrorCode::BadRequest)),
    }
}
