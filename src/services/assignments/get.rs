use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, load_assignment};
use crate::models::assignments::responses::AssignmentDetailResponse;
use crate::models::common::response::error_response;
use crate::models::ApiResponse;
use crate::services::classes::access::{ClassAccess, require_class_member};
use crate::services::current_user;

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
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
    let access = match require_class_member(&storage, &user, assignment.class_id).await {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };

    // 学生附带自己的提交
    let my_submission = if access == ClassAccess::Student {
        match storage
            .get_submission_for_student(assignment.id, user.id)
            .await
        {
            Ok(submission) => submission,
            Err(e) => return Ok(error_response(&e)),
        }
    } else {
        None
    };

    let submission_count = match storage.count_assignment_submissions(assignment.id).await {
        Ok(count) => count,
        Err(e) => return Ok(error_response(&e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AssignmentDetailResponse {
            assignment,
            my_submission,
            submission_count,
        },
        "Assignment retrieved successfully",
    )))
}
