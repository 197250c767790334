use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::AssignmentService;
use crate::models::assignments::entities::Assignment;
use crate::models::assignments::requests::{
    CreateAssignmentRequest, validate_assignment_numbers,
};
use crate::models::common::response::error_response_with;
use crate::models::notifications::entities::{NotificationType, ReferenceType};
use crate::models::notifications::requests::CreateNotificationRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::classes::access::{load_class, require_class_manager};
use crate::services::current_user;
use crate::services::notifications::dispatch_notifications;
use crate::storage::Storage;

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    req: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    if req.title.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AssignmentInvalid,
            "Title cannot be empty",
        )));
    }
    if let Err(msg) = validate_assignment_numbers(req.max_score, req.xp_reward, req.coin_reward) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AssignmentInvalid, msg)));
    }

    let class = match load_class(&storage, req.class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_class_manager(&storage, &user, class.id).await {
        return Ok(resp);
    }

    let assignment = match storage.create_assignment(user.id, req).await {
        Ok(assignment) => assignment,
        Err(e) => return Ok(error_response_with(&e, ErrorCode::AssignmentCreationFailed)),
    };
    info!(
        "Assignment {} created in class {} by {}",
        assignment.id, class.id, user.id
    );

    notify_class(&storage, &assignment, &class.name).await;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        assignment,
        "Assignment created successfully",
    )))
}

// 给班级每个学生发通知
async fn notify_class(storage: &Arc<dyn Storage>, assignment: &Assignment, class_name: &str) {
    let student_ids = match storage.list_class_student_ids(assignment.class_id).await {
        Ok(ids) => ids,
        Err(e) => {
            warn!("Failed to list students of class {}: {}", assignment.class_id, e);
            return;
        }
    };

    let content = match assignment.due_at {
        Some(due) => format!("{class_name} · due {}", due.format("%Y-%m-%d %H:%M UTC")),
        None => class_name.to_string(),
    };

    let requests = student_ids
        .into_iter()
        .map(|student_id| {
            CreateNotificationRequest::new(
                student_id,
                NotificationType::AssignmentCreated,
                format!("New assignment: {}", assignment.title),
            )
            .content(content.clone())
            .reference(ReferenceType::Assignment, assignment.id)
        })
        .collect();

    dispatch_notifications(storage, requests).await;
}
