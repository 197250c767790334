use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::client::AiClient;
use super::prompt::{build_chat_messages, validate_history};
use super::{TutorService, ai_unavailable};
use crate::config::AppConfig;
use crate::models::tutor::requests::TutorChatRequest;
use crate::models::tutor::responses::TutorChatResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::load_assignment;
use crate::services::classes::access::require_class_member;
use crate::services::current_user;

pub async fn chat(
    service: &TutorService,
    request: &HttpRequest,
    req: TutorChatRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let config = AppConfig::get();
    if !config.ai_enabled() {
        return Ok(ai_unavailable("AI tutor is not configured"));
    }

    if let Err(msg) = validate_history(&req.messages) {
        return Ok(
            HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg))
        );
    }

    // 引用作业时需能查看该班级
    let assignment = match req.assignment_id {
        Some(assignment_id) => {
            let storage = service.get_storage(request);
            let assignment = match load_assignment(&storage, assignment_id).await {
                Ok(assignment) => assignment,
                Err(resp) => return Ok(resp),
            };
            if let Err(resp) = require_class_member(&storage, &user, assignment.class_id).await {
                return Ok(resp);
            }
            Some(assignment)
        }
        None => None,
    };

    let messages = build_chat_messages(&req.messages, assignment.as_ref(), config.ai.max_history);
    let client = match AiClient::new(&config.ai) {
        Ok(client) => client,
        Err(e) => {
            warn!("Failed to build AI client: {}", e);
            return Ok(ai_unavailable("AI tutor is unavailable"));
        }
    };

    match client.complete(&messages, 0.7).await {
        Ok(reply) => {
            info!("Tutor reply sent to user {}", user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                TutorChatResponse { reply },
                "Tutor replied",
            )))
        }
        Err(e) => {
            warn!("Tutor request for user {} failed: {}", user.id, e);
            Ok(ai_unavailable("AI tutor is unavailable, please try again later"))
        }
    }
}
