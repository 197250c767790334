use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::client::AiClient;
use super::prompt::build_translate_messages;
use super::{TutorService, ai_unavailable};
use crate::config::AppConfig;
use crate::models::common::response::error_response;
use crate::models::tutor::requests::TranslateRequest;
use crate::models::tutor::responses::TranslateResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::utils::validate::validate_language;

const MAX_TEXT_CHARS: usize = 5_000;

pub async fn translate(
    service: &TutorService,
    request: &HttpRequest,
    req: TranslateRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let config = AppConfig::get();
    if !config.ai_enabled() {
        return Ok(ai_unavailable("Translation is not configured"));
    }

    let text = req.text.trim();
    if text.is_empty() || text.chars().count() > MAX_TEXT_CHARS {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("Text must be between 1 and {MAX_TEXT_CHARS} characters"),
        )));
    }

    // 未指定时使用用户保存的语言偏好
    let target_language = match req.target_language.map(|l| l.trim().to_string()) {
        Some(language) if !language.is_empty() => language,
        _ => match service.get_storage(request).get_user_by_id(user.id).await {
            Ok(Some(fresh)) => fresh.language,
            Ok(None) => user.language,
            Err(e) => return Ok(error_response(&e)),
        },
    };
    if let Err(msg) = validate_language(&target_language) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserLanguageInvalid, msg)));
    }

    let client = match AiClient::new(&config.ai) {
        Ok(client) => client,
        Err(e) => {
            warn!("Failed to build AI client: {}", e);
            return Ok(ai_unavailable("Translation is unavailable"));
        }
    };
    let messages = build_translate_messages(text, &target_language);

    match client.complete(&messages, 0.0).await {
        Ok(translated_text) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            TranslateResponse {
                translated_text,
                target_language,
            },
            "Text translated",
        ))),
        Err(e) => {
            warn!("Translation for user {} failed: {}", user.id, e);
            Ok(ai_unavailable("Translation is unavailable, please try again later"))
        }
    }
}
