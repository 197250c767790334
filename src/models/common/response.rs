use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::ClassQuestError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// 业务错误对应的 HTTP 状态与默认错误码
pub fn error_status(err: &ClassQuestError) -> (StatusCode, ErrorCode) {
    match err {
        ClassQuestError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest),
        ClassQuestError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
        ClassQuestError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Conflict),
        ClassQuestError::InvalidState(_) => (StatusCode::CONFLICT, ErrorCode::Conflict),
        ClassQuestError::InsufficientCoins(_) => {
            (StatusCode::BAD_REQUEST, ErrorCode::InsufficientCoins)
        }
        ClassQuestError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized),
        ClassQuestError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
        ClassQuestError::ExternalService(_) => {
            (StatusCode::BAD_GATEWAY, ErrorCode::InternalServerError)
        }
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
        ),
    }
}

/// 把业务错误转成统一响应
///
/// 服务端错误只返回笼统提示，细节写日志。
pub fn error_response(err: &ClassQuestError) -> HttpResponse {
    let (status, code) = error_status(err);
    respond(status, code, err)
}

/// 同 [`error_response`]，但客户端错误使用指定错误码
pub fn error_response_with(err: &ClassQuestError, code: ErrorCode) -> HttpResponse {
    let (status, default_code) = error_status(err);
    let code = if status.is_client_error() && default_code != ErrorCode::InsufficientCoins {
        code
    } else {
        default_code
    };
    respond(status, code, err)
}

fn respond(status: StatusCode, code: ErrorCode, err: &ClassQuestError) -> HttpResponse {
    if status.is_server_error() {
        tracing::error!("{}", err);
        let message = match err {
            ClassQuestError::ExternalService(_) => "Upstream service unavailable",
            _ => "Internal server error",
        };
        HttpResponse::build(status).json(ApiResponse::error_empty(code, message))
    } else {
        HttpResponse::build(status).json(ApiResponse::error_empty(code, err.message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            error_status(&ClassQuestError::not_found("x")).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&ClassQuestError::insufficient_coins("x")),
            (StatusCode::BAD_REQUEST, ErrorCode::InsufficientCoins)
        );
        assert_eq!(
            error_status(&ClassQuestError::database_operation("x")).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_override_code_only_for_client_errors() {
        let resp = error_response_with(
            &ClassQuestError::invalid_state("closed"),
            ErrorCode::RaffleNotOpen,
        );
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = error_response_with(
            &ClassQuestError::database_operation("boom"),
            ErrorCode::RaffleNotOpen,
        );
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
