pub mod chat;
pub mod client;
pub mod prompt;
pub mod translate;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::tutor::requests::{TranslateRequest, TutorChatRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct TutorService {
    storage: Option<Arc<dyn Storage>>,
}

impl TutorService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // AI 辅导对话
    pub async fn chat(
        &self,
        request: &HttpRequest,
        req: TutorChatRequest,
    ) -> ActixResult<HttpResponse> {
        chat::chat(self, request, req).await
    }

    // 翻译，默认译成用户的界面语言
    pub async fn translate(
        &self,
        request: &HttpRequest,
        req: TranslateRequest,
    ) -> ActixResult<HttpResponse> {
        translate::translate(self, request, req).await
    }
}

pub(crate) fn ai_unavailable(message: &str) -> HttpResponse {
    HttpResponse::BadGateway().json(ApiResponse::error_empty(
        ErrorCode::AiServiceUnavailable,
        message,
    ))
}
