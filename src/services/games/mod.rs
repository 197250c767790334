pub mod list;
pub mod scoring;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::games::requests::{GameSessionListParams, SubmitGameSessionRequest};
use crate::storage::Storage;

pub struct GameService {
    storage: Option<Arc<dyn Storage>>,
}

impl GameService {
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

    // 提交一局成绩：校验、计分、发奖励
    pub async fn submit_session(
        &self,
        request: &HttpRequest,
        req: SubmitGameSessionRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_session(self, request, req).await
    }

    pub async fn list_my_sessions(
        &self,
        request: &HttpRequest,
        query: GameSessionListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_my_sessions(self, request, query).await
    }
}
