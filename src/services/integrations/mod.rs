pub mod client;
pub mod list;
pub mod sync;
pub mod webhook;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::integrations::requests::{ExternalStudentListParams, SyncRunListParams};
use crate::storage::Storage;

pub struct IntegrationService {
    storage: Option<Arc<dyn Storage>>,
}

impl IntegrationService {
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

    // 第三方名册推送，按原始请求体验签
    pub async fn handle_webhook(
        &self,
        request: &HttpRequest,
        body: web::Bytes,
    ) -> ActixResult<HttpResponse> {
        webhook::handle_webhook(self, request, body).await
    }

    pub async fn list_external_students(
        &self,
        request: &HttpRequest,
        query: ExternalStudentListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_external_students(self, request, query).await
    }

    pub async fn list_sync_runs(
        &self,
        request: &HttpRequest,
        query: SyncRunListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_sync_runs(self, request, query).await
    }

    // 把新评分推送到外部系统
    pub async fn trigger_sync(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        sync::trigger_sync(self, request).await
    }
}
