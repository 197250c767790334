pub mod ledger;
pub mod progress;
pub mod rewards;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::PaginationQuery;
use crate::storage::Storage;

pub use rewards::settle_reward;

pub struct ProgressService {
    storage: Option<Arc<dyn Storage>>,
}

impl ProgressService {
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

    // 经验、金币、等级进度
    pub async fn get_my_progress(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        progress::get_my_progress(self, request).await
    }

    // 经验/金币流水，最新在前
    pub async fn list_my_ledger(
        &self,
        request: &HttpRequest,
        query: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        ledger::list_my_ledger(self, request, query).await
    }
}
