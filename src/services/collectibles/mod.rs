pub mod list;
pub mod purchase;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::collectibles::requests::CollectibleListParams;
use crate::storage::Storage;

pub struct CollectibleService {
    storage: Option<Arc<dyn Storage>>,
}

impl CollectibleService {
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

    // 商店目录，带拥有/装备状态
    pub async fn list_catalog(
        &self,
        request: &HttpRequest,
        query: CollectibleListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_catalog(self, request, query).await
    }

    pub async fn list_mine(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_mine(self, request).await
    }

    pub async fn purchase(
        &self,
        request: &HttpRequest,
        collectible_id: i64,
    ) -> ActixResult<HttpResponse> {
        purchase::purchase(self, request, collectible_id).await
    }
}
