pub mod get;
pub mod ranking;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::leaderboard::requests::LeaderboardParams;
use crate::storage::Storage;

pub struct LeaderboardService {
    storage: Option<Arc<dyn Storage>>,
}

impl LeaderboardService {
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

    // 全局或班级排行榜
    pub async fn get_leaderboard(
        &self,
        request: &HttpRequest,
        query: LeaderboardParams,
    ) -> ActixResult<HttpResponse> {
        get::get_leaderboard(self, request, query).await
    }
}
