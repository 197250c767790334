pub mod cancel;
pub mod create;
pub mod draw;
pub mod enter;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::common::response::error_response;
use crate::models::raffles::entities::{Raffle, RaffleEntry};
use crate::models::raffles::requests::{CreateRaffleRequest, EnterRaffleRequest, RaffleListParams};
use crate::models::raffles::responses::RaffleDetailResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct RaffleService {
    storage: Option<Arc<dyn Storage>>,
}

impl RaffleService {
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

    pub async fn create_raffle(
        &self,
        request: &HttpRequest,
        req: CreateRaffleRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_raffle(self, request, req).await
    }

    // 指定班级，或当前用户所在的全部班级
    pub async fn list_raffles(
        &self,
        request: &HttpRequest,
        query: RaffleListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_raffles(self, request, query).await
    }

    pub async fn get_raffle(
        &self,
        request: &HttpRequest,
        raffle_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::get_raffle(self, request, raffle_id).await
    }

    // 学生花金币买抽奖券
    pub async fn enter_raffle(
        &self,
        request: &HttpRequest,
        raffle_id: i64,
        req: EnterRaffleRequest,
    ) -> ActixResult<HttpResponse> {
        enter::enter_raffle(self, request, raffle_id, req).await
    }

    // 按抽奖券数加权开奖
    pub async fn draw_raffle(
        &self,
        request: &HttpRequest,
        raffle_id: i64,
    ) -> ActixResult<HttpResponse> {
        draw::draw_raffle(self, request, raffle_id).await
    }

    // 取消并退还全部金币
    pub async fn cancel_raffle(
        &self,
        request: &HttpRequest,
        raffle_id: i64,
    ) -> ActixResult<HttpResponse> {
        cancel::cancel_raffle(self, request, raffle_id).await
    }
}

pub(crate) async fn load_raffle(
    storage: &Arc<dyn Storage>,
    raffle_id: i64,
) -> Result<Raffle, HttpResponse> {
    match storage.get_raffle_by_id(raffle_id).await {
        Ok(Some(raffle)) => Ok(raffle),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::RaffleNotFound,
            "Raffle not found",
        ))),
        Err(e) => Err(error_response(&e)),
    }
}

/// 汇总抽奖券：总数、参与人数、当前用户的券数
pub(crate) fn summarize(raffle: Raffle, entries: &[RaffleEntry], user_id: i64) -> RaffleDetailResponse {
    let total_entries = entries.iter().map(|e| i64::from(e.entries)).sum();
    let participant_count = entries.iter().filter(|e| e.entries > 0).count() as i64;
    let my_entries = entries
        .iter()
        .find(|e| e.user_id == user_id)
        .map(|e| e.entries)
        .unwrap_or(0);
    RaffleDetailResponse {
        raffle,
        total_entries,
        participant_count,
        my_entries,
    }
}
