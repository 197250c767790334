use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{RaffleService, load_raffle};
use crate::config::AppConfig;
use crate::errors::ClassQuestError;
use crate::models::common::response::error_response;
use crate::models::raffles::requests::EnterRaffleRequest;
use crate::models::raffles::responses::EnterRaffleResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::classes::access::{ClassAccess, permission_denied, resolve_class_access};
use crate::services::current_user;

/// 单次最多购买的抽奖券
const MAX_ENTRIES_PER_REQUEST: i32 = 100;

pub async fn enter_raffle(
    service: &RaffleService,
    request: &HttpRequest,
    raffle_id: i64,
    req: EnterRaffleRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    if req.count < 1 || req.count > MAX_ENTRIES_PER_REQUEST {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("Entry count must be between 1 and {MAX_ENTRIES_PER_REQUEST}"),
        )));
    }

    let raffle = match load_raffle(&storage, raffle_id).await {
        Ok(raffle) => raffle,
        Err(resp) => return Ok(resp),
    };
    match resolve_class_access(&storage, &user, raffle.class_id).await {
        Ok(ClassAccess::Student) => {}
        Ok(_) => return Ok(permission_denied("Only students of this class can enter")),
        Err(e) => return Ok(error_response(&e)),
    }
    if !raffle.accepts_entries(chrono::Utc::now()) {
        return Ok(not_open());
    }

    let xp_per_level = AppConfig::get().gamification.xp_per_level;
    match storage
        .enter_raffle(raffle.id, user.id, req.count, xp_per_level)
        .await
    {
        Ok((entry, coins_remaining)) => {
            info!(
                "User {} bought {} entries in raffle {}",
                user.id, req.count, raffle.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                EnterRaffleResponse {
                    entry,
                    coins_remaining,
                },
                "Raffle entries purchased successfully",
            )))
        }
        Err(ClassQuestError::Validation(msg)) => Ok(HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::RaffleEntryLimitExceeded, msg),
        )),
        // 并发开奖或取消
        Err(ClassQuestError::InvalidState(_)) => Ok(not_open()),
        Err(e) => Ok(error_response(&e)),
    }
}

fn not_open() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::RaffleNotOpen,
        "Raffle is not open for entries",
    ))
}
