use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{RaffleService, load_raffle};
use crate::config::AppConfig;
use crate::errors::ClassQuestError;
use crate::models::common::response::error_response;
use crate::models::raffles::responses::CancelRaffleResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::classes::access::require_class_manager;
use crate::services::current_user;

pub async fn cancel_raffle(
    service: &RaffleService,
    request: &HttpRequest,
    raffle_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let raffle = match load_raffle(&storage, raffle_id).await {
        Ok(raffle) => raffle,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_class_manager(&storage, &user, raffle.class_id).await {
        return Ok(resp);
    }

    let xp_per_level = AppConfig::get().gamification.xp_per_level;
    match storage.cancel_raffle(raffle.id, xp_per_level).await {
        Ok((raffle, refunded_students, refunded_coins)) => {
            info!(
                "Raffle {} cancelled by {}: refunded {} coins to {} students",
                raffle.id, user.id, refunded_coins, refunded_students
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                CancelRaffleResponse {
                    raffle,
                    refunded_students,
                    refunded_coins,
                },
                "Raffle cancelled successfully",
            )))
        }
        Err(ClassQuestError::InvalidState(msg)) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::RaffleNotOpen, msg))),
        Err(e) => Ok(error_response(&e)),
    }
}
