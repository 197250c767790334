use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CollectibleService;
use crate::config::AppConfig;
use crate::errors::ClassQuestError;
use crate::models::collectibles::responses::PurchaseResponse;
use crate::models::common::response::error_response;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;

pub async fn purchase(
    service: &CollectibleService,
    request: &HttpRequest,
    collectible_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let collectible = match storage.get_collectible_by_id(collectible_id).await {
        Ok(Some(collectible)) => collectible,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CollectibleNotFound,
                "Collectible not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    let xp_per_level = AppConfig::get().gamification.xp_per_level;
    match storage
        .purchase_collectible(user.id, &collectible, xp_per_level)
        .await
    {
        Ok(coins_remaining) => {
            info!(
                "User {} bought collectible {} for {} coins",
                user.id, collectible.code, collectible.price
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                PurchaseResponse {
                    collectible,
                    coins_remaining,
                },
                "Collectible purchased successfully",
            )))
        }
        Err(ClassQuestError::Conflict(msg)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::CollectibleAlreadyOwned, msg),
        )),
        Err(ClassQuestError::InvalidState(msg)) => Ok(HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::CollectibleInactive, msg),
        )),
        Err(e) => Ok(error_response(&e)),
    }
}
