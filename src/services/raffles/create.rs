use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::RaffleService;
use crate::models::common::response::error_response_with;
use crate::models::raffles::requests::CreateRaffleRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::classes::access::{load_class, require_class_manager};
use crate::services::current_user;

pub async fn create_raffle(
    service: &RaffleService,
    request: &HttpRequest,
    req: CreateRaffleRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    if let Err(msg) = req.validate(chrono::Utc::now()) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::RaffleInvalid, msg)));
    }

    let class = match load_class(&storage, req.class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_class_manager(&storage, &user, class.id).await {
        return Ok(resp);
    }

    match storage.create_raffle(user.id, req).await {
        Ok(raffle) => {
            info!(
                "Raffle {} created in class {} by {}",
                raffle.id, class.id, user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                raffle,
                "Raffle created successfully",
            )))
        }
        Err(e) => Ok(error_response_with(&e, ErrorCode::RaffleInvalid)),
    }
}
