use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GameService;
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::games::requests::GameSessionListParams;
use crate::services::current_user;

pub async fn list_my_sessions(
    service: &GameService,
    request: &HttpRequest,
    query: GameSessionListParams,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let (page, size) = query.pagination.normalized();

    match storage
        .list_game_sessions(user.id, query.game_kind, page, size)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Game sessions retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
