use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::games::requests::{GameSessionListParams, SubmitGameSessionRequest};
use crate::services::GameService;

static GAME_SERVICE: Lazy<GameService> = Lazy::new(GameService::new_lazy);

pub async fn submit_session(
    req: HttpRequest,
    body: web::Json<SubmitGameSessionRequest>,
) -> ActixResult<HttpResponse> {
    GAME_SERVICE.submit_session(&req, body.into_inner()).await
}

pub async fn list_my_sessions(
    req: HttpRequest,
    query: web::Query<GameSessionListParams>,
) -> ActixResult<HttpResponse> {
    GAME_SERVICE
        .list_my_sessions(&req, query.into_inner())
        .await
}

pub fn configure_games_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/games")
            .wrap(middlewares::RequireJWT)
            .route("/sessions", web::post().to(submit_session))
            .route("/sessions/mine", web::get().to(list_my_sessions)),
    );
}
