use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::leaderboard::requests::LeaderboardParams;
use crate::services::LeaderboardService;

static LEADERBOARD_SERVICE: Lazy<LeaderboardService> = Lazy::new(LeaderboardService::new_lazy);

pub async fn get_leaderboard(
    req: HttpRequest,
    query: web::Query<LeaderboardParams>,
) -> ActixResult<HttpResponse> {
    LEADERBOARD_SERVICE
        .get_leaderboard(&req, query.into_inner())
        .await
}

pub fn configure_leaderboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/leaderboard")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(get_leaderboard)),
    );
}
