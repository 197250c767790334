use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::LeaderboardService;
use super::ranking::{clamp_limit, rank_candidates, week_start};
use crate::config::AppConfig;
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::leaderboard::entities::{LeaderboardPeriod, LeaderboardResponse};
use crate::models::leaderboard::requests::LeaderboardParams;
use crate::services::classes::access::{load_class, require_class_member};
use crate::services::current_user;

pub async fn get_leaderboard(
    service: &LeaderboardService,
    request: &HttpRequest,
    query: LeaderboardParams,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    if let Some(class_id) = query.class_id {
        if let Err(resp) = load_class(&storage, class_id).await {
            return Ok(resp);
        }
        if let Err(resp) = require_class_member(&storage, &user, class_id).await {
            return Ok(resp);
        }
    }

    let since = match query.period {
        LeaderboardPeriod::AllTime => None,
        LeaderboardPeriod::Weekly => Some(week_start(chrono::Utc::now()).timestamp()),
    };
    let candidates = match storage
        .list_leaderboard_candidates(query.class_id, since)
        .await
    {
        Ok(candidates) => candidates,
        Err(e) => return Ok(error_response(&e)),
    };

    let ranked = rank_candidates(candidates);
    let me = ranked.iter().find(|entry| entry.user_id == user.id).cloned();
    let limit = clamp_limit(query.limit, AppConfig::get().gamification.leaderboard_max_limit);
    let entries = ranked.into_iter().take(limit as usize).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        LeaderboardResponse {
            period: query.period,
            class_id: query.class_id,
            entries,
            me,
        },
        "Leaderboard retrieved successfully",
    )))
}
