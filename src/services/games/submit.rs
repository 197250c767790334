use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::GameService;
use super::scoring::{score_tally, utc_day_start, validate_tally};
use crate::config::AppConfig;
use crate::models::common::response::error_response;
use crate::models::games::entities::{DailyXpCap, NewGameSession};
use crate::models::games::requests::SubmitGameSessionRequest;
use crate::models::games::responses::GameSessionResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::services::progression::settle_reward;

pub async fn submit_session(
    service: &GameService,
    request: &HttpRequest,
    req: SubmitGameSessionRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let rules = &AppConfig::get().gamification;

    let tally = req.tally();
    if let Err(msg) = validate_tally(&tally, rules.timed_challenge_seconds) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::GameSessionInvalid, msg)));
    }
    let score = score_tally(&tally);

    let new_session = NewGameSession {
        user_id: user.id,
        tally,
        score: score.score,
        accuracy: score.accuracy,
        xp_earned: score.xp,
        xp_cap: DailyXpCap {
            since: utc_day_start(chrono::Utc::now()).timestamp(),
            limit: rules.daily_game_xp_cap,
        },
        coins_awarded: score.coins,
    };
    let (session, balance) = match storage
        .record_game_session(new_session, rules.xp_per_level)
        .await
    {
        Ok(recorded) => recorded,
        Err(e) => return Ok(error_response(&e)),
    };
    let xp_awarded = session.xp_awarded;
    info!(
        "User {} finished {} with score {} ({} xp)",
        user.id, session.game_kind, session.score, xp_awarded
    );

    let outcome = settle_reward(
        &storage,
        user.id,
        xp_awarded,
        score.coins,
        balance,
        rules.xp_per_level,
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        GameSessionResponse {
            session,
            xp_capped: xp_awarded < score.xp,
            total_xp: outcome.total_xp,
            total_coins: outcome.total_coins,
            level: outcome.level,
            leveled_up: outcome.leveled_up,
            badges_earned: outcome.badges_earned,
        },
        "Game session recorded successfully",
    )))
}
