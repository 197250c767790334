use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProgressService;
use crate::config::AppConfig;
use crate::models::common::response::error_response;
use crate::models::progression::level::progress_for_xp;
use crate::models::progression::responses::ProgressResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;

pub async fn get_my_progress(
    service: &ProgressService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    // 缓存中的用户余额可能过期，重新读取
    let fresh = match storage.get_user_by_id(user.id).await {
        Ok(Some(fresh)) => fresh,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    };
    let badge_count = match storage.count_user_badges(user.id).await {
        Ok(count) => count,
        Err(e) => return Ok(error_response(&e)),
    };

    let progress = progress_for_xp(fresh.xp, AppConfig::get().gamification.xp_per_level);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ProgressResponse {
            xp: fresh.xp,
            coins: fresh.coins,
            level: progress.level,
            progress,
            badge_count,
        },
        "Progress retrieved successfully",
    )))
}
