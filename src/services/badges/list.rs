use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::BadgeService;
use crate::models::badges::entities::{Badge, BadgeWithStatus};
use crate::models::badges::responses::BadgeListResponse;
use crate::models::common::response::error_response;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;

pub async fn list_my_badges(
    service: &BadgeService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    badge_list(service, request, user.id).await
}

pub async fn list_user_badges(
    service: &BadgeService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.get_user_by_id(user_id).await {
        Ok(Some(_)) => badge_list(service, request, user_id).await,
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn badge_list(
    service: &BadgeService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let catalog = match storage.list_badges().await {
        Ok(catalog) => catalog,
        Err(e) => return Ok(error_response(&e)),
    };
    let earned = match storage.list_user_badges(user_id).await {
        Ok(earned) => earned,
        Err(e) => return Ok(error_response(&e)),
    };

    let items = with_status(catalog, &earned);
    let earned_count = items.iter().filter(|item| item.earned).count() as i64;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        BadgeListResponse {
            user_id,
            earned_count,
            items,
        },
        "Badges retrieved successfully",
    )))
}

/// 合并目录与已获得记录 (badge_id, earned_at)
fn with_status(catalog: Vec<Badge>, earned: &[(i64, i64)]) -> Vec<BadgeWithStatus> {
    let earned: HashMap<i64, i64> = earned.iter().copied().collect();
    catalog
        .into_iter()
        .map(|badge| {
            let earned_at = earned
                .get(&badge.id)
                .and_then(|ts| chrono::DateTime::from_timestamp(*ts, 0));
            BadgeWithStatus {
                earned: earned.contains_key(&badge.id),
                earned_at,
                badge,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::badges::entities::BadgeCriterion;

    #[test]
    fn test_with_status_marks_earned() {
        let catalog = vec![
            Badge {
                id: 1,
                code: "first_steps".to_string(),
                name: "First Steps".to_string(),
                description: String::new(),
                icon: "footprints".to_string(),
                criterion_kind: BadgeCriterion::SubmissionsCount,
                threshold: 1,
                coin_bonus: 10,
            },
            Badge {
                id: 2,
                code: "lucky".to_string(),
                name: "Lucky".to_string(),
                description: String::new(),
                icon: "clover".to_string(),
                criterion_kind: BadgeCriterion::RaffleWins,
                threshold: 1,
                coin_bonus: 0,
            },
        ];
        let items = with_status(catalog, &[(2, 1_700_000_000)]);
        assert!(!items[0].earned);
        assert!(items[0].earned_at.is_none());
        assert!(items[1].earned);
        assert_eq!(items[1].earned_at.map(|t| t.timestamp()), Some(1_700_000_000));
    }
}
