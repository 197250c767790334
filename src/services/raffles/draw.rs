use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use rand::Rng;
use tracing::{info, warn};

use super::{RaffleService, load_raffle};
use crate::config::AppConfig;
use crate::errors::ClassQuestError;
use crate::models::common::response::{error_response, error_response_with};
use crate::models::notifications::entities::{NotificationType, ReferenceType};
use crate::models::notifications::requests::CreateNotificationRequest;
use crate::models::raffles::entities::{DrawOutcome, RaffleStatus};
use crate::models::raffles::responses::DrawRaffleResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::badges::award_earned_badges;
use crate::services::classes::access::require_class_manager;
use crate::services::current_user;
use crate::services::notifications::dispatch_notifications;
use crate::storage::Storage;

pub async fn draw_raffle(
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
    if raffle.status != RaffleStatus::Open {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::RaffleNotOpen,
            "Raffle is not open",
        )));
    }

    let seed: u64 = rand::rng().random();
    let outcome = match storage.draw_raffle(raffle.id, seed).await {
        Ok(outcome) => outcome,
        // 已被并发开奖或取消
        Err(ClassQuestError::InvalidState(msg)) => {
            return Ok(HttpResponse::Conflict()
                .json(ApiResponse::error_empty(ErrorCode::RaffleNotOpen, msg)));
        }
        Err(e @ ClassQuestError::Validation(_)) => {
            return Ok(error_response_with(&e, ErrorCode::RaffleNoEntries));
        }
        Err(e) => return Ok(error_response(&e)),
    };
    info!(
        "Raffle {} drawn by {}: winner {} out of {} entries",
        outcome.raffle.id, user.id, outcome.winner_id, outcome.total_entries
    );

    dispatch_notifications(&storage, draw_notifications(&outcome)).await;
    award_earned_badges(
        &storage,
        outcome.winner_id,
        AppConfig::get().gamification.xp_per_level,
    )
    .await;

    let winner_username = winner_name(&storage, outcome.winner_id).await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        DrawRaffleResponse {
            participant_count: outcome.participants.len() as i64,
            total_entries: outcome.total_entries,
            winner_id: outcome.winner_id,
            winner_username,
            raffle: outcome.raffle,
        },
        "Raffle drawn successfully",
    )))
}

/// 中奖者收到 raffle_won，其他参与者收到 raffle_drawn
fn draw_notifications(outcome: &DrawOutcome) -> Vec<CreateNotificationRequest> {
    let raffle = &outcome.raffle;
    outcome
        .participants
        .iter()
        .map(|&user_id| {
            let request = if user_id == outcome.winner_id {
                CreateNotificationRequest::new(
                    user_id,
                    NotificationType::RaffleWon,
                    format!("You won the raffle: {}", raffle.title),
                )
                .content(format!("Prize: {}", raffle.prize))
            } else {
                CreateNotificationRequest::new(
                    user_id,
                    NotificationType::RaffleDrawn,
                    format!("Raffle drawn: {}", raffle.title),
                )
                .content("Better luck next time!")
            };
            request.reference(ReferenceType::Raffle, raffle.id)
        })
        .collect()
}

async fn winner_name(storage: &Arc<dyn Storage>, winner_id: i64) -> Option<String> {
    match storage.get_user_by_id(winner_id).await {
        Ok(user) => user.map(|u| u.username),
        Err(e) => {
            warn!("Failed to load raffle winner {}: {}", winner_id, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::raffles::entities::Raffle;

    #[test]
    fn test_draw_notifications_split_winner_and_others() {
        let now = chrono::Utc::now();
        let outcome = DrawOutcome {
            raffle: Raffle {
                id: 4,
                class_id: 1,
                created_by: 1,
                title: "Friday prize".to_string(),
                prize: "Homework pass".to_string(),
                entry_cost: 5,
                max_entries_per_student: None,
                status: RaffleStatus::Drawn,
                closes_at: None,
                winner_id: Some(2),
                drawn_at: Some(now),
                created_at: now,
                updated_at: now,
            },
            winner_id: 2,
            total_entries: 6,
            participants: vec![1, 2, 3],
        };
        let notifications = draw_notifications(&outcome);
        assert_eq!(notifications.len(), 3);
        let won: Vec<i64> = notifications
            .iter()
            .filter(|n| n.notification_type == NotificationType::RaffleWon)
            .map(|n| n.user_id)
            .collect();
        assert_eq!(won, vec![2]);
        assert!(
            notifications
                .iter()
                .all(|n| n.reference_id == Some(4) && n.reference_type == Some(ReferenceType::Raffle))
        );
    }
}
