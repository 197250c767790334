//! 徽章评估
//!
//! 评估本身是纯函数：给定累计数据、目录和已拥有的徽章，返回新达成的徽章。

use std::sync::Arc;

use tracing::{info, warn};

use crate::models::badges::entities::{Badge, UserStats};
use crate::models::notifications::entities::{NotificationType, ReferenceType};
use crate::models::notifications::requests::CreateNotificationRequest;
use crate::services::notifications::dispatch_notifications;
use crate::storage::Storage;

/// 达到阈值且尚未拥有的徽章，按目录顺序返回
pub fn evaluate_badges(stats: &UserStats, catalog: &[Badge], owned: &[i64]) -> Vec<Badge> {
    catalog
        .iter()
        .filter(|badge| !owned.contains(&badge.id))
        .filter(|badge| stats.value_of(badge.criterion_kind) >= badge.threshold)
        .cloned()
        .collect()
}

/// 评估并授予新徽章，每个徽章发一条 badge_earned 通知
///
/// 失败只记日志，返回实际授予的徽章。
pub async fn award_earned_badges(
    storage: &Arc<dyn Storage>,
    user_id: i64,
    xp_per_level: i64,
) -> Vec<Badge> {
    let stats = match storage.get_user_stats(user_id).await {
        Ok(stats) => stats,
        Err(e) => {
            warn!("Failed to load stats for user {}: {}", user_id, e);
            return Vec::new();
        }
    };
    let catalog = match storage.list_badges().await {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!("Failed to load badge catalog: {}", e);
            return Vec::new();
        }
    };
    let owned: Vec<i64> = match storage.list_user_badges(user_id).await {
        Ok(rows) => rows.into_iter().map(|(badge_id, _)| badge_id).collect(),
        Err(e) => {
            warn!("Failed to load badges of user {}: {}", user_id, e);
            return Vec::new();
        }
    };

    let mut awarded = Vec::new();
    for badge in evaluate_badges(&stats, &catalog, &owned) {
        match storage.award_badge(user_id, &badge, xp_per_level).await {
            Ok(true) => {
                info!("User {} earned badge {}", user_id, badge.code);
                awarded.push(badge);
            }
            // 并发请求已授予
            Ok(false) => {}
            Err(e) => warn!("Failed to award badge {} to {}: {}", badge.code, user_id, e),
        }
    }

    let requests = awarded
        .iter()
        .map(|badge| {
            let mut request = CreateNotificationRequest::new(
                user_id,
                NotificationType::BadgeEarned,
                format!("New badge: {}", badge.name),
            )
            .reference(ReferenceType::Badge, badge.id);
            if badge.coin_bonus > 0 {
                request = request.content(format!("You earned {} coins", badge.coin_bonus));
            }
            request
        })
        .collect();
    dispatch_notifications(storage, requests).await;

    awarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::badges::entities::BadgeCriterion;

    fn badge(id: i64, kind: BadgeCriterion, threshold: i64) -> Badge {
        Badge {
            id,
            code: format!("badge_{id}"),
            name: format!("Badge {id}"),
            description: String::new(),
            icon: "star".to_string(),
            criterion_kind: kind,
            threshold,
            coin_bonus: 5,
        }
    }

    fn catalog() -> Vec<Badge> {
        vec![
            badge(1, BadgeCriterion::SubmissionsCount, 1),
            badge(2, BadgeCriterion::SubmissionsCount, 10),
            badge(3, BadgeCriterion::XpTotal, 500),
            badge(4, BadgeCriterion::BestStreak, 5),
            badge(5, BadgeCriterion::RaffleWins, 1),
        ]
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let stats = UserStats {
            submissions_count: 1,
            xp_total: 500,
            ..Default::default()
        };
        let earned: Vec<i64> = evaluate_badges(&stats, &catalog(), &[])
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(earned, vec![1, 3]);
    }

    #[test]
    fn test_owned_badges_are_not_awarded_again() {
        let stats = UserStats {
            submissions_count: 12,
            best_streak: 7,
            raffle_wins: 1,
            ..Default::default()
        };
        let earned: Vec<i64> = evaluate_badges(&stats, &catalog(), &[1, 5])
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(earned, vec![2, 4]);
    }

    #[test]
    fn test_fresh_user_earns_nothing() {
        assert!(evaluate_badges(&UserStats::default(), &catalog(), &[]).is_empty());
    }
}
