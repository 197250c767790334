//! 奖励入账之后的后续处理
//!
//! 评分和小游戏都会调用：升级通知、徽章评估，最后汇总成 [`RewardOutcome`]。

use std::sync::Arc;

use tracing::warn;

use crate::models::notifications::entities::NotificationType;
use crate::models::notifications::requests::CreateNotificationRequest;
use crate::models::progression::entities::{BalanceChange, RewardOutcome};
use crate::services::badges::award_earned_badges;
use crate::services::notifications::dispatch_notifications;
use crate::storage::Storage;

pub async fn settle_reward(
    storage: &Arc<dyn Storage>,
    user_id: i64,
    xp_awarded: i64,
    coins_awarded: i64,
    balance: BalanceChange,
    xp_per_level: i64,
) -> RewardOutcome {
    if balance.leveled_up() {
        dispatch_notifications(storage, vec![level_up_notification(user_id, &balance)]).await;
    }

    let badges_earned = award_earned_badges(storage, user_id, xp_per_level).await;

    let mut outcome = RewardOutcome {
        xp_awarded,
        coins_awarded,
        total_xp: balance.xp,
        total_coins: balance.coins,
        level: balance.new_level,
        leveled_up: balance.leveled_up(),
        badges_earned,
    };

    // 徽章奖励了金币，余额以数据库为准
    if !outcome.badges_earned.is_empty() {
        match storage.get_user_by_id(user_id).await {
            Ok(Some(user)) => {
                outcome.total_xp = user.xp;
                outcome.total_coins = user.coins;
                outcome.leveled_up |= user.level > balance.new_level;
                outcome.level = user.level;
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to reload balance of user {}: {}", user_id, e),
        }
    }

    outcome
}

fn level_up_notification(user_id: i64, balance: &BalanceChange) -> CreateNotificationRequest {
    CreateNotificationRequest::new(
        user_id,
        NotificationType::LevelUp,
        format!("Level up! You reached level {}", balance.new_level),
    )
    .content(format!("{} XP in total", balance.xp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_up_notification_text() {
        let balance = BalanceChange {
            xp: 320,
            coins: 12,
            old_level: 2,
            new_level: 3,
        };
        let request = level_up_notification(9, &balance);
        assert_eq!(request.user_id, 9);
        assert_eq!(request.notification_type, NotificationType::LevelUp);
        assert_eq!(request.title, "Level up! You reached level 3");
        assert_eq!(request.content.as_deref(), Some("320 XP in total"));
    }
}
