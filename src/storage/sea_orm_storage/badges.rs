//! 徽章存储操作

use super::progression::apply_grant;
use super::{SeaOrmStorage, now_ts};
use crate::entity::assignments::Entity as Assignments;
use crate::entity::badges::{Column, Entity as Badges};
use crate::entity::game_sessions::{Column as GameColumn, Entity as GameSessions};
use crate::entity::raffles::{Column as RaffleColumn, Entity as Raffles};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::entity::user_badges::{
    ActiveModel as UserBadgeActiveModel, Column as UserBadgeColumn, Entity as UserBadges,
};
use crate::entity::users::Entity as Users;
use crate::errors::{ClassQuestError, Result};
use crate::models::{
    badges::entities::{Badge, UserStats},
    progression::entities::{LedgerSource, RewardGrant},
    submissions::entities::SubmissionStatus,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 徽章目录
    pub async fn list_badges_impl(&self) -> Result<Vec<Badge>> {
        let rows = Badges::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询徽章失败: {e}")))?;

        Ok(rows.into_iter().filter_map(|m| m.into_badge()).collect())
    }

    pub async fn list_user_badges_impl(&self, user_id: i64) -> Result<Vec<(i64, i64)>> {
        UserBadges::find()
            .select_only()
            .column(UserBadgeColumn::BadgeId)
            .column(UserBadgeColumn::EarnedAt)
            .filter(UserBadgeColumn::UserId.eq(user_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询用户徽章失败: {e}")))
    }

    pub async fn count_user_badges_impl(&self, user_id: i64) -> Result<i64> {
        let count = UserBadges::find()
            .filter(UserBadgeColumn::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("统计用户徽章失败: {e}")))?;

        Ok(count as i64)
    }

    /// 汇总评估徽章所需的数据
    pub async fn get_user_stats_impl(&self, user_id: i64) -> Result<UserStats> {
        let xp_total = Users::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询用户失败: {e}")))?
            .map(|u| u.xp)
            .unwrap_or(0);

        let submissions_count = Submissions::find()
            .filter(SubmissionColumn::StudentId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("统计提交失败: {e}")))?;

        // 满分：分数达到作业满分
        let graded = Submissions::find()
            .find_also_related(Assignments)
            .filter(SubmissionColumn::StudentId.eq(user_id))
            .filter(SubmissionColumn::Status.eq(SubmissionStatus::Graded.to_string()))
            .all(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询评分记录失败: {e}")))?;
        let perfect_scores = graded
            .iter()
            .filter(|(submission, assignment)| {
                matches!(
                    (submission.score, assignment),
                    (Some(score), Some(assignment)) if score >= assignment.max_score
                )
            })
            .count();

        let games_played = GameSessions::find()
            .filter(GameColumn::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("统计小游戏失败: {e}")))?;

        let best_streak = GameSessions::find()
            .select_only()
            .column_as(GameColumn::BestStreak.max(), "best_streak")
            .filter(GameColumn::UserId.eq(user_id))
            .into_tuple::<Option<i32>>()
            .one(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询最佳连击失败: {e}")))?
            .flatten()
            .unwrap_or(0);

        let raffle_wins = Raffles::find()
            .filter(RaffleColumn::WinnerId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("统计中奖次数失败: {e}")))?;

        Ok(UserStats {
            submissions_count: submissions_count as i64,
            perfect_scores: perfect_scores as i64,
            xp_total,
            games_played: games_played as i64,
            best_streak: i64::from(best_streak),
            raffle_wins: raffle_wins as i64,
        })
    }

    /// 授予徽章，已拥有时返回 false
    pub async fn award_badge_impl(
        &self,
        user_id: i64,
        badge: &Badge,
        xp_per_level: i64,
    ) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("开启事务失败: {e}")))?;

        let owned = UserBadges::find()
            .filter(UserBadgeColumn::UserId.eq(user_id))
            .filter(UserBadgeColumn::BadgeId.eq(badge.id))
            .count(&txn)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询用户徽章失败: {e}")))?;
        if owned > 0 {
            return Ok(false);
        }

        UserBadgeActiveModel {
            user_id: Set(user_id),
            badge_id: Set(badge.id),
            earned_at: Set(now_ts()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| ClassQuestError::database_operation(format!("授予徽章失败: {e}")))?;

        if badge.coin_bonus > 0 {
            apply_grant(
                &txn,
                &RewardGrant {
                    user_id,
                    xp_delta: 0,
                    coin_delta: i64::from(badge.coin_bonus),
                    source: LedgerSource::Badge,
                    reference_id: Some(badge.id),
                },
                xp_per_level,
            )
            .await?;
        }

        txn.commit()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::models::badges::entities::BadgeCriterion;
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_catalog_is_seeded() {
        let storage = memory_storage().await;
        let badges = storage.list_badges_impl().await.unwrap();

        assert_eq!(badges.len(), 10);
        assert!(
            badges
                .iter()
                .any(|b| b.code == "first_steps" && b.criterion_kind == BadgeCriterion::SubmissionsCount)
        );
    }

    #[tokio::test]
    async fn test_badge_awarded_once_with_coin_bonus() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "jo", UserRole::Student).await;
        let badges = storage.list_badges_impl().await.unwrap();
        let badge = badges
            .iter()
            .find(|b| b.code == "first_steps")
            .unwrap();

        assert!(storage.award_badge_impl(user.id, badge, 100).await.unwrap());
        assert!(!storage.award_badge_impl(user.id, badge, 100).await.unwrap());

        let stored = storage.get_user_by_id_impl(user.id).await.unwrap().unwrap();
        assert_eq!(stored.coins, i64::from(badge.coin_bonus));
        assert_eq!(storage.count_user_badges_impl(user.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_stats_for_fresh_user() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "new", UserRole::Student).await;
        let stats = storage.get_user_stats_impl(user.id).await.unwrap();
        assert_eq!(stats, Default::default());
    }
}
