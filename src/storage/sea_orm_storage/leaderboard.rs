//! 排行榜候选数据

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::class_users::{Column as ClassUserColumn, Entity as ClassUsers};
use crate::entity::reward_ledger::{Column as LedgerColumn, Entity as RewardLedger};
use crate::entity::users::{Column, Entity as Users};
use crate::errors::{ClassQuestError, Result};
use crate::models::{
    class_users::entities::ClassUserRole,
    leaderboard::entities::LeaderboardCandidate,
    users::entities::{UserRole, UserStatus},
};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, QueryFilter, QuerySelect,
    sea_query::{Alias, ExprTrait},
};

/// SUM 的结果类型各库不同（Postgres 为 numeric，MySQL 为 decimal），统一转为整数
fn bigint_type(backend: DbBackend) -> Alias {
    match backend {
        DbBackend::MySql => Alias::new("SIGNED"),
        _ => Alias::new("BIGINT"),
    }
}

impl SeaOrmStorage {
    /// 参与排名的学生
    ///
    /// 班级榜只含班级学生成员，全站榜含全部正常状态的学生。
    /// `since` 为 None 时取总经验，否则取该时刻以来流水中的经验合计。
    pub async fn list_leaderboard_candidates_impl(
        &self,
        class_id: Option<i64>,
        since: Option<i64>,
    ) -> Result<Vec<LeaderboardCandidate>> {
        let mut select = Users::find()
            .filter(Column::Role.eq(UserRole::Student.to_string()))
            .filter(Column::Status.eq(UserStatus::Active.to_string()));

        let mut member_ids = None;
        if let Some(class_id) = class_id {
            let ids: Vec<i64> = ClassUsers::find()
                .select_only()
                .column(ClassUserColumn::UserId)
                .filter(ClassUserColumn::ClassId.eq(class_id))
                .filter(ClassUserColumn::Role.eq(ClassUserRole::Student.to_string()))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(|e| {
                    ClassQuestError::database_operation(format!("查询班级学生失败: {e}"))
                })?;
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            select = select.filter(Column::Id.is_in(ids.clone()));
            member_ids = Some(ids);
        }

        let users = select
            .all(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询排行榜用户失败: {e}")))?;

        let period_xp = match since {
            Some(since) => Some(self.sum_period_xp(since, member_ids).await?),
            None => None,
        };

        Ok(users
            .into_iter()
            .map(|user| {
                let xp = match &period_xp {
                    Some(sums) => sums.get(&user.id).copied().unwrap_or(0),
                    None => user.xp,
                };
                LeaderboardCandidate {
                    user_id: user.id,
                    username: user.username,
                    display_name: user.display_name,
                    level: user.level,
                    xp,
                }
            })
            .collect())
    }

    /// 按用户汇总 `since` 以来流水中的经验，`user_ids` 为 None 时不限用户
    async fn sum_period_xp(
        &self,
        since: i64,
        user_ids: Option<Vec<i64>>,
    ) -> Result<HashMap<i64, i64>> {
        let total = LedgerColumn::XpDelta
            .sum()
            .cast_as(bigint_type(self.db.get_database_backend()));

        let mut select = RewardLedger::find()
            .select_only()
            .column(LedgerColumn::UserId)
            .column_as(total, "xp")
            .filter(LedgerColumn::CreatedAt.gte(since))
            .filter(LedgerColumn::XpDelta.ne(0));
        if let Some(user_ids) = user_ids {
            select = select.filter(LedgerColumn::UserId.is_in(user_ids));
        }

        let rows: Vec<(i64, i64)> = select
            .group_by(LedgerColumn::UserId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("统计周期经验失败: {e}")))?;

        Ok(rows.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::models::class_users::entities::ClassUserRole;
    use crate::models::classes::requests::CreateClassRequest;
    use crate::models::progression::entities::{LedgerSource, RewardGrant};
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_class_board_only_has_student_members() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "coach", UserRole::Teacher).await;
        let inside = seed_user(&storage, "inside", UserRole::Student).await;
        let outside = seed_user(&storage, "outside", UserRole::Student).await;
        let class = storage
            .create_class_impl(
                teacher.id,
                CreateClassRequest {
                    teacher_id: None,
                    name: "PE".to_string(),
                    description: None,
                    grade_level: None,
                },
            )
            .await
            .unwrap();
        storage
            .join_class_impl(inside.id, class.id, ClassUserRole::Student)
            .await
            .unwrap();

        for (user_id, xp) in [(inside.id, 120), (outside.id, 300)] {
            storage
                .apply_reward_impl(
                    RewardGrant {
                        user_id,
                        xp_delta: xp,
                        coin_delta: 0,
                        source: LedgerSource::Game,
                        reference_id: None,
                    },
                    100,
                )
                .await
                .unwrap();
        }

        let class_board = storage
            .list_leaderboard_candidates_impl(Some(class.id), None)
            .await
            .unwrap();
        assert_eq!(class_board.len(), 1);
        assert_eq!(class_board[0].user_id, inside.id);
        assert_eq!(class_board[0].xp, 120);

        let global = storage
            .list_leaderboard_candidates_impl(None, None)
            .await
            .unwrap();
        assert_eq!(global.len(), 2);

        // 未来的周期起点：所有人周期经验为 0
        let future = chrono::Utc::now().timestamp() + 3600;
        let weekly = storage
            .list_leaderboard_candidates_impl(None, Some(future))
            .await
            .unwrap();
        assert!(weekly.iter().all(|c| c.xp == 0));

        // 同一用户多条流水按用户合计，班级榜不含班外学生
        storage
            .apply_reward_impl(
                RewardGrant {
                    user_id: inside.id,
                    xp_delta: 30,
                    coin_delta: 5,
                    source: LedgerSource::Assignment,
                    reference_id: None,
                },
                100,
            )
            .await
            .unwrap();
        let past = chrono::Utc::now().timestamp() - 3600;
        let class_weekly = storage
            .list_leaderboard_candidates_impl(Some(class.id), Some(past))
            .await
            .unwrap();
        assert_eq!(class_weekly.len(), 1);
        assert_eq!(class_weekly[0].xp, 150);

        let mut global_weekly: Vec<(i64, i64)> = storage
            .list_leaderboard_candidates_impl(None, Some(past))
            .await
            .unwrap()
            .into_iter()
            .map(|c| (c.user_id, c.xp))
            .collect();
        global_weekly.sort_unstable();
        assert_eq!(global_weekly, vec![(inside.id, 150), (outside.id, 300)]);
    }
}
