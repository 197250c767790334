//! 经验、金币与流水

use super::{SeaOrmStorage, now_ts};
use crate::entity::reward_ledger::{ActiveModel as LedgerActiveModel, Column, Entity as RewardLedger};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{ClassQuestError, Result};
use crate::models::{
    PaginationInfo,
    progression::{
        entities::{BalanceChange, LedgerSource, RewardGrant},
        level::level_for_xp,
        responses::LedgerListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};

/// 在给定连接（通常是事务）上应用一次变动
///
/// 余额以读到的旧值为条件更新，并发修改时返回冲突而不是写出负数。
pub(super) async fn apply_grant<C: ConnectionTrait>(
    conn: &C,
    grant: &RewardGrant,
    xp_per_level: i64,
) -> Result<BalanceChange> {
    let user = Users::find_by_id(grant.user_id)
        .one(conn)
        .await
        .map_err(|e| ClassQuestError::database_operation(format!("查询用户失败: {e}")))?
        .ok_or_else(|| ClassQuestError::not_found(format!("User {} not found", grant.user_id)))?;

    let coins = user.coins + grant.coin_delta;
    if coins < 0 {
        return Err(ClassQuestError::insufficient_coins(format!(
            "Not enough coins: {} needed, {} available",
            -grant.coin_delta, user.coins
        )));
    }
    let xp = (user.xp + grant.xp_delta).max(0);
    let new_level = level_for_xp(xp, xp_per_level);
    let now = now_ts();

    let updated = Users::update_many()
        .col_expr(UserColumn::Xp, Expr::value(xp))
        .col_expr(UserColumn::Coins, Expr::value(coins))
        .col_expr(UserColumn::Level, Expr::value(new_level))
        .col_expr(UserColumn::UpdatedAt, Expr::value(now))
        .filter(UserColumn::Id.eq(user.id))
        .filter(UserColumn::Xp.eq(user.xp))
        .filter(UserColumn::Coins.eq(user.coins))
        .exec(conn)
        .await
        .map_err(|e| ClassQuestError::database_operation(format!("更新用户余额失败: {e}")))?;

    if updated.rows_affected == 0 {
        return Err(ClassQuestError::conflict(
            "Balance changed concurrently, please retry",
        ));
    }

    if grant.xp_delta != 0 || grant.coin_delta != 0 {
        LedgerActiveModel {
            user_id: Set(grant.user_id),
            xp_delta: Set(grant.xp_delta),
            coin_delta: Set(grant.coin_delta),
            source: Set(grant.source.to_string()),
            reference_id: Set(grant.reference_id),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| ClassQuestError::database_operation(format!("写入流水失败: {e}")))?;
    }

    Ok(BalanceChange {
        xp,
        coins,
        old_level: user.level,
        new_level,
    })
}

/// 锁住用户行，直到事务结束
///
/// 以一次无变化的 UPDATE 取得写锁，同一用户的并发事务在此排队。
/// 用户不存在时不报错，交给后续的 [`apply_grant`]。
pub(super) async fn lock_user_row<C: ConnectionTrait>(conn: &C, user_id: i64) -> Result<()> {
    Users::update_many()
        .col_expr(UserColumn::UpdatedAt, Expr::col(UserColumn::UpdatedAt))
        .filter(UserColumn::Id.eq(user_id))
        .exec(conn)
        .await
        .map_err(|e| ClassQuestError::database_operation(format!("锁定用户失败: {e}")))?;
    Ok(())
}

/// 某来源自 `since` 起获得的经验
pub(super) async fn sum_xp_since<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    source: LedgerSource,
    since: i64,
) -> Result<i64> {
    let deltas: Vec<i64> = RewardLedger::find()
        .select_only()
        .column(Column::XpDelta)
        .filter(Column::UserId.eq(user_id))
        .filter(Column::Source.eq(source.to_string()))
        .filter(Column::CreatedAt.gte(since))
        .into_tuple()
        .all(conn)
        .await
        .map_err(|e| ClassQuestError::database_operation(format!("统计经验失败: {e}")))?;

    Ok(deltas.into_iter().sum())
}

impl SeaOrmStorage {
    /// 单独的一次变动（独立事务）
    #[cfg(test)]
    pub async fn apply_reward_impl(
        &self,
        grant: RewardGrant,
        xp_per_level: i64,
    ) -> Result<BalanceChange> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("开启事务失败: {e}")))?;

        let change = apply_grant(&txn, &grant, xp_per_level).await?;

        txn.commit()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(change)
    }

    pub async fn list_ledger_with_pagination_impl(
        &self,
        user_id: i64,
        page: u64,
        size: u64,
    ) -> Result<LedgerListResponse> {
        let paginator = RewardLedger::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询流水总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询流水页数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询流水失败: {e}")))?;

        Ok(LedgerListResponse {
            items: rows.into_iter().map(|m| m.into_ledger_entry()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    #[cfg(test)]
    pub async fn sum_xp_since_impl(
        &self,
        user_id: i64,
        source: LedgerSource,
        since: i64,
    ) -> Result<i64> {
        sum_xp_since(&self.db, user_id, source, since).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{give_coins, memory_storage, seed_user};
    use crate::models::progression::entities::{LedgerSource, RewardGrant};
    use crate::models::users::entities::UserRole;

    fn grant(user_id: i64, xp: i64, coins: i64, source: LedgerSource) -> RewardGrant {
        RewardGrant {
            user_id,
            xp_delta: xp,
            coin_delta: coins,
            source,
            reference_id: None,
        }
    }

    #[tokio::test]
    async fn test_reward_updates_totals_level_and_ledger() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "kai", UserRole::Student).await;

        let change = storage
            .apply_reward_impl(grant(user.id, 320, 15, LedgerSource::Assignment), 100)
            .await
            .unwrap();
        assert_eq!(change.xp, 320);
        assert_eq!(change.coins, 15);
        assert_eq!(change.old_level, 1);
        assert_eq!(change.new_level, 3);
        assert!(change.leveled_up());

        let stored = storage.get_user_by_id_impl(user.id).await.unwrap().unwrap();
        assert_eq!((stored.xp, stored.coins, stored.level), (320, 15, 3));

        let ledger = storage
            .list_ledger_with_pagination_impl(user.id, 1, 10)
            .await
            .unwrap();
        assert_eq!(ledger.pagination.total, 1);
        assert_eq!(ledger.items[0].xp_delta, 320);
    }

    #[tokio::test]
    async fn test_overspending_fails_and_writes_nothing() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "noa", UserRole::Student).await;
        give_coins(&storage, user.id, 30).await;

        let err = storage
            .apply_reward_impl(grant(user.id, 0, -31, LedgerSource::Purchase), 100)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E015");

        let stored = storage.get_user_by_id_impl(user.id).await.unwrap().unwrap();
        assert_eq!(stored.coins, 30);
        let ledger = storage
            .list_ledger_with_pagination_impl(user.id, 1, 10)
            .await
            .unwrap();
        assert_eq!(ledger.pagination.total, 1);

        // 恰好花光是允许的
        let change = storage
            .apply_reward_impl(grant(user.id, 0, -30, LedgerSource::Purchase), 100)
            .await
            .unwrap();
        assert_eq!(change.coins, 0);
    }

    #[tokio::test]
    async fn test_sum_xp_since_filters_source() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "eli", UserRole::Student).await;
        storage
            .apply_reward_impl(grant(user.id, 40, 0, LedgerSource::Game), 100)
            .await
            .unwrap();
        storage
            .apply_reward_impl(grant(user.id, 25, 0, LedgerSource::Game), 100)
            .await
            .unwrap();
        storage
            .apply_reward_impl(grant(user.id, 90, 0, LedgerSource::Assignment), 100)
            .await
            .unwrap();

        let since = chrono::Utc::now().timestamp() - 60;
        assert_eq!(
            storage
                .sum_xp_since_impl(user.id, LedgerSource::Game, since)
                .await
                .unwrap(),
            65
        );
        assert_eq!(
            storage
                .sum_xp_since_impl(user.id, LedgerSource::Game, since + 3600)
                .await
                .unwrap(),
            0
        );
    }
}
