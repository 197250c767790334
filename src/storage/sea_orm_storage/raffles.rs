//! 班级抽奖存储操作

use super::progression::apply_grant;
use super::{SeaOrmStorage, now_ts};
use crate::entity::raffle_entries::{
    ActiveModel as EntryActiveModel, Column as EntryColumn, Entity as RaffleEntries,
};
use crate::entity::raffles::{ActiveModel, Column, Entity as Raffles};
use crate::errors::{ClassQuestError, Result};
use crate::models::{
    progression::entities::{LedgerSource, RewardGrant},
    raffles::{
        entities::{DrawOutcome, Raffle, RaffleEntry, RaffleStatus},
        requests::CreateRaffleRequest,
        weighting::pick_weighted,
    },
};
use rand::{SeedableRng, rngs::StdRng};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait, sea_query::Expr,
};

/// 条件更新失败时区分“不存在”和“状态不对”
async fn explain_missed_update<C: ConnectionTrait>(conn: &C, raffle_id: i64) -> ClassQuestError {
    match Raffles::find_by_id(raffle_id).one(conn).await {
        Ok(Some(model)) => ClassQuestError::invalid_state(format!(
            "Raffle is already {}",
            model.status
        )),
        Ok(None) => ClassQuestError::not_found(format!("Raffle {raffle_id} not found")),
        Err(e) => ClassQuestError::database_operation(format!("查询抽奖失败: {e}")),
    }
}

/// 锁住仍为 open 的抽奖行，直到事务结束
///
/// 买券、开奖、取消都先经过这里，彼此串行；状态已变时返回对应错误。
async fn claim_open_raffle<C: ConnectionTrait>(conn: &C, raffle_id: i64) -> Result<Raffle> {
    let claimed = Raffles::update_many()
        .col_expr(Column::UpdatedAt, Expr::col(Column::UpdatedAt))
        .filter(Column::Id.eq(raffle_id))
        .filter(Column::Status.eq(RaffleStatus::Open.to_string()))
        .exec(conn)
        .await
        .map_err(|e| ClassQuestError::database_operation(format!("锁定抽奖失败: {e}")))?;

    if claimed.rows_affected == 0 {
        return Err(explain_missed_update(conn, raffle_id).await);
    }

    Raffles::find_by_id(raffle_id)
        .one(conn)
        .await
        .map_err(|e| ClassQuestError::database_operation(format!("查询抽奖失败: {e}")))?
        .map(|m| m.into_raffle())
        .ok_or_else(|| ClassQuestError::not_found(format!("Raffle {raffle_id} not found")))
}

async fn find_entries<C: ConnectionTrait>(conn: &C, raffle_id: i64) -> Result<Vec<RaffleEntry>> {
    let rows = RaffleEntries::find()
        .filter(EntryColumn::RaffleId.eq(raffle_id))
        .order_by_asc(EntryColumn::Id)
        .all(conn)
        .await
        .map_err(|e| ClassQuestError::database_operation(format!("查询抽奖券失败: {e}")))?;

    Ok(rows.into_iter().map(|m| m.into_raffle_entry()).collect())
}

impl SeaOrmStorage {
    pub async fn create_raffle_impl(
        &self,
        created_by: i64,
        req: CreateRaffleRequest,
    ) -> Result<Raffle> {
        let now = now_ts();

        let result = ActiveModel {
            class_id: Set(req.class_id),
            created_by: Set(created_by),
            title: Set(req.title.trim().to_string()),
            prize: Set(req.prize.trim().to_string()),
            entry_cost: Set(req.entry_cost),
            max_entries_per_student: Set(req.max_entries_per_student),
            status: Set(RaffleStatus::Open.to_string()),
            closes_at: Set(req.closes_at.map(|d| d.timestamp())),
            winner_id: Set(None),
            drawn_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| ClassQuestError::database_operation(format!("创建抽奖失败: {e}")))?;

        Ok(result.into_raffle())
    }

    pub async fn get_raffle_by_id_impl(&self, raffle_id: i64) -> Result<Option<Raffle>> {
        let result = Raffles::find_by_id(raffle_id)
            .one(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询抽奖失败: {e}")))?;

        Ok(result.map(|m| m.into_raffle()))
    }

    /// `class_ids` 为 None 时不限班级
    pub async fn list_raffles_impl(
        &self,
        class_ids: Option<Vec<i64>>,
        status: Option<RaffleStatus>,
    ) -> Result<Vec<Raffle>> {
        let mut select = Raffles::find();

        if let Some(class_ids) = class_ids {
            if class_ids.is_empty() {
                return Ok(Vec::new());
            }
            select = select.filter(Column::ClassId.is_in(class_ids));
        }
        if let Some(status) = status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let rows = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询抽奖列表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_raffle()).collect())
    }

    pub async fn list_raffle_entries_impl(&self, raffle_id: i64) -> Result<Vec<RaffleEntry>> {
        find_entries(&self.db, raffle_id).await
    }

    /// 购买抽奖券：扣金币与累加券数在同一事务
    pub async fn enter_raffle_impl(
        &self,
        raffle_id: i64,
        user_id: i64,
        count: i32,
        xp_per_level: i64,
    ) -> Result<(RaffleEntry, i64)> {
        if count < 1 {
            return Err(ClassQuestError::validation("Entry count must be at least 1"));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("开启事务失败: {e}")))?;

        let raffle = claim_open_raffle(&txn, raffle_id).await?;
        if !raffle.accepts_entries(chrono::Utc::now()) {
            return Err(ClassQuestError::invalid_state(
                "Raffle is not accepting entries",
            ));
        }

        let existing = RaffleEntries::find()
            .filter(EntryColumn::RaffleId.eq(raffle_id))
            .filter(EntryColumn::UserId.eq(user_id))
            .one(&txn)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询抽奖券失败: {e}")))?;

        let held = existing.as_ref().map_or(0, |e| e.entries);
        if let Some(max) = raffle.max_entries_per_student
            && held + count > max
        {
            return Err(ClassQuestError::validation(format!(
                "At most {max} entries per student ({held} already held)"
            )));
        }

        let cost = raffle.entry_cost * i64::from(count);
        let balance = apply_grant(
            &txn,
            &RewardGrant {
                user_id,
                xp_delta: 0,
                coin_delta: -cost,
                source: LedgerSource::RaffleEntry,
                reference_id: Some(raffle_id),
            },
            xp_per_level,
        )
        .await?;

        let now = now_ts();
        let saved = match existing {
            Some(model) => {
                let entries = model.entries + count;
                let coins_spent = model.coins_spent + cost;
                let mut active = model.into_active_model();
                active.entries = Set(entries);
                active.coins_spent = Set(coins_spent);
                active.updated_at = Set(now);
                active.update(&txn).await
            }
            None => {
                EntryActiveModel {
                    raffle_id: Set(raffle_id),
                    user_id: Set(user_id),
                    entries: Set(count),
                    coins_spent: Set(cost),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
            }
        }
        .map_err(|e| ClassQuestError::database_operation(format!("写入抽奖券失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((saved.into_raffle_entry(), balance.coins))
    }

    /// 开奖：锁住抽奖后读取全部抽奖券、抽取并写入中奖者，都在同一事务
    ///
    /// `seed` 决定本次抽取的随机序列。
    pub async fn draw_raffle_impl(&self, raffle_id: i64, seed: u64) -> Result<DrawOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("开启事务失败: {e}")))?;

        claim_open_raffle(&txn, raffle_id).await?;
        let entries = find_entries(&txn, raffle_id).await?;
        let winner_id = pick_weighted(&entries, &mut StdRng::seed_from_u64(seed))
            .ok_or_else(|| ClassQuestError::validation("Raffle has no entries"))?;

        let now = now_ts();
        Raffles::update_many()
            .col_expr(Column::Status, Expr::value(RaffleStatus::Drawn.to_string()))
            .col_expr(Column::WinnerId, Expr::value(winner_id))
            .col_expr(Column::DrawnAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(raffle_id))
            .exec(&txn)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("写入开奖结果失败: {e}")))?;

        let raffle = Raffles::find_by_id(raffle_id)
            .one(&txn)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询抽奖失败: {e}")))?
            .ok_or_else(|| ClassQuestError::not_found(format!("Raffle {raffle_id} not found")))?;

        txn.commit()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("提交事务失败: {e}")))?;

        let live: Vec<&RaffleEntry> = entries.iter().filter(|e| e.entries > 0).collect();
        Ok(DrawOutcome {
            raffle: raffle.into_raffle(),
            winner_id,
            total_entries: live.iter().map(|e| i64::from(e.entries)).sum(),
            participants: live.iter().map(|e| e.user_id).collect(),
        })
    }

    /// 取消抽奖并退还全部金币
    pub async fn cancel_raffle_impl(
        &self,
        raffle_id: i64,
        xp_per_level: i64,
    ) -> Result<(Raffle, i64, i64)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("开启事务失败: {e}")))?;

        let now = now_ts();
        let result = Raffles::update_many()
            .col_expr(
                Column::Status,
                Expr::value(RaffleStatus::Cancelled.to_string()),
            )
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(raffle_id))
            .filter(Column::Status.eq(RaffleStatus::Open.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("取消抽奖失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(explain_missed_update(&txn, raffle_id).await);
        }

        let entries = RaffleEntries::find()
            .filter(EntryColumn::RaffleId.eq(raffle_id))
            .all(&txn)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询抽奖券失败: {e}")))?;

        let mut refunded_students = 0;
        let mut refunded_coins = 0;
        for entry in entries.iter().filter(|e| e.coins_spent > 0) {
            apply_grant(
                &txn,
                &RewardGrant {
                    user_id: entry.user_id,
                    xp_delta: 0,
                    coin_delta: entry.coins_spent,
                    source: LedgerSource::RaffleRefund,
                    reference_id: Some(raffle_id),
                },
                xp_per_level,
            )
            .await?;
            refunded_students += 1;
            refunded_coins += entry.coins_spent;
        }

        let raffle = Raffles::find_by_id(raffle_id)
            .one(&txn)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询抽奖失败: {e}")))?
            .ok_or_else(|| ClassQuestError::not_found(format!("Raffle {raffle_id} not found")))?;

        txn.commit()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((raffle.into_raffle(), refunded_students, refunded_coins))
    }
}

#[cfg(test)]
mod tests {
    use super::super::SeaOrmStorage;
    use super::super::test_support::{give_coins, memory_storage, seed_user};
    use crate::models::classes::requests::CreateClassRequest;
    use crate::models::raffles::{entities::RaffleStatus, requests::CreateRaffleRequest};
    use crate::models::users::entities::{User, UserRole};

    async fn open_raffle(storage: &SeaOrmStorage, cap: Option<i32>) -> (User, i64) {
        let teacher = seed_user(storage, "ms_ito", UserRole::Teacher).await;
        let class = storage
            .create_class_impl(
                teacher.id,
                CreateClassRequest {
                    teacher_id: None,
                    name: "3A".to_string(),
                    description: None,
                    grade_level: Some(3),
                },
            )
            .await
            .unwrap();
        let raffle = storage
            .create_raffle_impl(
                teacher.id,
                CreateRaffleRequest {
                    class_id: class.id,
                    title: "Friday prize".to_string(),
                    prize: "Pick the class song".to_string(),
                    entry_cost: 5,
                    max_entries_per_student: cap,
                    closes_at: None,
                },
            )
            .await
            .unwrap();
        (teacher, raffle.id)
    }

    #[tokio::test]
    async fn test_entries_spend_coins_and_respect_cap() {
        let storage = memory_storage().await;
        let (_, raffle_id) = open_raffle(&storage, Some(3)).await;
        let student = seed_user(&storage, "lily", UserRole::Student).await;
        give_coins(&storage, student.id, 12).await;

        let (entry, coins) = storage
            .enter_raffle_impl(raffle_id, student.id, 2, 100)
            .await
            .unwrap();
        assert_eq!((entry.entries, entry.coins_spent, coins), (2, 10, 2));

        // 超过上限
        let err = storage
            .enter_raffle_impl(raffle_id, student.id, 2, 100)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");

        // 金币不足，什么都不写
        let err = storage
            .enter_raffle_impl(raffle_id, student.id, 1, 100)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E015");
        let entries = storage.list_raffle_entries_impl(raffle_id).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entries, 2);
    }

    #[tokio::test]
    async fn test_draw_only_once_and_blocks_entries() {
        let storage = memory_storage().await;
        let (_, raffle_id) = open_raffle(&storage, None).await;
        let student = seed_user(&storage, "finn", UserRole::Student).await;
        give_coins(&storage, student.id, 50).await;
        storage
            .enter_raffle_impl(raffle_id, student.id, 1, 100)
            .await
            .unwrap();

        let outcome = storage.draw_raffle_impl(raffle_id, 11).await.unwrap();
        let drawn = outcome.raffle;
        assert_eq!(drawn.status, RaffleStatus::Drawn);
        assert_eq!(drawn.winner_id, Some(student.id));
        assert!(drawn.drawn_at.is_some());
        assert_eq!(outcome.participants, vec![student.id]);

        let err = storage.draw_raffle_impl(raffle_id, 11).await.unwrap_err();
        assert_eq!(err.code(), "E016");

        let err = storage
            .enter_raffle_impl(raffle_id, student.id, 1, 100)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E016");

        let err = storage.draw_raffle_impl(9999, 11).await.unwrap_err();
        assert_eq!(err.code(), "E008");
    }

    #[tokio::test]
    async fn test_cancel_refunds_everyone() {
        let storage = memory_storage().await;
        let (_, raffle_id) = open_raffle(&storage, None).await;
        let a = seed_user(&storage, "a", UserRole::Student).await;
        let b = seed_user(&storage, "b", UserRole::Student).await;
        for user in [&a, &b] {
            give_coins(&storage, user.id, 40).await;
        }
        storage.enter_raffle_impl(raffle_id, a.id, 3, 100).await.unwrap();
        storage.enter_raffle_impl(raffle_id, b.id, 1, 100).await.unwrap();
        storage.enter_raffle_impl(raffle_id, b.id, 1, 100).await.unwrap();

        let (raffle, students, coins) = storage.cancel_raffle_impl(raffle_id, 100).await.unwrap();
        assert_eq!(raffle.status, RaffleStatus::Cancelled);
        assert_eq!((students, coins), (2, 25));

        for user in [&a, &b] {
            let stored = storage.get_user_by_id_impl(user.id).await.unwrap().unwrap();
            assert_eq!(stored.coins, 40);
        }

        let err = storage.cancel_raffle_impl(raffle_id, 100).await.unwrap_err();
        assert_eq!(err.code(), "E016");
    }

    #[tokio::test]
    async fn test_draw_without_entries_keeps_raffle_open() {
        let storage = memory_storage().await;
        let (_, raffle_id) = open_raffle(&storage, None).await;

        let err = storage.draw_raffle_impl(raffle_id, 3).await.unwrap_err();
        assert_eq!(err.code(), "E007");
        let raffle = storage.get_raffle_by_id_impl(raffle_id).await.unwrap().unwrap();
        assert_eq!(raffle.status, RaffleStatus::Open);
    }

    #[tokio::test]
    async fn test_entry_racing_a_draw_is_counted_or_rejected() {
        let storage = memory_storage().await;
        let (_, raffle_id) = open_raffle(&storage, None).await;
        let early = seed_user(&storage, "early", UserRole::Student).await;
        let late = seed_user(&storage, "late", UserRole::Student).await;
        give_coins(&storage, early.id, 10).await;
        give_coins(&storage, late.id, 25).await;
        storage
            .enter_raffle_impl(raffle_id, early.id, 1, 100)
            .await
            .unwrap();

        let (drawn, entered) = tokio::join!(
            storage.draw_raffle_impl(raffle_id, 5),
            storage.enter_raffle_impl(raffle_id, late.id, 5, 100),
        );
        let outcome = drawn.unwrap();
        let late_coins = storage
            .get_user_by_id_impl(late.id)
            .await
            .unwrap()
            .unwrap()
            .coins;

        match entered {
            // 先买到券：必须参与本次抽取
            Ok(_) => {
                assert_eq!(late_coins, 0);
                assert!(outcome.participants.contains(&late.id));
                assert_eq!(outcome.total_entries, 6);
            }
            // 已开奖：不扣金币
            Err(err) => {
                assert_eq!(err.code(), "E016");
                assert_eq!(late_coins, 25);
                assert_eq!(outcome.participants, vec![early.id]);
            }
        }
    }
}
