//! 小游戏记录

use super::progression::{apply_grant, lock_user_row, sum_xp_since};
use super::{SeaOrmStorage, now_ts};
use crate::entity::game_sessions::{ActiveModel, Column, Entity as GameSessions};
use crate::errors::{ClassQuestError, Result};
use crate::models::{
    PaginationInfo,
    games::{
        entities::{GameKind, GameSession, NewGameSession},
        responses::GameSessionListResponse,
    },
    progression::entities::{BalanceChange, LedgerSource, RewardGrant},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 记录一局并发放奖励
    ///
    /// 当日已得经验在同一事务内、锁住用户行之后统计，并发的多局不会突破上限。
    pub async fn record_game_session_impl(
        &self,
        session: NewGameSession,
        xp_per_level: i64,
    ) -> Result<(GameSession, BalanceChange)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("开启事务失败: {e}")))?;

        lock_user_row(&txn, session.user_id).await?;
        let earned_today =
            sum_xp_since(&txn, session.user_id, LedgerSource::Game, session.xp_cap.since).await?;
        let xp_awarded = session.xp_cap.allow(session.xp_earned, earned_today);

        let tally = session.tally;
        let saved = ActiveModel {
            user_id: Set(session.user_id),
            game_kind: Set(tally.kind.to_string()),
            total: Set(tally.total),
            correct: Set(tally.correct),
            best_streak: Set(tally.best_streak),
            seconds_remaining: Set(tally.seconds_remaining),
            score: Set(session.score),
            accuracy: Set(session.accuracy),
            xp_awarded: Set(xp_awarded),
            coins_awarded: Set(session.coins_awarded),
            played_at: Set(now_ts()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| ClassQuestError::database_operation(format!("记录小游戏失败: {e}")))?;

        let balance = apply_grant(
            &txn,
            &RewardGrant {
                user_id: session.user_id,
                xp_delta: xp_awarded,
                coin_delta: session.coins_awarded,
                source: LedgerSource::Game,
                reference_id: Some(saved.id),
            },
            xp_per_level,
        )
        .await?;

        txn.commit()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((saved.into_game_session(), balance))
    }

    pub async fn list_game_sessions_impl(
        &self,
        user_id: i64,
        game_kind: Option<GameKind>,
        page: u64,
        size: u64,
    ) -> Result<GameSessionListResponse> {
        let mut select = GameSessions::find().filter(Column::UserId.eq(user_id));
        if let Some(kind) = game_kind {
            select = select.filter(Column::GameKind.eq(kind.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::PlayedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询小游戏总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询小游戏页数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询小游戏记录失败: {e}")))?;

        Ok(GameSessionListResponse {
            items: rows.into_iter().map(|m| m.into_game_session()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::models::games::entities::{DailyXpCap, GameKind, GameTally, NewGameSession};
    use crate::models::progression::entities::LedgerSource;
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_record_session_credits_rewards() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "ray", UserRole::Student).await;

        let (session, balance) = storage
            .record_game_session_impl(
                NewGameSession {
                    user_id: user.id,
                    tally: GameTally {
                        kind: GameKind::Matching,
                        total: 8,
                        correct: 8,
                        best_streak: 8,
                        seconds_remaining: None,
                    },
                    score: 170,
                    accuracy: 100,
                    xp_earned: 27,
                    xp_cap: DailyXpCap {
                        since: 0,
                        limit: 200,
                    },
                    coins_awarded: 3,
                },
                100,
            )
            .await
            .unwrap();

        assert_eq!(session.game_kind, GameKind::Matching);
        assert_eq!((balance.xp, balance.coins), (27, 3));

        let since = chrono::Utc::now().timestamp() - 60;
        assert_eq!(
            storage
                .sum_xp_since_impl(user.id, LedgerSource::Game, since)
                .await
                .unwrap(),
            27
        );

        let listed = storage
            .list_game_sessions_impl(user.id, Some(GameKind::Flashcards), 1, 10)
            .await
            .unwrap();
        assert_eq!(listed.pagination.total, 0);
        let listed = storage
            .list_game_sessions_impl(user.id, None, 1, 10)
            .await
            .unwrap();
        assert_eq!(listed.items[0].id, session.id);
    }

    fn timed_session(user_id: i64, xp_earned: i64, limit: i64) -> NewGameSession {
        NewGameSession {
            user_id,
            tally: GameTally {
                kind: GameKind::TimedChallenge,
                total: 60,
                correct: 60,
                best_streak: 60,
                seconds_remaining: Some(0),
            },
            score: 1500,
            accuracy: 100,
            xp_earned,
            xp_cap: DailyXpCap {
                since: chrono::Utc::now().timestamp() - 3600,
                limit,
            },
            coins_awarded: 30,
        }
    }

    #[tokio::test]
    async fn test_concurrent_sessions_share_daily_cap() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "zoe", UserRole::Student).await;

        let (first, second) = tokio::join!(
            storage.record_game_session_impl(timed_session(user.id, 150, 200), 100),
            storage.record_game_session_impl(timed_session(user.id, 150, 200), 100),
        );
        let (first, _) = first.unwrap();
        let (second, _) = second.unwrap();

        let mut awarded = [first.xp_awarded, second.xp_awarded];
        awarded.sort_unstable();
        assert_eq!(awarded, [50, 150]);

        let since = chrono::Utc::now().timestamp() - 3600;
        assert_eq!(
            storage
                .sum_xp_since_impl(user.id, LedgerSource::Game, since)
                .await
                .unwrap(),
            200
        );
        let stored = storage.get_user_by_id_impl(user.id).await.unwrap().unwrap();
        assert_eq!((stored.xp, stored.coins), (200, 60));
    }

    #[tokio::test]
    async fn test_session_over_cap_still_pays_coins() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "ivy", UserRole::Student).await;

        storage
            .record_game_session_impl(timed_session(user.id, 200, 200), 100)
            .await
            .unwrap();
        let (session, balance) = storage
            .record_game_session_impl(timed_session(user.id, 40, 200), 100)
            .await
            .unwrap();

        assert_eq!(session.xp_awarded, 0);
        assert_eq!((balance.xp, balance.coins), (200, 60));
    }
}
