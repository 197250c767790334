//! 小游戏记录

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "game_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub game_kind: String,
    pub total: i32,
    pub correct: i32,
    pub best_streak: i32,
    pub seconds_remaining: Option<i32>,
    pub score: i64,
    pub accuracy: i32,
    pub xp_awarded: i64,
    pub coins_awarded: i64,
    pub played_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_game_session(self) -> crate::models::games::entities::GameSession {
        use crate::models::games::entities::{GameKind, GameSession};
        use chrono::{DateTime, Utc};

        GameSession {
            id: self.id,
            user_id: self.user_id,
            game_kind: self
                .game_kind
                .parse::<GameKind>()
                .unwrap_or(GameKind::Flashcards),
            total: self.total,
            correct: self.correct,
            best_streak: self.best_streak,
            seconds_remaining: self.seconds_remaining,
            score: self.score,
            accuracy: self.accuracy,
            xp_awarded: self.xp_awarded,
            coins_awarded: self.coins_awarded,
            played_at: DateTime::<Utc>::from_timestamp(self.played_at, 0).unwrap_or_default(),
        }
    }
}
