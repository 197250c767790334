use super::entities::{GameKind, GameTally};
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/game.ts")]
pub struct SubmitGameSessionRequest {
    pub game_kind: GameKind,
    pub total: i32,
    pub correct: i32,
    pub best_streak: i32,
    pub seconds_remaining: Option<i32>,
}

impl SubmitGameSessionRequest {
    pub fn tally(&self) -> GameTally {
        GameTally {
            kind: self.game_kind,
            total: self.total,
            correct: self.correct,
            best_streak: self.best_streak,
            seconds_remaining: self.seconds_remaining,
        }
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/game.ts")]
pub struct GameSessionListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub game_kind: Option<GameKind>,
}
