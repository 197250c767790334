use super::entities::GameSession;
use crate::models::PaginationInfo;
use crate::models::badges::entities::Badge;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/game.ts")]
pub struct GameSessionResponse {
    pub session: GameSession,
    /// 今日小游戏经验已达上限，本局经验被截断
    pub xp_capped: bool,
    pub total_xp: i64,
    pub total_coins: i64,
    pub level: i32,
    pub leveled_up: bool,
    pub badges_earned: Vec<Badge>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/game.ts")]
pub struct GameSessionListResponse {
    pub items: Vec<GameSession>,
    pub pagination: PaginationInfo,
}
