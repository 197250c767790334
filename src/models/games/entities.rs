use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::string_enum;

string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/game.ts")]
    pub enum GameKind("小游戏类型") {
        Flashcards => "flashcards",
        Matching => "matching",
        TimedChallenge => "timed_challenge",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/game.ts")]
pub struct GameSession {
    pub id: i64,
    pub user_id: i64,
    pub game_kind: GameKind,
    pub total: i32,
    pub correct: i32,
    pub best_streak: i32,
    pub seconds_remaining: Option<i32>,
    pub score: i64,
    /// 0..=100
    pub accuracy: i32,
    pub xp_awarded: i64,
    pub coins_awarded: i64,
    pub played_at: chrono::DateTime<chrono::Utc>,
}

/// 一局结束时的统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameTally {
    pub kind: GameKind,
    pub total: i32,
    pub correct: i32,
    pub best_streak: i32,
    pub seconds_remaining: Option<i32>,
}

/// 得分与奖励（未应用每日上限）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameScore {
    pub score: i64,
    pub accuracy: i32,
    pub xp: i64,
    pub coins: i64,
}

/// 每日经验上限：`since` 之后小游戏经验合计不超过 `limit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyXpCap {
    pub since: i64,
    pub limit: i64,
}

impl DailyXpCap {
    /// 已得 `earned_today` 时本局可得的经验
    pub fn allow(&self, xp: i64, earned_today: i64) -> i64 {
        xp.min((self.limit - earned_today).max(0)).max(0)
    }
}

// 写入存储层的记录，经验在事务内按上限截断
#[derive(Debug, Clone)]
pub struct NewGameSession {
    pub user_id: i64,
    pub tally: GameTally,
    pub score: i64,
    pub accuracy: i32,
    pub xp_earned: i64,
    pub xp_cap: DailyXpCap,
    pub coins_awarded: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_cap() {
        let cap = DailyXpCap { since: 0, limit: 200 };
        assert_eq!(cap.allow(30, 0), 30);
        assert_eq!(cap.allow(30, 180), 20);
        assert_eq!(cap.allow(30, 200), 0);
        assert_eq!(cap.allow(30, 250), 0);
    }
}
