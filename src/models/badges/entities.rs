use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::string_enum;

string_enum! {
    // 徽章获得条件
    #[ts(export, export_to = "../frontend/src/types/generated/badge.ts")]
    pub enum BadgeCriterion("徽章条件") {
        SubmissionsCount => "submissions_count",
        PerfectScores => "perfect_scores",
        XpTotal => "xp_total",
        GamesPlayed => "games_played",
        BestStreak => "best_streak",
        RaffleWins => "raffle_wins",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/badge.ts")]
pub struct Badge {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub criterion_kind: BadgeCriterion,
    pub threshold: i64,
    pub coin_bonus: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/badge.ts")]
pub struct BadgeWithStatus {
    #[serde(flatten)]
    #[ts(flatten)]
    pub badge: Badge,
    pub earned: bool,
    pub earned_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// 评估徽章用的用户累计数据
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserStats {
    pub submissions_count: i64,
    pub perfect_scores: i64,
    pub xp_total: i64,
    pub games_played: i64,
    pub best_streak: i64,
    pub raffle_wins: i64,
}

impl UserStats {
    pub fn value_of(&self, criterion: BadgeCriterion) -> i64 {
        match criterion {
            BadgeCriterion::SubmissionsCount => self.submissions_count,
            BadgeCriterion::PerfectScores => self.perfect_scores,
            BadgeCriterion::XpTotal => self.xp_total,
            BadgeCriterion::GamesPlayed => self.games_played,
            BadgeCriterion::BestStreak => self.best_streak,
            BadgeCriterion::RaffleWins => self.raffle_wins,
        }
    }
}
