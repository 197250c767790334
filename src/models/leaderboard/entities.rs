use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::string_enum;

string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/leaderboard.ts")]
    pub enum LeaderboardPeriod("排行榜周期") {
        AllTime => "all_time",
        Weekly => "weekly",
    }
}

impl Default for LeaderboardPeriod {
    fn default() -> Self {
        LeaderboardPeriod::AllTime
    }
}

/// 排名前的原始数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardCandidate {
    pub user_id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub level: i32,
    pub xp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/leaderboard.ts")]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub user_id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub level: i32,
    /// 周期内的经验（all_time 为总经验）
    pub xp: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/leaderboard.ts")]
pub struct LeaderboardResponse {
    pub period: LeaderboardPeriod,
    pub class_id: Option<i64>,
    pub entries: Vec<LeaderboardEntry>,
    /// 当前用户的名次（不在榜单范围内时也会返回）
    pub me: Option<LeaderboardEntry>,
}
