use super::entities::LeaderboardPeriod;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/leaderboard.ts")]
pub struct LeaderboardParams {
    pub class_id: Option<i64>,
    #[serde(default)]
    pub period: LeaderboardPeriod,
    pub limit: Option<u64>,
}
