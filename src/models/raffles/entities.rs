use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::string_enum;

string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/raffle.ts")]
    pub enum RaffleStatus("抽奖状态") {
        Open => "open",
        Drawn => "drawn",
        Cancelled => "cancelled",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/raffle.ts")]
pub struct Raffle {
    pub id: i64,
    pub class_id: i64,
    pub created_by: i64,
    pub title: String,
    pub prize: String,
    pub entry_cost: i64,
    pub max_entries_per_student: Option<i32>,
    pub status: RaffleStatus,
    pub closes_at: Option<chrono::DateTime<chrono::Utc>>,
    pub winner_id: Option<i64>,
    pub drawn_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Raffle {
    /// 状态为 open 且未到截止时间
    pub fn accepts_entries(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.status == RaffleStatus::Open && self.closes_at.is_none_or(|closes| now < closes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/raffle.ts")]
pub struct RaffleEntry {
    pub id: i64,
    pub raffle_id: i64,
    pub user_id: i64,
    pub entries: i32,
    pub coins_spent: i64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 开奖结果
#[derive(Debug, Clone)]
pub struct DrawOutcome {
    pub raffle: Raffle,
    pub winner_id: i64,
    pub total_entries: i64,
    pub participants: Vec<i64>,
}
