use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::badges::entities::Badge;
use crate::string_enum;

string_enum! {
    // 经验/金币变动来源
    #[ts(export, export_to = "../frontend/src/types/generated/progression.ts")]
    pub enum LedgerSource("流水来源") {
        Assignment => "assignment",
        Game => "game",
        Badge => "badge",
        Purchase => "purchase",
        RaffleEntry => "raffle_entry",
        RaffleRefund => "raffle_refund",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/progression.ts")]
pub struct LedgerEntry {
    pub id: i64,
    pub user_id: i64,
    pub xp_delta: i64,
    pub coin_delta: i64,
    pub source: LedgerSource,
    pub reference_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 一次经验/金币变动，写流水并更新用户余额
#[derive(Debug, Clone, PartialEq)]
pub struct RewardGrant {
    pub user_id: i64,
    pub xp_delta: i64,
    pub coin_delta: i64,
    pub source: LedgerSource,
    pub reference_id: Option<i64>,
}

/// 变动后的用户余额
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceChange {
    pub xp: i64,
    pub coins: i64,
    pub old_level: i32,
    pub new_level: i32,
}

impl BalanceChange {
    pub fn leveled_up(&self) -> bool {
        self.new_level > self.old_level
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/progression.ts")]
pub struct LevelProgress {
    pub level: i32,
    /// 当前等级的起点经验
    pub current_level_xp: i64,
    /// 下一级的起点经验
    pub next_level_xp: i64,
}

// 一次奖励发放的结果
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/progression.ts")]
pub struct RewardOutcome {
    pub xp_awarded: i64,
    pub coins_awarded: i64,
    pub total_xp: i64,
    pub total_coins: i64,
    pub level: i32,
    pub leveled_up: bool,
    pub badges_earned: Vec<Badge>,
}
