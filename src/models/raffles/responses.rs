use super::entities::{Raffle, RaffleEntry};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/raffle.ts")]
pub struct RaffleDetailResponse {
    pub raffle: Raffle,
    pub total_entries: i64,
    pub participant_count: i64,
    pub my_entries: i32,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/raffle.ts")]
pub struct RaffleListResponse {
    pub items: Vec<RaffleDetailResponse>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/raffle.ts")]
pub struct EnterRaffleResponse {
    pub entry: RaffleEntry,
    pub coins_remaining: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/raffle.ts")]
pub struct DrawRaffleResponse {
    pub raffle: Raffle,
    pub winner_id: i64,
    pub winner_username: Option<String>,
    pub total_entries: i64,
    pub participant_count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/raffle.ts")]
pub struct CancelRaffleResponse {
    pub raffle: Raffle,
    pub refunded_students: i64,
    pub refunded_coins: i64,
}
