use super::entities::{LedgerEntry, LevelProgress};
use crate::models::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/progression.ts")]
pub struct ProgressResponse {
    pub xp: i64,
    pub coins: i64,
    pub level: i32,
    pub progress: LevelProgress,
    pub badge_count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/progression.ts")]
pub struct LedgerListResponse {
    pub items: Vec<LedgerEntry>,
    pub pagination: PaginationInfo,
}
