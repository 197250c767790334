use super::entities::BadgeWithStatus;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/badge.ts")]
pub struct BadgeListResponse {
    pub user_id: i64,
    pub earned_count: i64,
    pub items: Vec<BadgeWithStatus>,
}
