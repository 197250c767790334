use super::entities::{ExternalStudent, SyncRecord, SyncRun};
use crate::models::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/integration.ts")]
pub struct WebhookResponse {
    pub event_id: String,
    /// 重放的事件只确认、不处理
    pub duplicate: bool,
    pub processed: i64,
    pub linked: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/integration.ts")]
pub struct ExternalStudentListResponse {
    pub items: Vec<ExternalStudent>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/integration.ts")]
pub struct SyncRunListResponse {
    pub items: Vec<SyncRun>,
    pub pagination: PaginationInfo,
}

// 出站同步请求体
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/integration.ts")]
pub struct SyncPushBody {
    pub sync_id: String,
    pub records: Vec<SyncRecord>,
}
