use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/integration.ts")]
pub struct ExternalStudent {
    pub id: i64,
    pub external_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub grade_level: Option<i32>,
    pub school: Option<String>,
    pub metadata: Option<serde_json::Value>,
    /// 邮箱匹配到的本地用户
    pub user_id: Option<i64>,
    pub last_synced_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/integration.ts")]
    pub enum SyncStatus("同步状态") {
        Running => "running",
        Succeeded => "succeeded",
        Failed => "failed",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/integration.ts")]
pub struct SyncRun {
    pub id: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
    pub status: SyncStatus,
    pub records_sent: i32,
    pub error: Option<String>,
    pub triggered_by: Option<i64>,
}

/// 出站同步的一条成绩
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/integration.ts")]
pub struct SyncRecord {
    pub external_id: String,
    pub assignment_id: i64,
    pub assignment_title: String,
    pub score: f64,
    pub max_score: f64,
    pub graded_at: chrono::DateTime<chrono::Utc>,
}
