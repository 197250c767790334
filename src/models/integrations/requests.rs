use crate::models::common::PaginationQuery;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 第三方推送的学生名册
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/integration.ts")]
pub struct WebhookPayload {
    pub event_id: String,
    #[serde(default)]
    pub students: Vec<ExternalStudentRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/integration.ts")]
pub struct ExternalStudentRecord {
    pub external_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub grade_level: Option<i32>,
    pub school: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl WebhookPayload {
    pub fn validate(&self) -> Result<(), String> {
        if self.event_id.trim().is_empty() {
            return Err("event_id cannot be empty".to_string());
        }
        for (idx, student) in self.students.iter().enumerate() {
            if student.external_id.trim().is_empty() {
                return Err(format!("students[{idx}].external_id cannot be empty"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/integration.ts")]
pub struct ExternalStudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/integration.ts")]
pub struct SyncRunListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
}
