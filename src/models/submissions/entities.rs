use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::string_enum;

string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
    pub enum SubmissionStatus("提交状态") {
        Submitted => "submitted",
        Graded => "graded",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: String,
    pub is_late: bool,
    pub status: SubmissionStatus,
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 教师查看的提交行
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionWithStudent {
    pub submission: Submission,
    pub student_username: String,
    pub student_display_name: Option<String>,
}

/// 评分写入（存储层使用）
///
/// `reward` 只在该提交尚未发放过奖励时生效。
#[derive(Debug, Clone)]
pub struct GradeSubmissionInput {
    pub submission_id: i64,
    pub graded_by: i64,
    pub score: f64,
    pub feedback: Option<String>,
    pub reward: crate::models::progression::entities::RewardGrant,
}

#[derive(Debug, Clone)]
pub struct GradeResult {
    pub submission: Submission,
    /// 本次评分发放了奖励时为 Some
    pub balance: Option<crate::models::progression::entities::BalanceChange>,
}
