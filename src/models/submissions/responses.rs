use super::entities::{Submission, SubmissionWithStudent};
use crate::models::PaginationInfo;
use crate::models::progression::entities::RewardOutcome;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListResponse {
    pub items: Vec<SubmissionWithStudent>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct MySubmissionListResponse {
    pub items: Vec<Submission>,
    pub pagination: PaginationInfo,
}

// 评分结果；重复评分时 rewards 为空
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct GradeSubmissionResponse {
    pub submission: Submission,
    pub rewards: Option<RewardOutcome>,
}
