use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_opt_i64;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub class_id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(default = "default_max_score")]
    pub max_score: f64,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default = "default_xp_reward")]
    pub xp_reward: i32,
    #[serde(default = "default_coin_reward")]
    pub coin_reward: i32,
}

fn default_max_score() -> f64 {
    100.0
}

fn default_xp_reward() -> i32 {
    50
}

fn default_coin_reward() -> i32 {
    10
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub max_score: Option<f64>,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
    pub xp_reward: Option<i32>,
    pub coin_reward: Option<i32>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub class_id: Option<i64>,
    pub search: Option<String>,
}

// 存储层查询
#[derive(Debug, Clone, Default)]
pub struct AssignmentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub class_id: Option<i64>,
    /// 只看该用户所在班级的作业
    pub member_id: Option<i64>,
    pub search: Option<String>,
}

/// 校验作业的数值字段
pub fn validate_assignment_numbers(
    max_score: f64,
    xp_reward: i32,
    coin_reward: i32,
) -> Result<(), &'static str> {
    if !max_score.is_finite() || max_score <= 0.0 {
        return Err("max_score must be greater than 0");
    }
    if xp_reward < 0 || coin_reward < 0 {
        return Err("Rewards cannot be negative");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let req: CreateAssignmentRequest =
            serde_json::from_str(r#"{"class_id":1,"title":"Fractions"}"#).unwrap();
        assert_eq!(req.max_score, 100.0);
        assert_eq!(req.xp_reward, 50);
        assert_eq!(req.coin_reward, 10);
        assert!(req.due_at.is_none());
    }

    #[test]
    fn test_validate_numbers() {
        assert!(validate_assignment_numbers(100.0, 50, 10).is_ok());
        assert!(validate_assignment_numbers(0.0, 50, 10).is_err());
        assert!(validate_assignment_numbers(f64::NAN, 50, 10).is_err());
        assert!(validate_assignment_numbers(10.0, -1, 0).is_err());
    }
}
