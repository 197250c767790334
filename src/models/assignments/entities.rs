use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub class_id: i64,
    pub created_by: i64,
    pub title: String,
    pub description: Option<String>,
    pub max_score: f64,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
    /// 满分时获得的经验
    pub xp_reward: i32,
    /// 得分率达标时获得的金币
    pub coin_reward: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    pub fn is_past_due(&self, at: chrono::DateTime<chrono::Utc>) -> bool {
        self.due_at.is_some_and(|due| at > due)
    }
}
