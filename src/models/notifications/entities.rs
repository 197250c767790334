use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::string_enum;

string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
    pub enum NotificationType("通知类型") {
        AssignmentCreated => "assignment_created",
        SubmissionGraded => "submission_graded",
        BadgeEarned => "badge_earned",
        LevelUp => "level_up",
        RaffleWon => "raffle_won",
        RaffleDrawn => "raffle_drawn",
        System => "system",
    }
}

string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
    pub enum ReferenceType("关联类型") {
        Assignment => "assignment",
        Submission => "submission",
        Badge => "badge",
        Raffle => "raffle",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub content: Option<String>,
    pub reference_type: Option<ReferenceType>,
    pub reference_id: Option<i64>,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
