use super::entities::{NotificationType, ReferenceType};
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_opt_bool;
use serde::Deserialize;
use ts_rs::TS;

// 创建通知（服务内部使用）
#[derive(Debug, Clone)]
pub struct CreateNotificationRequest {
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub content: Option<String>,
    pub reference_type: Option<ReferenceType>,
    pub reference_id: Option<i64>,
}

impl CreateNotificationRequest {
    pub fn new(user_id: i64, notification_type: NotificationType, title: impl Into<String>) -> Self {
        Self {
            user_id,
            notification_type,
            title: title.into(),
            content: None,
            reference_type: None,
            reference_id: None,
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn reference(mut self, reference_type: ReferenceType, reference_id: i64) -> Self {
        self.reference_type = Some(reference_type);
        self.reference_id = Some(reference_id);
        self
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct NotificationListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_opt_bool")]
    pub unread_only: Option<bool>,
}
