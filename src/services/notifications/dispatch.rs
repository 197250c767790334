//! 写入通知并推送给在线用户

use std::sync::Arc;

use tracing::{debug, error};

use crate::models::notifications::entities::Notification;
use crate::models::notifications::requests::CreateNotificationRequest;
use crate::services::websocket::ConnectionManager;
use crate::storage::Storage;

/// 批量创建通知，成功写入的逐条推送
///
/// 通知失败不影响触发它的业务操作，只记录日志。
pub async fn dispatch_notifications(
    storage: &Arc<dyn Storage>,
    requests: Vec<CreateNotificationRequest>,
) -> Vec<Notification> {
    if requests.is_empty() {
        return Vec::new();
    }

    let notifications = match storage.create_notifications(requests).await {
        Ok(notifications) => notifications,
        Err(e) => {
            error!("Failed to create notifications: {}", e);
            return Vec::new();
        }
    };

    let manager = ConnectionManager::get();
    for notification in &notifications {
        if manager.push_notification(notification.clone()) {
            debug!(
                "Pushed notification {} to user {}",
                notification.id, notification.user_id
            );
        }
    }

    notifications
}
