/*!
 * WebSocket 实时通知
 *
 * 每个用户一个广播通道，同一用户的多个标签页共享。最后一个连接断开时移除通道。
 *
 * 客户端连接：
 * ```text
 * ws://host/api/v1/ws?token=<access_token>
 * ```
 *
 * ## 消息格式
 *
 * ### 服务端推送
 * ```json
 * {
 *     "type": "notification",
 *     "payload": {
 *         "id": 12,
 *         "notification_type": "badge_earned",
 *         "title": "New badge: Bookworm",
 *         "content": "You earned 20 coins",
 *         "reference_type": "badge",
 *         "reference_id": 3,
 *         "created_at": "2026-01-24T12:00:00Z"
 *     }
 * }
 * ```
 *
 * ### 心跳
 * ```json
 * {"type": "ping"}
 * {"type": "pong"}
 * ```
 */

use actix_ws::Message;
use dashmap::DashMap;
use futures_util::StreamExt;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::models::notifications::entities::Notification;

/// 全局连接管理器
static CONNECTION_MANAGER: Lazy<ConnectionManager> = Lazy::new(ConnectionManager::new);

/// WebSocket 消息类型
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    /// 通知消息
    Notification { payload: NotificationPayload },
    /// 心跳请求
    Ping,
    /// 心跳响应
    Pong,
    /// 连接成功
    Connected { user_id: i64 },
    /// 错误消息
    Error { message: String },
}

/// 通知载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub id: i64,
    pub notification_type: String,
    pub title: String,
    pub content: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Notification> for NotificationPayload {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            notification_type: n.notification_type.to_string(),
            title: n.title,
            content: n.content,
            reference_type: n.reference_type.map(|r| r.to_string()),
            reference_id: n.reference_id,
            created_at: n.created_at,
        }
    }
}

const CHANNEL_CAPACITY: usize = 100;
const HEARTBEAT_SECS: u64 = 30;

/// 连接管理器
pub struct ConnectionManager {
    /// 用户 ID -> 广播发送器
    connections: DashMap<i64, broadcast::Sender<WsMessage>>,
}

impl ConnectionManager {
    fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// 获取全局实例
    pub fn get() -> &'static Self {
        &CONNECTION_MANAGER
    }

    /// 注册用户连接
    pub fn register(&self, user_id: i64) -> broadcast::Receiver<WsMessage> {
        let entry = self.connections.entry(user_id).or_insert_with(|| {
            let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
            tx
        });
        entry.subscribe()
    }

    /// 连接断开后调用，调用前需先丢弃该连接的 Receiver
    pub fn unregister(&self, user_id: i64) {
        self.connections
            .remove_if(&user_id, |_, sender| sender.receiver_count() == 0);
    }

    /// 向指定用户发送通知
    pub fn send_to_user(&self, user_id: i64, message: WsMessage) -> bool {
        if let Some(sender) = self.connections.get(&user_id) {
            sender.send(message).is_ok()
        } else {
            false
        }
    }

    /// 推送给通知的接收者，不在线时忽略
    pub fn push_notification(&self, notification: Notification) -> bool {
        let user_id = notification.user_id;
        let message = WsMessage::Notification {
            payload: NotificationPayload::from(notification),
        };
        self.send_to_user(user_id, message)
    }

    /// 获取在线用户数
    pub fn online_count(&self) -> usize {
        self.connections
            .iter()
            .filter(|entry| entry.receiver_count() > 0)
            .count()
    }

    /// 检查用户是否在线
    pub fn is_online(&self, user_id: i64) -> bool {
        self.connections
            .get(&user_id)
            .is_some_and(|s| s.receiver_count() > 0)
    }
}

/// WebSocket 服务
pub struct WebSocketService;

impl WebSocketService {
    /// 处理 WebSocket 连接
    pub async fn handle_connection(
        user_id: i64,
        mut session: actix_ws::Session,
        mut stream: actix_ws::MessageStream,
    ) {
        info!("WebSocket connected for user: {}", user_id);

        let mut rx = ConnectionManager::get().register(user_id);

        let connected_msg = WsMessage::Connected { user_id };
        if let Ok(json) = serde_json::to_string(&connected_msg) {
            let _ = session.text(json).await;
        }

        let mut heartbeat =
            tokio::time::interval(std::time::Duration::from_secs(HEARTBEAT_SECS));

        loop {
            tokio::select! {
                // 处理来自客户端的消息
                msg = stream.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if let Ok(ws_msg) = serde_json::from_str::<WsMessage>(&text) {
                                match ws_msg {
                                    WsMessage::Ping => {
                                        let pong = serde_json::to_string(&WsMessage::Pong)
                                            .unwrap_or_else(|_| r#"{"type":"pong"}"#.to_string());
                                        if session.text(pong).await.is_err() {
                                            break;
                                        }
                                    }
                                    _ => {
                                        debug!("Received message from user {}: {:?}", user_id, ws_msg);
                                    }
                                }
                            } else {
                                let error = WsMessage::Error {
                                    message: "Unsupported message".to_string(),
                                };
                                if let Ok(json) = serde_json::to_string(&error)
                                    && session.text(json).await.is_err()
                                {
                                    break;
                                }
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if session.pong(&data).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            info!("WebSocket closed for user: {}", user_id);
                            break;
                        }
                        Some(Err(e)) => {
                            warn!("WebSocket error for user {}: {:?}", user_id, e);
                            break;
                        }
                        _ => {}
                    }
                }

                // 处理来自服务器的推送消息
                msg = rx.recv() => {
                    match msg {
                        Ok(ws_msg) => {
                            if let Ok(json) = serde_json::to_string(&ws_msg)
                                && session.text(json).await.is_err() {
                                    break;
                                }
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!("WebSocket for user {} lagged by {} messages", user_id, n);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            break;
                        }
                    }
                }

                // 心跳
                _ = heartbeat.tick() => {
                    if session.ping(b"").await.is_err() {
                        break;
                    }
                }
            }
        }

        drop(rx);
        let _ = session.close(None).await;
        ConnectionManager::get().unregister(user_id);
        info!("WebSocket disconnected for user: {}", user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notifications::entities::{NotificationType, ReferenceType};

    fn notification(user_id: i64) -> Notification {
        Notification {
            id: 1,
            user_id,
            notification_type: NotificationType::RaffleWon,
            title: "You won the raffle!".to_string(),
            content: None,
            reference_type: Some(ReferenceType::Raffle),
            reference_id: Some(9),
            is_read: false,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_push_reaches_every_tab_of_the_user() {
        let manager = ConnectionManager::new();
        let mut tab_a = manager.register(7);
        let mut tab_b = manager.register(7);
        let mut other = manager.register(8);

        assert!(manager.push_notification(notification(7)));

        for rx in [&mut tab_a, &mut tab_b] {
            match rx.recv().await.unwrap() {
                WsMessage::Notification { payload } => {
                    assert_eq!(payload.notification_type, "raffle_won");
                    assert_eq!(payload.reference_type.as_deref(), Some("raffle"));
                }
                other => panic!("unexpected message: {other:?}"),
            }
        }
        assert!(other.try_recv().is_err());
    }

    #[test]
    fn test_offline_user_is_skipped() {
        let manager = ConnectionManager::new();
        assert!(!manager.push_notification(notification(3)));
        assert!(!manager.is_online(3));
    }

    #[test]
    fn test_channel_removed_after_last_receiver() {
        let manager = ConnectionManager::new();
        let first = manager.register(5);
        let second = manager.register(5);
        assert_eq!(manager.online_count(), 1);

        drop(first);
        manager.unregister(5);
        assert!(manager.is_online(5));

        drop(second);
        manager.unregister(5);
        assert!(!manager.is_online(5));
        assert!(manager.connections.is_empty());
    }

    #[test]
    fn test_message_wire_format() {
        assert_eq!(serde_json::to_string(&WsMessage::Ping).unwrap(), r#"{"type":"ping"}"#);
        let parsed: WsMessage = serde_json::from_str(r#"{"type":"pong"}"#).unwrap();
        assert!(matches!(parsed, WsMessage::Pong));
        assert_eq!(
            serde_json::to_string(&WsMessage::Connected { user_id: 4 }).unwrap(),
            r#"{"type":"connected","user_id":4}"#
        );
    }
}
