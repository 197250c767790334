//! 通知存储操作
//!
//! 所有读写都带 `user_id` 条件，用户只能操作自己的通知。

use super::{SeaOrmStorage, now_ts};
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::errors::{ClassQuestError, Result};
use crate::models::{
    PaginationInfo,
    notifications::{
        entities::Notification, requests::CreateNotificationRequest,
        responses::NotificationListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

fn to_active_model(req: CreateNotificationRequest, now: i64) -> ActiveModel {
    ActiveModel {
        user_id: Set(req.user_id),
        notification_type: Set(req.notification_type.to_string()),
        title: Set(req.title),
        content: Set(req.content),
        reference_type: Set(req.reference_type.map(|t| t.to_string())),
        reference_id: Set(req.reference_id),
        is_read: Set(false),
        created_at: Set(now),
        ..Default::default()
    }
}

impl SeaOrmStorage {
    /// 创建通知
    #[cfg(test)]
    pub async fn create_notification_impl(
        &self,
        req: CreateNotificationRequest,
    ) -> Result<Notification> {
        let result = to_active_model(req, now_ts())
            .insert(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("创建通知失败: {e}")))?;

        Ok(result.into_notification())
    }

    /// 批量创建通知
    pub async fn create_notifications_impl(
        &self,
        reqs: Vec<CreateNotificationRequest>,
    ) -> Result<Vec<Notification>> {
        if reqs.is_empty() {
            return Ok(Vec::new());
        }

        let now = now_ts();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("开启事务失败: {e}")))?;

        let mut notifications = Vec::with_capacity(reqs.len());
        for req in reqs {
            let result = to_active_model(req, now).insert(&txn).await.map_err(|e| {
                ClassQuestError::database_operation(format!("批量创建通知失败: {e}"))
            })?;
            notifications.push(result.into_notification());
        }

        txn.commit()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(notifications)
    }

    /// 列出用户通知（分页），附带未读数
    pub async fn list_notifications_with_pagination_impl(
        &self,
        user_id: i64,
        unread_only: bool,
        page: u64,
        size: u64,
    ) -> Result<NotificationListResponse> {
        let mut select = Notifications::find().filter(Column::UserId.eq(user_id));

        if unread_only {
            select = select.filter(Column::IsRead.eq(false));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询通知总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询通知页数失败: {e}")))?;

        let notifications = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询通知列表失败: {e}")))?;

        let unread_count = self.get_unread_notification_count_impl(user_id).await?;

        Ok(NotificationListResponse {
            items: notifications
                .into_iter()
                .map(|m| m.into_notification())
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
            unread_count,
        })
    }

    /// 获取用户未读通知数量
    pub async fn get_unread_notification_count_impl(&self, user_id: i64) -> Result<i64> {
        let count = Notifications::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| {
                ClassQuestError::database_operation(format!("查询未读通知数量失败: {e}"))
            })?;

        Ok(count as i64)
    }

    /// 标记通知为已读，通知不存在或不属于该用户时返回 false
    pub async fn mark_notification_as_read_impl(
        &self,
        notification_id: i64,
        user_id: i64,
    ) -> Result<bool> {
        let exists = Notifications::find_by_id(notification_id)
            .filter(Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询通知失败: {e}")))?;
        if exists == 0 {
            return Ok(false);
        }

        Notifications::update_many()
            .col_expr(Column::IsRead, sea_orm::sea_query::Expr::value(true))
            .filter(Column::Id.eq(notification_id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("标记通知已读失败: {e}")))?;

        Ok(true)
    }

    /// 标记用户所有通知为已读
    pub async fn mark_all_notifications_as_read_impl(&self, user_id: i64) -> Result<i64> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, sea_orm::sea_query::Expr::value(true))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| {
                ClassQuestError::database_operation(format!("标记全部通知已读失败: {e}"))
            })?;

        Ok(result.rows_affected as i64)
    }

    /// 删除通知
    pub async fn delete_notification_impl(&self, notification_id: i64, user_id: i64) -> Result<bool> {
        let result = Notifications::delete_many()
            .filter(Column::Id.eq(notification_id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("删除通知失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::models::notifications::entities::NotificationType;
    use crate::models::notifications::requests::CreateNotificationRequest;
    use crate::models::users::entities::UserRole;

    use super::super::SeaOrmStorage;

    async fn assert_counter_matches_list(storage: &SeaOrmStorage, user_id: i64) {
        let unread = storage
            .list_notifications_with_pagination_impl(user_id, true, 1, 100)
            .await
            .unwrap();
        let all = storage
            .list_notifications_with_pagination_impl(user_id, false, 1, 100)
            .await
            .unwrap();
        let unread_in_list = all.items.iter().filter(|n| !n.is_read).count() as i64;

        assert_eq!(unread.pagination.total, unread_in_list);
        assert_eq!(all.unread_count, unread_in_list);
        assert_eq!(
            storage
                .get_unread_notification_count_impl(user_id)
                .await
                .unwrap(),
            unread_in_list
        );
    }

    #[tokio::test]
    async fn test_unread_counter_consistent_after_read_and_delete() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "ben", UserRole::Student).await;

        let created = storage
            .create_notifications_impl(
                (0..5)
                    .map(|i| {
                        CreateNotificationRequest::new(
                            user.id,
                            NotificationType::System,
                            format!("Notice {i}"),
                        )
                    })
                    .collect(),
            )
            .await
            .unwrap();
        assert_eq!(created.len(), 5);
        assert_counter_matches_list(&storage, user.id).await;

        assert!(
            storage
                .mark_notification_as_read_impl(created[0].id, user.id)
                .await
                .unwrap()
        );
        // 重复标记仍然成功，计数不变
        assert!(
            storage
                .mark_notification_as_read_impl(created[0].id, user.id)
                .await
                .unwrap()
        );
        assert_counter_matches_list(&storage, user.id).await;
        assert_eq!(
            storage
                .get_unread_notification_count_impl(user.id)
                .await
                .unwrap(),
            4
        );

        // 删除一条未读和一条已读
        assert!(storage.delete_notification_impl(created[1].id, user.id).await.unwrap());
        assert!(storage.delete_notification_impl(created[0].id, user.id).await.unwrap());
        assert_counter_matches_list(&storage, user.id).await;

        assert_eq!(
            storage
                .mark_all_notifications_as_read_impl(user.id)
                .await
                .unwrap(),
            3
        );
        assert_counter_matches_list(&storage, user.id).await;
        assert_eq!(
            storage
                .get_unread_notification_count_impl(user.id)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_users_cannot_touch_others_notifications() {
        let storage = memory_storage().await;
        let owner = seed_user(&storage, "owner", UserRole::Student).await;
        let other = seed_user(&storage, "other", UserRole::Student).await;

        let notification = storage
            .create_notification_impl(CreateNotificationRequest::new(
                owner.id,
                NotificationType::LevelUp,
                "Level 2!",
            ))
            .await
            .unwrap();

        assert!(
            !storage
                .mark_notification_as_read_impl(notification.id, other.id)
                .await
                .unwrap()
        );
        assert!(
            !storage
                .delete_notification_impl(notification.id, other.id)
                .await
                .unwrap()
        );
        assert_eq!(
            storage
                .get_unread_notification_count_impl(owner.id)
                .await
                .unwrap(),
            1
        );
    }
}
