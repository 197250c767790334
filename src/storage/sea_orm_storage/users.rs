use super::{SeaOrmStorage, now_ts};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{ClassQuestError, Result};
use crate::models::{
    PaginationInfo,
    users::{
        entities::{AvatarLoadout, User, UserStatus},
        requests::{CreateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = now_ts();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email.trim().to_lowercase()),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(req.display_name),
            language: Set(req.language.unwrap_or_else(|| "en".to_string())),
            avatar: Set(None),
            xp: Set(0),
            coins: Set(0),
            level: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier.trim().to_lowercase())),
            )
            .one(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Username.contains(&escaped))
                    .add(Column::Email.contains(&escaped))
                    .add(Column::DisplayName.contains(&escaped)),
            );
        }

        // 角色筛选
        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        // 状态筛选
        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select = select.order_by_desc(Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询用户总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询用户页数失败: {e}")))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now_ts()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                ClassQuestError::database_operation(format!("更新最后登录时间失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 更新显示名，空字符串视为清除
    pub async fn update_user_profile_impl(
        &self,
        id: i64,
        display_name: Option<String>,
    ) -> Result<Option<User>> {
        let display_name = display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        self.update_user_fields(
            id,
            ActiveModel {
                display_name: Set(display_name),
                ..Default::default()
            },
        )
        .await
    }

    /// 更新语言偏好
    pub async fn update_user_language_impl(&self, id: i64, language: &str) -> Result<Option<User>> {
        self.update_user_fields(
            id,
            ActiveModel {
                language: Set(language.to_string()),
                ..Default::default()
            },
        )
        .await
    }

    /// 更新头像装扮
    pub async fn update_user_avatar_impl(
        &self,
        id: i64,
        avatar: &AvatarLoadout,
    ) -> Result<Option<User>> {
        self.update_user_fields(
            id,
            ActiveModel {
                avatar: Set(avatar.to_db()),
                ..Default::default()
            },
        )
        .await
    }

    async fn update_user_fields(&self, id: i64, mut model: ActiveModel) -> Result<Option<User>> {
        // 先检查用户是否存在
        if self.get_user_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        model.id = Set(id);
        model.updated_at = Set(now_ts());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("更新用户失败: {e}")))?;

        Ok(Some(updated.into_user()))
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::models::collectibles::entities::CollectibleSlot;
    use crate::models::users::entities::{AvatarLoadout, UserRole};

    #[tokio::test]
    async fn test_new_user_starts_at_level_one() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "mia", UserRole::Student).await;

        assert_eq!(user.level, 1);
        assert_eq!(user.xp, 0);
        assert_eq!(user.coins, 0);
        assert_eq!(user.language, "en");
        assert_eq!(storage.count_users_impl().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_profile_language_and_avatar_updates() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "leo", UserRole::Student).await;

        let updated = storage
            .update_user_profile_impl(user.id, Some("  Leo the Brave ".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.display_name.as_deref(), Some("Leo the Brave"));

        let updated = storage
            .update_user_language_impl(user.id, "es")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.language, "es");

        let mut avatar = AvatarLoadout::default();
        avatar.set(CollectibleSlot::Hat, Some(3));
        let updated = storage
            .update_user_avatar_impl(user.id, &avatar)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.avatar.get(CollectibleSlot::Hat), Some(3));

        assert!(
            storage
                .update_user_language_impl(9999, "fr")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_lookup_by_username_or_email() {
        let storage = memory_storage().await;
        seed_user(&storage, "ava", UserRole::Teacher).await;

        let by_email = storage
            .get_user_by_username_or_email_impl("ava@school.test")
            .await
            .unwrap();
        assert_eq!(by_email.map(|u| u.username), Some("ava".to_string()));
        assert!(
            storage
                .get_user_by_username_or_email_impl("nobody")
                .await
                .unwrap()
                .is_none()
        );
    }
}
