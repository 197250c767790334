//! 班级成员存储操作

use super::{SeaOrmStorage, now_ts};
use crate::entity::class_users::{ActiveModel, Column, Entity as ClassUsers};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{ClassQuestError, Result};
use crate::models::{
    PaginationInfo,
    class_users::{
        entities::{ClassMember, ClassUser, ClassUserRole},
        requests::ClassUserQuery,
        responses::ClassMemberListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 加入班级，重复加入返回冲突
    pub async fn join_class_impl(
        &self,
        user_id: i64,
        class_id: i64,
        role: ClassUserRole,
    ) -> Result<ClassUser> {
        if self
            .get_class_user_by_user_id_and_class_id_impl(user_id, class_id)
            .await?
            .is_some()
        {
            return Err(ClassQuestError::conflict("Already a member of this class"));
        }

        let now = now_ts();
        let model = ActiveModel {
            class_id: Set(class_id),
            user_id: Set(user_id),
            role: Set(role.to_string()),
            updated_at: Set(now),
            joined_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("加入班级失败: {e}")))?;

        Ok(result.into_class_user())
    }

    /// 离开班级
    pub async fn leave_class_impl(&self, user_id: i64, class_id: i64) -> Result<bool> {
        let result = ClassUsers::delete_many()
            .filter(
                Condition::all()
                    .add(Column::UserId.eq(user_id))
                    .add(Column::ClassId.eq(class_id)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("离开班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 分页列出班级成员（附带用户公开信息）
    pub async fn list_class_members_with_pagination_impl(
        &self,
        class_id: i64,
        query: ClassUserQuery,
    ) -> Result<ClassMemberListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = ClassUsers::find()
            .find_also_related(Users)
            .filter(Column::ClassId.eq(class_id));

        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(UserColumn::Username.contains(&escaped))
                    .add(UserColumn::DisplayName.contains(&escaped)),
            );
        }

        let paginator = select
            .order_by_asc(UserColumn::Username)
            .paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            ClassQuestError::database_operation(format!("查询班级成员总数失败: {e}"))
        })?;

        let pages = paginator.num_pages().await.map_err(|e| {
            ClassQuestError::database_operation(format!("查询班级成员页数失败: {e}"))
        })?;

        let rows = paginator.fetch_page(page - 1).await.map_err(|e| {
            ClassQuestError::database_operation(format!("查询班级成员列表失败: {e}"))
        })?;

        let items = rows
            .into_iter()
            .filter_map(|(membership, user)| {
                let user = user?;
                let membership = membership.into_class_user();
                Some(ClassMember {
                    user_id: user.id,
                    username: user.username,
                    display_name: user.display_name,
                    role: membership.role,
                    xp: user.xp,
                    level: user.level,
                    joined_at: membership.joined_at,
                })
            })
            .collect();

        Ok(ClassMemberListResponse {
            pagination: PaginationInfo::new(page, size, total, pages),
            items,
        })
    }

    /// 获取用户在班级中的信息
    pub async fn get_class_user_by_user_id_and_class_id_impl(
        &self,
        user_id: i64,
        class_id: i64,
    ) -> Result<Option<ClassUser>> {
        let result = ClassUsers::find()
            .filter(
                Condition::all()
                    .add(Column::UserId.eq(user_id))
                    .add(Column::ClassId.eq(class_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询班级用户失败: {e}")))?;

        Ok(result.map(|m| m.into_class_user()))
    }

    /// 班级内全部学生
    pub async fn list_class_student_ids_impl(&self, class_id: i64) -> Result<Vec<i64>> {
        ClassUsers::find()
            .select_only()
            .column(Column::UserId)
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Role.eq(ClassUserRole::Student.to_string()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询班级学生失败: {e}")))
    }

    /// 班级学生数量
    pub async fn count_class_students_impl(&self, class_id: i64) -> Result<i64> {
        let count = ClassUsers::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Role.eq(ClassUserRole::Student.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| {
                ClassQuestError::database_operation(format!("查询班级成员数量失败: {e}"))
            })?;

        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::models::class_users::{entities::ClassUserRole, requests::ClassUserQuery};
    use crate::models::classes::requests::CreateClassRequest;
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_join_twice_conflicts_and_leave() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "t", UserRole::Teacher).await;
        let student = seed_user(&storage, "zoe", UserRole::Student).await;
        let class = storage
            .create_class_impl(
                teacher.id,
                CreateClassRequest {
                    teacher_id: None,
                    name: "Reading".to_string(),
                    description: None,
                    grade_level: None,
                },
            )
            .await
            .unwrap();

        storage
            .join_class_impl(student.id, class.id, ClassUserRole::Student)
            .await
            .unwrap();
        let err = storage
            .join_class_impl(student.id, class.id, ClassUserRole::Student)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E014");

        assert_eq!(storage.count_class_students_impl(class.id).await.unwrap(), 1);
        assert_eq!(
            storage.list_class_student_ids_impl(class.id).await.unwrap(),
            vec![student.id]
        );

        let members = storage
            .list_class_members_with_pagination_impl(class.id, ClassUserQuery::default())
            .await
            .unwrap();
        // 教师与学生
        assert_eq!(members.pagination.total, 2);
        assert_eq!(members.items[0].username, "t");

        assert!(storage.leave_class_impl(student.id, class.id).await.unwrap());
        assert_eq!(storage.count_class_students_impl(class.id).await.unwrap(), 0);
    }
}
